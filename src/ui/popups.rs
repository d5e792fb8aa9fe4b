//! Popups: notifications, quit confirmation, avatar path prompt.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::state::NotificationKind;

pub fn draw_centered_rect(r: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn draw_notification_popup(f: &mut Frame, app: &App) {
    let Some(notification) = &app.notifications.current else {
        return;
    };
    let (title, color) = match notification.kind {
        NotificationKind::Success => ("Success", Color::Green),
        NotificationKind::Failure => ("Error", Color::Red),
    };
    let area = draw_centered_rect(f.area(), 50, 20);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(color));
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(notification.message.as_str())
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

pub fn draw_quit_confirm_popup(f: &mut Frame, app: &App) {
    if !app.ui.show_quit_confirm {
        return;
    }
    let area = draw_centered_rect(f.area(), 40, 20);
    let block = Block::default()
        .title("Quit?")
        .borders(Borders::ALL)
        .border_type(BorderType::Double);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(2)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let selected = Style::default()
        .bg(Color::Magenta)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);
    let yes_style = if app.ui.quit_confirm_selected == 0 { selected } else { Style::default() };
    let no_style = if app.ui.quit_confirm_selected == 1 { selected } else { Style::default() };
    f.render_widget(
        Paragraph::new(Span::styled("[ Yes ]", yes_style)).alignment(Alignment::Center),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(Span::styled("[ No ]", no_style)).alignment(Alignment::Center),
        chunks[1],
    );
}

pub fn draw_avatar_prompt_popup(f: &mut Frame, app: &App) {
    let Some(path) = &app.profile.avatar_prompt else {
        return;
    };
    let area = draw_centered_rect(f.area(), 60, 20);
    let block = Block::default()
        .title("Upload profile photo (path to image file)")
        .borders(Borders::ALL)
        .border_type(BorderType::Double);
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(path.as_str()).block(block), area);

    let inner = Block::default().borders(Borders::ALL).inner(area);
    let cursor_x = inner.x + (path.chars().count() as u16).min(inner.width.saturating_sub(1));
    f.set_cursor_position((cursor_x, inner.y));
}
