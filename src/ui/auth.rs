//! Auth form UI: one screen for sign-in, sign-up, and password-reset.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::Alignment;
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::state::FormFocus;

pub fn draw_auth_form(f: &mut Frame, app: &mut App, area: Rect) {
    let form = &app.form;
    let outer_block = Block::default()
        .title(form.mode.title())
        .borders(Borders::ALL);
    f.render_widget(outer_block, area);

    let visible = form.mode.visible_fields();
    // One boxed input plus one error line per visible field
    let mut constraints: Vec<Constraint> = Vec::with_capacity(visible.len() * 2 + 2);
    for _ in visible {
        constraints.push(Constraint::Length(3));
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(3));
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .margin(2)
        .constraints(constraints)
        .split(area);

    for (i, field) in visible.iter().enumerate() {
        let value = form.field(*field);
        let display = if field.is_secret() && !form.password_visible {
            "*".repeat(value.chars().count())
        } else {
            value.to_string()
        };
        let style = if form.focus == FormFocus::Field(*field) {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        f.render_widget(
            Paragraph::new(display)
                .block(Block::default().borders(Borders::ALL).title(field.label()))
                .style(style),
            chunks[i * 2],
        );
        if let Some(message) = form.errors.get(field) {
            f.render_widget(
                Paragraph::new(message.as_str()).style(Style::default().fg(Color::Red)),
                chunks[i * 2 + 1],
            );
        }
    }

    let button_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[visible.len() * 2]);

    let submit_label = if form.submitting {
        "[ ... ]".to_string()
    } else {
        format!("[ {} ]", form.mode.submit_label())
    };
    let submit_style = if form.focus == FormFocus::Submit {
        Style::default().bg(Color::Cyan).fg(Color::Black)
    } else {
        Style::default()
    };
    f.render_widget(
        Paragraph::new(Span::styled(submit_label, submit_style)).alignment(Alignment::Center),
        button_chunks[0],
    );

    let switch_style = if form.focus == FormFocus::SwitchMode {
        Style::default().bg(Color::Magenta).fg(Color::Black)
    } else {
        Style::default()
    };
    f.render_widget(
        Paragraph::new(Span::styled(form.mode.switch_link_label(), switch_style))
            .alignment(Alignment::Center),
        button_chunks[1],
    );

    if let FormFocus::Field(field) = form.focus {
        if let Some(i) = visible.iter().position(|f2| *f2 == field) {
            let value_len = form.field(field).chars().count() as u16;
            f.set_cursor_position((chunks[i * 2].x + value_len + 1, chunks[i * 2].y + 1));
        }
    }
}
