//! Home screen: nav menu plus the placeholder content grid.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use crate::app::App;
use crate::state::UiState;

pub fn draw_home(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(0)])
        .split(area);

    let items: Vec<ListItem> = UiState::menu_items(app.logged_in())
        .iter()
        .map(|label| ListItem::new(*label))
        .collect();
    let menu = List::new(items)
        .block(Block::default().title("Menu").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Magenta)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(menu, chunks[0], &mut app.ui.menu_state);

    // Placeholder content cards, three per row
    let rows = Layout::default()
        .margin(1)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(chunks[1]);
    for row in rows.iter().take(3) {
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(33),
                Constraint::Percentage(34),
            ])
            .split(*row);
        for card in cards.iter() {
            f.render_widget(Block::default().borders(Borders::ALL), *card);
        }
    }
}
