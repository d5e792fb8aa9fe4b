//! Main UI module. Re-exports submodules and provides the main entry point.

pub mod auth;
pub mod home;
pub mod popups;
pub mod profile;

use ratatui::layout::{Constraint, Layout};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::state::AppMode;
use crate::ui::auth::draw_auth_form;
use crate::ui::home::draw_home;
use crate::ui::popups::{draw_avatar_prompt_popup, draw_notification_popup, draw_quit_confirm_popup};
use crate::ui::profile::draw_profile;

pub fn ui(f: &mut Frame, app: &mut App) {
    let size = f.area();
    let chunks = Layout::default()
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(size);

    let status = match &app.identity {
        Some(identity) => format!("Logged in as: {}", identity.email),
        None => "Not logged in".to_string(),
    };
    f.render_widget(
        Paragraph::new(status).block(Block::default().title("SiteW").borders(Borders::ALL)),
        chunks[0],
    );

    match app.ui.mode {
        AppMode::Home => draw_home(f, app, chunks[1]),
        AppMode::AuthForm => draw_auth_form(f, app, chunks[1]),
        AppMode::Profile => draw_profile(f, app, chunks[1]),
    }

    let help_text = match app.ui.mode {
        AppMode::Home => "[↑↓] Navigate | [Enter] Select | [q] Quit",
        AppMode::AuthForm => "[Tab]/[Shift+Tab] Change Focus | [Enter] Select/Submit | [Ctrl+P] Show/Hide Password | [Esc] Back",
        AppMode::Profile => "[u] Upload Photo | [s] Sign Out | [Esc] Back",
    };
    f.render_widget(
        Paragraph::new(help_text).block(Block::default().borders(Borders::ALL)),
        chunks[2],
    );

    if app.ui.mode == AppMode::Profile {
        draw_avatar_prompt_popup(f, app);
    }
    draw_notification_popup(f, app);
    draw_quit_confirm_popup(f, app);
}
