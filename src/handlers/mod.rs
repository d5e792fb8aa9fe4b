pub mod auth;
pub mod navigation;
pub mod profile;

use crate::app::App;
use crate::state::AppMode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Main input handler dispatcher
pub fn handle_key_event(key: KeyEvent, app: &mut App) {
    // Quit confirmation has the highest priority
    if app.ui.show_quit_confirm {
        handle_quit_confirm_input(key, app);
        return;
    }

    if navigation::handle_global_shortcuts(key, app) {
        return;
    }

    // Any key dismisses an active notification
    if app.notifications.current.is_some() {
        app.notifications.clear();
        return;
    }

    match app.ui.mode {
        AppMode::Home => navigation::handle_home_input(key, app),
        AppMode::AuthForm => auth::handle_auth_input(key, app),
        AppMode::Profile => profile::handle_profile_input(key, app),
    }
}

fn handle_quit_confirm_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Left | KeyCode::Right => {
            app.ui.quit_confirm_selected = if app.ui.quit_confirm_selected == 0 { 1 } else { 0 };
        }
        KeyCode::Enter => {
            if app.ui.quit_confirm_selected == 0 {
                app.ui.quit();
            }
            app.ui.show_quit_confirm = false;
        }
        KeyCode::Esc => {
            app.ui.show_quit_confirm = false;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.ui.show_quit_confirm = false;
        }
        _ => {}
    }
}
