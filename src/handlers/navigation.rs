use crate::app::App;
use crate::state::{AppMode, AuthMode, UiState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Shortcuts that work regardless of the current screen. Returns true when
/// the key was consumed.
pub fn handle_global_shortcuts(key: KeyEvent, app: &mut App) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.ui.show_quit_confirm = true;
        app.ui.quit_confirm_selected = 0;
        return true;
    }
    false
}

/// Handle home screen / nav menu input
pub fn handle_home_input(key: KeyEvent, app: &mut App) {
    let items = UiState::menu_items(app.logged_in());

    match key.code {
        KeyCode::Up | KeyCode::BackTab => {
            app.ui.menu_up(items.len());
        }
        KeyCode::Down | KeyCode::Tab => {
            app.ui.menu_down(items.len());
        }
        KeyCode::Enter => {
            let selected = app.ui.menu_state.selected().unwrap_or(0);
            match items.get(selected).copied() {
                Some("Sign In") => app.open_form(AuthMode::SignIn),
                Some("Sign Up") => app.open_form(AuthMode::SignUp),
                Some("Profile") => app.ui.set_mode(AppMode::Profile),
                Some("Sign Out") => app.sign_out(),
                Some("Quit") => {
                    app.ui.show_quit_confirm = true;
                    app.ui.quit_confirm_selected = 0;
                }
                _ => {}
            }
        }
        KeyCode::Char('q') => {
            app.ui.show_quit_confirm = true;
            app.ui.quit_confirm_selected = 0;
        }
        _ => {}
    }
}
