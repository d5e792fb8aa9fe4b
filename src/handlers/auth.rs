use crate::app::App;
use crate::state::FormFocus;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle auth form input (sign-in / sign-up / password-reset)
pub fn handle_auth_input(key: KeyEvent, app: &mut App) {
    match key.code {
        // Show/Hide toggle for the password fields
        KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.form.toggle_password_visibility();
        }
        KeyCode::Char(c) => {
            app.form.push_char(c);
        }
        KeyCode::Backspace => {
            app.form.backspace();
        }
        KeyCode::Tab | KeyCode::Down => {
            app.form.focus_next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.form.focus_prev();
        }
        KeyCode::Enter => match app.form.focus {
            FormFocus::Field(_) => {
                app.form.focus_next();
            }
            FormFocus::Submit => {
                app.submit_form();
            }
            FormFocus::SwitchMode => {
                let target = app.form.mode.switch_target();
                app.form.set_mode(target);
            }
        },
        KeyCode::Esc => {
            app.close_form();
        }
        _ => {}
    }
}
