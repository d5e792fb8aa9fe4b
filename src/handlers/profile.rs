use std::path::PathBuf;

use crate::app::App;
use crate::state::AppMode;
use crossterm::event::{KeyCode, KeyEvent};

/// Handle profile page input
pub fn handle_profile_input(key: KeyEvent, app: &mut App) {
    // The avatar path prompt captures all input while open
    if app.profile.avatar_prompt.is_some() {
        handle_avatar_prompt_input(key, app);
        return;
    }

    match key.code {
        KeyCode::Char('u') => {
            app.profile.open_avatar_prompt();
        }
        KeyCode::Char('s') => {
            app.sign_out();
        }
        KeyCode::Esc => {
            app.ui.set_mode(AppMode::Home);
        }
        _ => {}
    }
}

fn handle_avatar_prompt_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char(c) => {
            if let Some(path) = &mut app.profile.avatar_prompt {
                path.push(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(path) = &mut app.profile.avatar_prompt {
                path.pop();
            }
        }
        KeyCode::Enter => {
            if let Some(path) = app.profile.avatar_prompt.take() {
                let trimmed = path.trim();
                if !trimmed.is_empty() {
                    app.start_photo_upload(PathBuf::from(trimmed));
                }
            }
        }
        KeyCode::Esc => {
            app.profile.close_avatar_prompt();
        }
        _ => {}
    }
}
