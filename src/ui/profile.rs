//! Profile page: avatar, pseudo/email, stats.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;

/// Keeps long data-URL addresses from flooding the line.
fn shorten(url: &str) -> String {
    if url.chars().count() > 48 {
        let head: String = url.chars().take(45).collect();
        format!("{}...", head)
    } else {
        url.to_string()
    }
}

pub fn draw_profile(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().title("Profile").borders(Borders::ALL);

    if app.profile.loading {
        f.render_widget(
            Paragraph::new("Loading your profile...").block(block),
            area,
        );
        return;
    }

    let lines = match &app.profile.profile {
        Some(profile) => {
            let photo_line = match &profile.profile_photo_url {
                Some(url) => Line::from(vec![
                    Span::raw("Photo: "),
                    Span::styled(shorten(url), Style::default().fg(Color::Cyan)),
                ]),
                None => Line::from(Span::styled(
                    "[ + ] no photo yet",
                    Style::default().fg(Color::DarkGray),
                )),
            };
            let mut lines = vec![
                photo_line,
                Line::from(Span::styled(
                    profile.pseudo.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    profile.email.clone(),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Statistics",
                    Style::default().add_modifier(Modifier::UNDERLINED),
                )),
                Line::from(format!("Total Views: {}", profile.total_views)),
                Line::from(format!("Total Downloads: {}", profile.total_downloads)),
            ];
            if app.profile.uploading {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Uploading photo...",
                    Style::default().fg(Color::Yellow),
                )));
            }
            lines
        }
        None => vec![Line::from("No profile data yet.")],
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}
