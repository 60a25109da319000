//! Shared rendering helpers

use chrono::{Local, TimeZone};
use ratatui::prelude::*;

use crate::models::{Message, Role, Theme};

/// Per-theme color palette applied across all panels
pub struct Palette {
    pub border: Color,
    pub border_focused: Color,
    pub border_editing: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub user: Color,
    pub assistant: Color,
    pub accent: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            border_editing: Color::Yellow,
            text: Color::White,
            text_secondary: Color::Gray,
            user: Color::Cyan,
            assistant: Color::Green,
            accent: Color::Magenta,
        },
        Theme::Light => Palette {
            border: Color::Gray,
            border_focused: Color::Blue,
            border_editing: Color::Yellow,
            text: Color::Black,
            text_secondary: Color::DarkGray,
            user: Color::Blue,
            assistant: Color::Green,
            accent: Color::Magenta,
        },
    }
}

/// Speaker label for a transcript entry: "You" for the user, the model id
/// (or "Assistant") for replies
pub fn speaker_label(message: &Message) -> &str {
    match message.role {
        Role::User => "You",
        Role::Assistant => message.model.as_deref().unwrap_or("Assistant"),
    }
}

/// HH:MM local time from unix milliseconds
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => String::from("--:--"),
    }
}

/// Thousands separator for token budgets (8192 -> "8,192")
pub fn format_tokens(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_format_tokens() {
        assert_eq!(format_tokens(0), "0");
        assert_eq!(format_tokens(512), "512");
        assert_eq!(format_tokens(8192), "8,192");
        assert_eq!(format_tokens(100_000), "100,000");
    }

    #[test]
    fn test_speaker_label_prefers_model_id() {
        let mut message = Message {
            id: String::from("msg-1"),
            role: Role::Assistant,
            content: String::new(),
            timestamp: 0,
            model: Some(String::from("claude-2")),
            parameters: None,
        };
        assert_eq!(speaker_label(&message), "claude-2");
        message.model = None;
        assert_eq!(speaker_label(&message), "Assistant");
        message.role = Role::User;
        assert_eq!(speaker_label(&message), "You");
    }
}
