use serde::{Deserialize, Serialize};

/// UI color scheme, persisted across sessions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Theme> {
        match s.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Best-effort terminal background detection via the COLORFGBG
    /// convention ("fg;bg", bg 0-6 or 8 means a dark background).
    /// Falls back to Light when the variable is absent or unparseable.
    pub fn terminal_default() -> Theme {
        match std::env::var("COLORFGBG") {
            Ok(value) => {
                let bg = value.rsplit(';').next().and_then(|s| s.parse::<u8>().ok());
                match bg {
                    Some(n) if n <= 6 || n == 8 => Theme::Dark,
                    _ => Theme::Light,
                }
            }
            Err(_) => Theme::Light,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

/// A simulated inference target. Catalog entries are immutable once loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub max_tokens: u32,
}

impl Model {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        provider: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Model {
            id: id.into(),
            name: name.into(),
            provider: provider.into(),
            max_tokens,
        }
    }
}

/// A reusable prompt skeleton with placeholder text
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub content: String,
    pub category: String,
}

impl Template {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Template {
            id: id.into(),
            name: name.into(),
            content: content.into(),
            category: category.into(),
        }
    }
}

/// Who authored a transcript message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single transcript entry. Constructed only by `AppState::add_message`,
/// immutable afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Creation instant, unix milliseconds
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<PromptParameters>,
}

/// Sampling configuration submitted alongside a prompt
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptParameters {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
}

impl Default for PromptParameters {
    fn default() -> Self {
        PromptParameters {
            temperature: 0.7,
            max_tokens: 2048,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

/// Keys into `PromptParameters`. An exhaustive enum rather than a string
/// key, so an unknown parameter is a compile error instead of a runtime one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterKey {
    Temperature,
    MaxTokens,
    TopP,
    FrequencyPenalty,
    PresencePenalty,
}

impl ParameterKey {
    pub const ALL: [ParameterKey; 5] = [
        ParameterKey::Temperature,
        ParameterKey::MaxTokens,
        ParameterKey::TopP,
        ParameterKey::FrequencyPenalty,
        ParameterKey::PresencePenalty,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ParameterKey::Temperature => "Temperature",
            ParameterKey::MaxTokens => "Max Tokens",
            ParameterKey::TopP => "Top P",
            ParameterKey::FrequencyPenalty => "Frequency Penalty",
            ParameterKey::PresencePenalty => "Presence Penalty",
        }
    }

    pub fn min(&self) -> f64 {
        match self {
            ParameterKey::MaxTokens => 1.0,
            _ => 0.0,
        }
    }

    pub fn max(&self) -> f64 {
        match self {
            ParameterKey::Temperature => 2.0,
            ParameterKey::MaxTokens => 4096.0,
            ParameterKey::TopP => 1.0,
            ParameterKey::FrequencyPenalty => 2.0,
            ParameterKey::PresencePenalty => 2.0,
        }
    }

    pub fn step(&self) -> f64 {
        match self {
            ParameterKey::Temperature => 0.1,
            ParameterKey::MaxTokens => 64.0,
            ParameterKey::TopP => 0.05,
            ParameterKey::FrequencyPenalty => 0.1,
            ParameterKey::PresencePenalty => 0.1,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ParameterKey::Temperature => {
                "Controls randomness. Lower values make output more focused and deterministic."
            }
            ParameterKey::MaxTokens => "Maximum length of the generated response.",
            ParameterKey::TopP => "Nucleus sampling: considers tokens with top P probability mass.",
            ParameterKey::FrequencyPenalty => {
                "Reduces repetition by penalizing tokens based on their frequency."
            }
            ParameterKey::PresencePenalty => {
                "Encourages talking about new topics by penalizing tokens that have appeared."
            }
        }
    }
}

impl PromptParameters {
    pub fn get(&self, key: ParameterKey) -> f64 {
        match key {
            ParameterKey::Temperature => self.temperature,
            ParameterKey::MaxTokens => self.max_tokens as f64,
            ParameterKey::TopP => self.top_p,
            ParameterKey::FrequencyPenalty => self.frequency_penalty,
            ParameterKey::PresencePenalty => self.presence_penalty,
        }
    }

    /// Set a single field, clamped to the key's declared range. The other
    /// fields are left untouched.
    pub fn set(&mut self, key: ParameterKey, value: f64) {
        self.set_clamped(key, value, key.max());
    }

    /// Like `set`, but with the upper bound supplied by the caller. Max
    /// tokens has no fixed ceiling: its real bound is the selected model's
    /// token budget.
    pub fn set_clamped(&mut self, key: ParameterKey, value: f64, max: f64) {
        let value = value.clamp(key.min(), max.max(key.min()));
        match key {
            ParameterKey::Temperature => self.temperature = value,
            ParameterKey::MaxTokens => self.max_tokens = value.round() as u32,
            ParameterKey::TopP => self.top_p = value,
            ParameterKey::FrequencyPenalty => self.frequency_penalty = value,
            ParameterKey::PresencePenalty => self.presence_penalty = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parse_round_trip() {
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::parse("dark\n"), Some(Theme::Dark));
        assert_eq!(Theme::parse("solarized"), None);
        assert_eq!(Theme::parse(Theme::Dark.as_str()), Some(Theme::Dark));
    }

    #[test]
    fn test_toggle_is_own_inverse() {
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn test_set_updates_only_target_field() {
        let mut params = PromptParameters::default();
        params.set(ParameterKey::Temperature, 1.3);
        assert_eq!(params.temperature, 1.3);
        assert_eq!(params.max_tokens, 2048);
        assert_eq!(params.top_p, 1.0);
        assert_eq!(params.frequency_penalty, 0.0);
        assert_eq!(params.presence_penalty, 0.0);
    }

    #[test]
    fn test_set_clamps_to_range() {
        let mut params = PromptParameters::default();
        params.set(ParameterKey::Temperature, 5.0);
        assert_eq!(params.temperature, 2.0);
        params.set(ParameterKey::TopP, -0.5);
        assert_eq!(params.top_p, 0.0);
        params.set(ParameterKey::MaxTokens, 0.0);
        assert_eq!(params.max_tokens, 1);
    }

    #[test]
    fn test_set_clamped_honors_caller_bound() {
        let mut params = PromptParameters::default();
        params.set_clamped(ParameterKey::MaxTokens, 8192.0, 8192.0);
        assert_eq!(params.max_tokens, 8192);
        params.set_clamped(ParameterKey::MaxTokens, 9000.0, 8192.0);
        assert_eq!(params.max_tokens, 8192);
        params.set_clamped(ParameterKey::MaxTokens, 100_000.0, f64::MAX);
        assert_eq!(params.max_tokens, 100_000);
    }

    #[test]
    fn test_key_text_outlives_the_key() {
        let mut lines: Vec<&str> = Vec::new();
        {
            let key = ParameterKey::ALL[1];
            lines.push(key.label());
            lines.push(key.description());
        }
        assert_eq!(lines[0], "Max Tokens");
        assert!(lines[1].contains("Maximum length"));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }
}
