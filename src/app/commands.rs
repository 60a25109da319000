//! Command handlers - business logic for processing UI events

use std::path::Path;

use crate::app::AppState;
use crate::export;
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::{EngineCommand, EngineResponse};
use crate::models::{Model, ParameterKey, Role, Template, Theme};

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
    }

    pub fn scroll_up(&mut self) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.transcript_scroll = self.transcript_scroll.saturating_add(1);
    }

    // ========================
    // Theme
    // ========================

    /// Flip light/dark and persist synchronously. Returns the new value.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if let Err(e) = self.storage.save_theme(self.theme) {
            tracing::warn!(error = %e, "Failed to persist theme preference");
        }
        self.theme
    }

    // ========================
    // Model selection
    // ========================

    pub fn next_model(&mut self) {
        if !self.models.is_empty() {
            self.model_cursor = (self.model_cursor + 1) % self.models.len();
        }
    }

    pub fn prev_model(&mut self) {
        if !self.models.is_empty() {
            self.model_cursor = self
                .model_cursor
                .checked_sub(1)
                .unwrap_or(self.models.len() - 1);
        }
    }

    /// Replace the selection. Callers only ever pass catalog members.
    pub fn set_selected_model(&mut self, model: Model) {
        self.selected_model = Some(model);
    }

    /// Select the model under the cursor
    pub fn select_model(&mut self) {
        if let Some(model) = self.models.get(self.model_cursor).cloned() {
            self.set_selected_model(model);
        }
    }

    // ========================
    // Parameters
    // ========================

    pub fn next_parameter(&mut self) {
        self.selected_parameter = (self.selected_parameter + 1) % ParameterKey::ALL.len();
    }

    pub fn prev_parameter(&mut self) {
        self.selected_parameter = self
            .selected_parameter
            .checked_sub(1)
            .unwrap_or(ParameterKey::ALL.len() - 1);
    }

    /// Mutate a single sampling parameter, clamped to its declared range.
    /// Max tokens is the exception: its ceiling is the selected model's
    /// token budget, unbounded until a catalog model is selected.
    pub fn update_parameter(&mut self, key: ParameterKey, value: f64) {
        let max = match key {
            ParameterKey::MaxTokens => self
                .selected_model
                .as_ref()
                .map(|m| m.max_tokens as f64)
                .unwrap_or(f64::MAX),
            _ => key.max(),
        };
        self.parameters.set_clamped(key, value, max);
    }

    pub fn increment_parameter(&mut self) {
        let key = ParameterKey::ALL[self.selected_parameter];
        self.update_parameter(key, self.parameters.get(key) + key.step());
    }

    pub fn decrement_parameter(&mut self) {
        let key = ParameterKey::ALL[self.selected_parameter];
        self.update_parameter(key, self.parameters.get(key) - key.step());
    }

    // ========================
    // Prompt editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.active_panel == Panel::Prompt {
            self.input_mode = InputMode::Editing;
            self.cursor_position = self.prompt.len();
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn enter_char(&mut self, c: char) {
        if self.cursor_position <= self.prompt.len() {
            self.prompt.insert(self.cursor_position, c);
            self.cursor_position += c.len_utf8();
        }
    }

    pub fn new_line(&mut self) {
        self.enter_char('\n');
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let prev_pos = self.prompt[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.prompt.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position = self.prompt[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.prompt.len() {
            self.cursor_position = self.prompt[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(self.prompt.len());
        }
    }

    // ========================
    // Sending prompts
    // ========================

    /// Append the composed prompt as a user message and hand a generation
    /// command to the engine. Requires a non-blank prompt and a selected
    /// model; concurrent sends are allowed, so replies may interleave with
    /// later user messages.
    pub fn send_prompt(&mut self) -> Option<EngineCommand> {
        if self.prompt.trim().is_empty() {
            return None;
        }
        let model = self.selected_model.clone()?;

        let content = std::mem::take(&mut self.prompt);
        self.cursor_position = 0;
        self.input_mode = InputMode::Normal;

        let parameters = self.parameters;
        self.add_message(Role::User, content, Some(model.id.clone()), Some(parameters));

        let id = self.next_id();
        self.pending.push(id);

        Some(EngineCommand::Generate {
            id,
            model: model.id,
            parameters,
        })
    }

    /// Cancel the most recent pending generation, if any
    pub fn cancel_generation(&mut self) -> Option<EngineCommand> {
        self.pending.last().map(|&id| EngineCommand::CancelGeneration(id))
    }

    // ========================
    // Engine response handling
    // ========================

    pub fn handle_engine_response(&mut self, response: EngineResponse) {
        match response {
            EngineResponse::CatalogLoaded { models, templates } => {
                self.selected_model = models.first().cloned();
                self.models = models;
                self.templates = templates;
                self.model_cursor = 0;
                self.is_loading = false;
                tracing::info!(
                    models = self.models.len(),
                    templates = self.templates.len(),
                    "Catalog loaded"
                );
            }
            EngineResponse::CatalogError { message } => {
                // Lenient degrade: empty catalogs, null selection, no retry
                tracing::error!(%message, "Failed to load catalog");
                self.is_loading = false;
            }
            EngineResponse::Completion {
                id,
                model,
                parameters,
                content,
            } => {
                self.pending.retain(|&p| p != id);
                self.add_message(Role::Assistant, content, Some(model), Some(parameters));
            }
            EngineResponse::Cancelled { id } => {
                self.pending.retain(|&p| p != id);
                self.notice = Some(String::from("Generation cancelled"));
            }
        }
    }

    // ========================
    // Templates
    // ========================

    pub fn open_templates(&mut self) {
        if !self.templates.is_empty() {
            self.show_templates = true;
            self.template_cursor = 0;
        }
    }

    pub fn close_templates(&mut self) {
        self.show_templates = false;
    }

    pub fn next_template(&mut self) {
        if !self.templates.is_empty() {
            self.template_cursor = (self.template_cursor + 1) % self.templates.len();
        }
    }

    pub fn prev_template(&mut self) {
        if !self.templates.is_empty() {
            self.template_cursor = self
                .template_cursor
                .checked_sub(1)
                .unwrap_or(self.templates.len() - 1);
        }
    }

    /// Load the highlighted template into the composer
    pub fn load_template(&mut self) {
        if let Some(template) = self.templates.get(self.template_cursor).cloned() {
            self.prompt = template.content;
            self.cursor_position = self.prompt.len();
            self.active_panel = Panel::Prompt;
        }
        self.show_templates = false;
    }

    /// Save the current prompt as a session-local template
    pub fn save_template(&mut self) {
        if self.prompt.trim().is_empty() {
            return;
        }
        let id = format!("custom-{}", self.next_id());
        let name = format!("Custom Template {}", self.templates.len() + 1);
        self.templates
            .push(Template::new(id, name.clone(), self.prompt.clone(), "Custom"));
        self.notice = Some(format!("Saved as {name}"));
    }

    // ========================
    // Transcript cursor
    // ========================

    pub fn next_message(&mut self) {
        if !self.messages.is_empty() {
            self.message_cursor = (self.message_cursor + 1).min(self.messages.len() - 1);
        }
    }

    pub fn prev_message(&mut self) {
        self.message_cursor = self.message_cursor.saturating_sub(1);
    }

    /// Copy the highlighted message's content to the system clipboard.
    /// Best-effort: a headless session gets a notice, never a crash.
    pub fn copy_message(&mut self) {
        let Some(message) = self.messages.get(self.message_cursor) else {
            return;
        };
        let content = message.content.clone();
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(content)) {
            Ok(()) => {
                self.notice = Some(String::from("Copied to clipboard"));
            }
            Err(e) => {
                tracing::error!(error = %e, "Clipboard copy failed");
                self.notice = Some(format!("Copy failed: {e}"));
            }
        }
    }

    // ========================
    // Export
    // ========================

    /// Write the transcript to a timestamped JSON file in the working
    /// directory. Best-effort: failure is a notice, never fatal.
    pub fn export_transcript(&mut self) {
        match export::export_transcript(&self.messages, Path::new(".")) {
            Ok(path) => {
                self.notice = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                tracing::error!(error = %e, "Transcript export failed");
                self.notice = Some(format!("Export failed: {e}"));
            }
        }
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PromptParameters;
    use crate::storage::Storage;
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(Storage::with_dir(dir.path().to_path_buf()));
        (state, dir)
    }

    fn catalog() -> Vec<Model> {
        vec![
            Model::new("gpt-4", "GPT-4", "OpenAI", 8192),
            Model::new("claude-2", "Claude 2", "Anthropic", 100_000),
        ]
    }

    #[test]
    fn test_transcript_order_and_unique_ids() {
        let (mut state, _dir) = test_state();
        for i in 0..10 {
            state.add_message(Role::User, format!("message {i}"), None, None);
        }
        assert_eq!(state.messages.len(), 10);

        let mut ids: Vec<String> = state.messages.iter().map(|m| m.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);

        for (i, msg) in state.messages.iter().enumerate() {
            assert_eq!(msg.content, format!("message {i}"));
        }
    }

    #[test]
    fn test_clear_messages_empties_transcript() {
        let (mut state, _dir) = test_state();
        for _ in 0..5 {
            state.add_message(Role::User, "hello", None, None);
        }
        state.clear_messages();
        assert!(state.messages.is_empty());
    }

    #[test]
    fn test_toggle_theme_persists_and_inverts() {
        let (mut state, _dir) = test_state();
        let original = state.theme;

        let flipped = state.toggle_theme();
        assert_eq!(flipped, original.toggled());
        assert_eq!(state.storage.load_theme(), Some(flipped));

        let restored = state.toggle_theme();
        assert_eq!(restored, original);
        assert_eq!(state.storage.load_theme(), Some(original));
    }

    #[test]
    fn test_set_selected_model() {
        let (mut state, _dir) = test_state();
        let model = Model::new("claude-2", "Claude 2", "Anthropic", 100_000);
        state.set_selected_model(model.clone());
        assert_eq!(state.selected_model, Some(model));
    }

    #[test]
    fn test_update_parameter_leaves_others_unchanged() {
        let (mut state, _dir) = test_state();
        state.update_parameter(ParameterKey::Temperature, 1.3);
        assert_eq!(state.parameters.temperature, 1.3);
        assert_eq!(state.parameters, PromptParameters {
            temperature: 1.3,
            ..PromptParameters::default()
        });
    }

    #[test]
    fn test_max_tokens_clamps_to_selected_model_budget() {
        let (mut state, _dir) = test_state();
        state.selected_model = Some(Model::new("gpt-4", "GPT-4", "OpenAI", 8192));
        state.update_parameter(ParameterKey::MaxTokens, 8192.0);
        assert_eq!(state.parameters.max_tokens, 8192);
        state.update_parameter(ParameterKey::MaxTokens, 9000.0);
        assert_eq!(state.parameters.max_tokens, 8192);

        state.selected_model = Some(Model::new("claude-2", "Claude 2", "Anthropic", 100_000));
        state.update_parameter(ParameterKey::MaxTokens, 50_000.0);
        assert_eq!(state.parameters.max_tokens, 50_000);
    }

    #[test]
    fn test_message_cursor_follows_newest_message() {
        let (mut state, _dir) = test_state();
        state.add_message(Role::User, "one", None, None);
        state.add_message(Role::Assistant, "two", None, None);
        assert_eq!(state.message_cursor, 1);

        state.prev_message();
        assert_eq!(state.message_cursor, 0);
        state.prev_message();
        assert_eq!(state.message_cursor, 0);
        state.next_message();
        assert_eq!(state.message_cursor, 1);
        state.next_message();
        assert_eq!(state.message_cursor, 1);

        state.clear_messages();
        assert_eq!(state.message_cursor, 0);
    }

    #[test]
    fn test_copy_message_on_empty_transcript_is_a_no_op() {
        let (mut state, _dir) = test_state();
        state.copy_message();
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_copy_message_reports_outcome_in_notice() {
        let (mut state, _dir) = test_state();
        state.add_message(Role::Assistant, "a canned reply", None, None);
        state.copy_message();
        // Succeeds or fails depending on the session's display server;
        // either way the user hears about it.
        assert!(state.notice.is_some());
    }

    #[test]
    fn test_send_prompt_requires_model_and_content() {
        let (mut state, _dir) = test_state();
        state.prompt = String::from("Hello");
        assert!(state.send_prompt().is_none());

        state.selected_model = Some(catalog().remove(0));
        state.prompt = String::from("   \n");
        assert!(state.send_prompt().is_none());
        assert!(state.messages.is_empty());
    }

    #[test]
    fn test_send_prompt_appends_user_message_and_emits_command() {
        let (mut state, _dir) = test_state();
        state.selected_model = Some(catalog().remove(0));
        state.prompt = String::from("Hello");

        let cmd = state.send_prompt().expect("command");
        assert_eq!(state.messages.len(), 1);

        let user = &state.messages[0];
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "Hello");
        assert_eq!(user.model.as_deref(), Some("gpt-4"));
        assert_eq!(user.parameters, Some(state.parameters));
        assert!(state.prompt.is_empty());

        match cmd {
            EngineCommand::Generate { id, model, .. } => {
                assert_eq!(model, "gpt-4");
                assert_eq!(state.pending, vec![id]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_completion_appends_exactly_one_assistant_message() {
        let (mut state, _dir) = test_state();
        state.selected_model = Some(catalog().remove(0));
        state.prompt = String::from("Hello");
        let cmd = state.send_prompt().unwrap();
        let id = match cmd {
            EngineCommand::Generate { id, .. } => id,
            other => panic!("unexpected command: {other:?}"),
        };

        state.handle_engine_response(EngineResponse::Completion {
            id,
            model: String::from("gpt-4"),
            parameters: state.parameters,
            content: String::from("A canned reply"),
        });

        assert_eq!(state.messages.len(), 2);
        let reply = &state.messages[1];
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.model.as_deref(), Some("gpt-4"));
        assert!(state.pending.is_empty());
    }

    #[test]
    fn test_catalog_loaded_selects_first_model() {
        let (mut state, _dir) = test_state();
        state.handle_engine_response(EngineResponse::CatalogLoaded {
            models: catalog(),
            templates: Vec::new(),
        });
        assert!(!state.is_loading);
        assert_eq!(state.models.len(), 2);
        assert_eq!(
            state.selected_model.as_ref().map(|m| m.id.as_str()),
            Some("gpt-4")
        );
    }

    #[test]
    fn test_catalog_error_leaves_empty_state() {
        let (mut state, _dir) = test_state();
        state.handle_engine_response(EngineResponse::CatalogError {
            message: String::from("boom"),
        });
        assert!(!state.is_loading);
        assert!(state.models.is_empty());
        assert!(state.selected_model.is_none());
    }

    #[test]
    fn test_save_template_appends_custom_entry() {
        let (mut state, _dir) = test_state();
        state.save_template();
        assert!(state.templates.is_empty());

        state.prompt = String::from("Summarize: [INSERT CONTENT]");
        state.save_template();
        assert_eq!(state.templates.len(), 1);
        let tpl = &state.templates[0];
        assert_eq!(tpl.category, "Custom");
        assert_eq!(tpl.name, "Custom Template 1");
        assert_eq!(tpl.content, "Summarize: [INSERT CONTENT]");
    }

    #[test]
    fn test_load_template_fills_composer() {
        let (mut state, _dir) = test_state();
        state.templates = vec![Template::new("t1", "Code Review", "Review this", "Development")];
        state.show_templates = true;
        state.load_template();
        assert_eq!(state.prompt, "Review this");
        assert_eq!(state.cursor_position, state.prompt.len());
        assert!(!state.show_templates);
    }

    #[test]
    fn test_cursor_moves_respect_char_boundaries() {
        let (mut state, _dir) = test_state();
        state.active_panel = Panel::Prompt;
        state.start_editing();
        state.enter_char('é');
        state.enter_char('x');
        state.move_cursor_left();
        state.move_cursor_left();
        assert_eq!(state.cursor_position, 0);
        state.move_cursor_right();
        assert_eq!(state.cursor_position, 'é'.len_utf8());
        state.delete_char();
        assert_eq!(state.prompt, "x");
    }

    #[test]
    fn test_parameter_increment_clamps_at_bounds() {
        let (mut state, _dir) = test_state();
        state.selected_parameter = 2; // top_p, already at its 1.0 maximum
        state.increment_parameter();
        assert_eq!(state.parameters.top_p, 1.0);
        state.decrement_parameter();
        assert!((state.parameters.top_p - 0.95).abs() < 1e-9);
    }
}
