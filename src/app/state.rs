//! App state - pure data structure, the single source of truth for theme,
//! model catalog/selection, parameters, transcript, and templates

use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::RenderState;
use crate::models::{Message, Model, PromptParameters, Role, Template, Theme};
use crate::storage::Storage;

/// Main application state. The sole authority that constructs `Message`
/// records; panels only ever see `RenderState` snapshots.
pub struct AppState {
    // Theme
    pub theme: Theme,

    // Model catalog (static once loaded)
    pub models: Vec<Model>,
    pub selected_model: Option<Model>,
    pub model_cursor: usize,

    // Sampling parameters
    pub parameters: PromptParameters,
    pub selected_parameter: usize,

    // Prompt composer
    pub prompt: String,
    pub cursor_position: usize,

    // Transcript (append-only, unbounded for the session)
    pub messages: Vec<Message>,
    pub transcript_scroll: u16,
    pub message_cursor: usize,

    // Templates (static catalog + user-saved entries)
    pub templates: Vec<Template>,
    pub template_cursor: usize,
    pub show_templates: bool,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub is_loading: bool,
    pub show_help: bool,
    pub notice: Option<String>,

    // Pending mock generations (oldest first)
    pub pending: Vec<u64>,
    next_seq: u64,

    // Persistence (theme only)
    pub storage: Storage,
}

impl AppState {
    pub fn new(storage: Storage) -> Self {
        let theme = storage
            .load_theme()
            .unwrap_or_else(Theme::terminal_default);

        AppState {
            theme,
            models: Vec::new(),
            selected_model: None,
            model_cursor: 0,
            parameters: PromptParameters::default(),
            selected_parameter: 0,
            prompt: String::new(),
            cursor_position: 0,
            messages: Vec::new(),
            transcript_scroll: 0,
            message_cursor: 0,
            templates: Vec::new(),
            template_cursor: 0,
            show_templates: false,
            active_panel: Panel::Prompt,
            input_mode: InputMode::Normal,
            is_loading: true,
            show_help: false,
            notice: None,
            pending: Vec::new(),
            next_seq: 1,
            storage,
        }
    }

    /// Generate a unique sequence number (message and generation ids)
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_seq;
        self.next_seq += 1;
        id
    }

    /// Append a message to the transcript. Assigns a fresh unique id and the
    /// current timestamp; this is the only constructor of `Message` records.
    /// The transcript cursor jumps to the new entry.
    pub fn add_message(
        &mut self,
        role: Role,
        content: impl Into<String>,
        model: Option<String>,
        parameters: Option<PromptParameters>,
    ) {
        let id = format!("msg-{}", self.next_id());
        self.messages.push(Message {
            id,
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            model,
            parameters,
        });
        self.message_cursor = self.messages.len() - 1;
    }

    /// Empty the transcript. Irreversible; confirmation, if any, is a
    /// caller-side concern.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.transcript_scroll = 0;
        self.message_cursor = 0;
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            theme: self.theme,
            models: self.models.clone(),
            selected_model: self.selected_model.clone(),
            model_cursor: self.model_cursor,
            parameters: self.parameters,
            selected_parameter: self.selected_parameter,
            prompt: self.prompt.clone(),
            cursor_position: self.cursor_position,
            messages: self.messages.clone(),
            transcript_scroll: self.transcript_scroll,
            message_cursor: self.message_cursor,
            templates: self.templates.clone(),
            template_cursor: self.template_cursor,
            show_templates: self.show_templates,
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            is_loading: self.is_loading,
            pending_generations: self.pending.len(),
            show_help: self.show_help,
            notice: self.notice.clone(),
        }
    }
}
