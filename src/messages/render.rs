//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::{InputMode, Panel};
use crate::models::{Message, Model, PromptParameters, Template, Theme};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Theme
    pub theme: Theme,

    // Model catalog
    pub models: Vec<Model>,
    pub selected_model: Option<Model>,
    pub model_cursor: usize,

    // Sampling parameters
    pub parameters: PromptParameters,
    pub selected_parameter: usize,

    // Prompt composer
    pub prompt: String,
    pub cursor_position: usize,

    // Transcript
    pub messages: Vec<Message>,
    pub transcript_scroll: u16,
    pub message_cursor: usize,

    // Templates
    pub templates: Vec<Template>,
    pub template_cursor: usize,
    pub show_templates: bool,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub is_loading: bool,
    pub pending_generations: usize,
    pub show_help: bool,

    /// Transient feedback line (export/save/clear results)
    pub notice: Option<String>,
}
