//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,
    ScrollUp,
    ScrollDown,

    // Prompt editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    NewLine,

    // Prompt actions
    SendPrompt,
    CancelGeneration,

    // Model picker
    NextModel,
    PrevModel,
    SelectModel,

    // Parameter sliders
    NextParameter,
    PrevParameter,
    IncrementParameter,
    DecrementParameter,

    // Transcript
    NextMessage,
    PrevMessage,
    CopyMessage,
    ClearTranscript,
    ExportTranscript,

    // Templates
    OpenTemplates,
    CloseTemplates,
    NextTemplate,
    PrevTemplate,
    LoadTemplate,
    SaveTemplate,

    // Theme
    ToggleTheme,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Active panel in the UI (needed for context-aware event mapping)
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Panel {
    Models,
    Parameters,
    #[default]
    Prompt,
    Transcript,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Models => Panel::Parameters,
            Panel::Parameters => Panel::Prompt,
            Panel::Prompt => Panel::Transcript,
            Panel::Transcript => Panel::Models,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::Models => Panel::Transcript,
            Panel::Parameters => Panel::Models,
            Panel::Prompt => Panel::Parameters,
            Panel::Transcript => Panel::Prompt,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Panel::Models => "Models",
            Panel::Parameters => "Parameters",
            Panel::Prompt => "Prompt",
            Panel::Transcript => "Conversation",
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
    show_templates: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            KeyCode::Char('x') => return Some(UiEvent::CancelGeneration),
            _ => {}
        }
    }

    // Popups swallow everything else
    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    if show_templates {
        return match key.code {
            KeyCode::Esc => Some(UiEvent::CloseTemplates),
            KeyCode::Enter => Some(UiEvent::LoadTemplate),
            KeyCode::Up => Some(UiEvent::PrevTemplate),
            KeyCode::Down => Some(UiEvent::NextTemplate),
            _ => None,
        };
    }

    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Tab => Some(UiEvent::NextPanel),
            KeyCode::BackTab => Some(UiEvent::PrevPanel),
            KeyCode::Char('t') => Some(UiEvent::ToggleTheme),
            KeyCode::Char('s') => Some(UiEvent::SendPrompt),
            KeyCode::Char('x') => Some(UiEvent::ExportTranscript),
            KeyCode::Char('c') => Some(UiEvent::ClearTranscript),
            KeyCode::Char('l') => Some(UiEvent::OpenTemplates),
            KeyCode::Char('w') => Some(UiEvent::SaveTemplate),
            KeyCode::Char('e') | KeyCode::Enter => match active_panel {
                Panel::Prompt => Some(UiEvent::StartEditing),
                Panel::Models => Some(UiEvent::SelectModel),
                _ => None,
            },
            KeyCode::Up => match active_panel {
                Panel::Models => Some(UiEvent::PrevModel),
                Panel::Parameters => Some(UiEvent::PrevParameter),
                Panel::Transcript => Some(UiEvent::ScrollUp),
                Panel::Prompt => None,
            },
            KeyCode::Down => match active_panel {
                Panel::Models => Some(UiEvent::NextModel),
                Panel::Parameters => Some(UiEvent::NextParameter),
                Panel::Transcript => Some(UiEvent::ScrollDown),
                Panel::Prompt => None,
            },
            KeyCode::Left if active_panel == Panel::Parameters => {
                Some(UiEvent::DecrementParameter)
            }
            KeyCode::Right if active_panel == Panel::Parameters => {
                Some(UiEvent::IncrementParameter)
            }
            KeyCode::Char('j') if active_panel == Panel::Transcript => {
                Some(UiEvent::NextMessage)
            }
            KeyCode::Char('k') if active_panel == Panel::Transcript => {
                Some(UiEvent::PrevMessage)
            }
            KeyCode::Char('y') if active_panel == Panel::Transcript => {
                Some(UiEvent::CopyMessage)
            }
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Enter => Some(UiEvent::NewLine),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}
