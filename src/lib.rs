//! # Prompt Studio TUI
//!
//! A terminal workbench for composing prompts, picking a simulated model,
//! tuning sampling parameters, and reviewing the conversation transcript.
//! All state lives in memory; responses come from a canned set after a fixed
//! delay, and only the theme preference survives across sessions.
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Engine Layer (Tokio runtime, mock inference)

pub mod app;
pub mod constants;
pub mod engine;
pub mod export;
pub mod messages;
pub mod models;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use engine::EngineActor;
pub use export::{export_transcript, transcript_to_json};
pub use messages::{EngineCommand, EngineResponse, RenderState, UiEvent};
pub use models::{Message, Model, ParameterKey, PromptParameters, Role, Template, Theme};
pub use storage::Storage;
