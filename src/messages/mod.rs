//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the UI, App, and Engine layers.

pub mod engine;
pub mod render;
pub mod ui_events;

pub use engine::{EngineCommand, EngineResponse};
pub use render::RenderState;
pub use ui_events::UiEvent;
