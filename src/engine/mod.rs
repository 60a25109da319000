//! Engine layer - the stand-in for a real inference backend
//!
//! Catalog loads and completions resolve after a fixed delay on the Tokio
//! runtime; there is no network anywhere.

pub mod actor;
pub mod mock;

pub use actor::EngineActor;
