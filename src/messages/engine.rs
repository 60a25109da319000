//! Engine messages - communication between App and mock-inference layers

use crate::models::{Model, PromptParameters, Template};

/// Commands sent from App layer to Engine layer
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Populate the model and template catalogs (simulated latency)
    LoadCatalog,
    /// Produce one mock completion for a submitted prompt
    Generate {
        id: u64,
        model: String,
        parameters: PromptParameters,
    },
    /// Abort a pending generation
    CancelGeneration(u64),
    /// Shutdown the engine actor
    Shutdown,
}

/// Responses sent from Engine layer to App layer
#[derive(Debug, Clone)]
pub enum EngineResponse {
    /// Catalogs are ready
    CatalogLoaded {
        models: Vec<Model>,
        templates: Vec<Template>,
    },
    /// Catalog load failed - logged, leaves empty state
    CatalogError { message: String },
    /// A mock completion, echoing the triggering model and parameters
    Completion {
        id: u64,
        model: String,
        parameters: PromptParameters,
        content: String,
    },
    /// Generation was cancelled before completing
    Cancelled { id: u64 },
}
