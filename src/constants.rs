//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

use std::time::Duration;

/// Directory under the home dir holding persisted preferences
pub const CONFIG_DIR_NAME: &str = ".prompt-studio";

/// File name of the persisted theme preference
pub const THEME_FILE: &str = "theme";

/// Simulated latency for the catalog load
pub const CATALOG_LOAD_DELAY: Duration = Duration::from_millis(500);

/// Simulated latency for a mock completion
pub const GENERATION_DELAY: Duration = Duration::from_millis(1000);

/// Application name
pub const APP_NAME: &str = "Prompt Studio";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
