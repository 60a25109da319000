use crate::constants::{CONFIG_DIR_NAME, THEME_FILE};
use crate::models::Theme;
use anyhow::Result;
use std::fs;
use std::path::PathBuf;

/// Manages the on-disk preference store (a single `theme` key for now)
pub struct Storage {
    config_dir: PathBuf,
}

impl Storage {
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME);

        Storage { config_dir }
    }

    /// Storage rooted at an explicit directory (used by tests)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Storage { config_dir }
    }

    /// Ensure config directory exists
    fn ensure_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Read the persisted theme, if any. Unreadable or unparseable content
    /// counts as absent.
    pub fn load_theme(&self) -> Option<Theme> {
        let path = self.config_dir.join(THEME_FILE);
        fs::read_to_string(path)
            .ok()
            .and_then(|content| Theme::parse(&content))
    }

    /// Persist the theme. Called synchronously on every toggle so the
    /// on-disk value always matches the in-memory one.
    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        self.ensure_dir()?;
        let path = self.config_dir.join(THEME_FILE);
        fs::write(path, theme.as_str())?;
        Ok(())
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}
