//! Application configuration and errors.

use nodeink_core::EditorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Config(serde_json::Error),
    #[error("Invalid script command on line {line}: {source}")]
    Script {
        line: usize,
        source: serde_json::Error,
    },
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Settings for the editor session.
    pub editor: EditorConfig,
    /// Print a JSON summary of the graph after replay.
    pub summary: bool,
}

impl AppConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> AppResult<Self> {
        serde_json::from_str(text).map_err(AppError::Config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> AppResult<Self> {
        log::debug!("Loading config from {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
