//! Error types for the STB checker

use thiserror::Error;

/// The main error type for STB operations
#[derive(Debug, Error)]
pub enum StbError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Document error: {0}")]
    DocumentError(String),

    #[error("Rules load error: {0}")]
    RulesLoadError(String),

    #[error("Invalid workflow transition: cannot {action} while {state}")]
    InvalidTransition { state: String, action: String },

    #[error("Workflow is not ready: {0}")]
    WorkflowNotReady(String),

    #[error("Export error: {0}")]
    ExportError(String),
}

/// Result type alias for STB operations
pub type Result<T> = std::result::Result<T, StbError>;

impl From<toml::de::Error> for StbError {
    fn from(err: toml::de::Error) -> Self {
        StbError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for StbError {
    fn from(err: toml::ser::Error) -> Self {
        StbError::TomlSerError(err.to_string())
    }
}
