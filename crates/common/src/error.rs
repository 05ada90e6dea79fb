//! Error types shared across FocusGuard crates.

use std::path::PathBuf;

/// Top-level error type for FocusGuard operations.
///
/// Per-frame extraction failures are not represented here: they are
/// recovered inside a session and reported as events instead.
#[derive(Debug, thiserror::Error)]
pub enum FocusError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid session input at line {line}: {message}")]
    Input { line: usize, message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FocusError.
pub type FocusResult<T> = Result<T, FocusError>;

impl FocusError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn input(line: usize, msg: impl Into<String>) -> Self {
        Self::Input {
            line,
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    /// Whether this error means a session could not be started.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}
