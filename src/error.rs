use std::io;

use thiserror::Error;

/// Result type for pattern configuration and rendering.
pub type PatternResult<T> = Result<T, PatternError>;

/// Errors raised at the boundary. Sampling, metrics and projection never fail.
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[from] io::Error),

    #[error("Malformed configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid argument '{flag}': {reason}")]
    InvalidArgument { flag: String, reason: String },

    #[error("Drawing failed: {0}")]
    Render(String),

    #[error("Export to {path} failed: {reason}")]
    Export { path: String, reason: String },
}

impl PatternError {
    pub fn invalid_argument(flag: &str, reason: impl Into<String>) -> Self {
        PatternError::InvalidArgument {
            flag: flag.to_owned(),
            reason: reason.into(),
        }
    }

    /// The message shown to the user when a render or export fails. Details go to the log.
    pub fn user_notice(&self) -> &'static str {
        match self {
            PatternError::Render(_) | PatternError::Export { .. } => {
                "Export failed, please try again"
            }
            PatternError::ConfigIo(_) | PatternError::ConfigParse(_) => {
                "Could not load settings"
            }
            PatternError::InvalidArgument { .. } => "Invalid arguments",
        }
    }
}

/// Converts any plotters drawing error into a [`PatternError::Render`].
pub(crate) fn render_error<E: std::fmt::Display>(err: E) -> PatternError {
    PatternError::Render(err.to_string())
}
