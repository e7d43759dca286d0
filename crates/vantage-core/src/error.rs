//! Error types for `vantage-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`.

use std::path::PathBuf;

/// Unified error type for all core operations.
///
/// Each variant captures just enough context for a widget to show one
/// user-facing line (see [`CoreError::user_message`]) while the full
/// detail goes to the log.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// User input failed validation. No request was issued.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The provider answered with a non-success status.
    #[error("http {status} from {url}")]
    Http { status: u16, url: String },

    /// The request could not be sent or its body could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with a payload we could not decode.
    #[error("malformed payload: {0}")]
    Decode(String),

    /// The provider answered successfully but with nothing usable.
    #[error("empty result: {0}")]
    Empty(String),

    /// The music-streaming token is absent, expired, or was rejected.
    #[error("not authorized")]
    Unauthorized,

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// The key-value persistence layer failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// The single line a widget displays for this error.
    ///
    /// Validation and empty-result messages are already written for the
    /// user and pass through; everything else collapses to a generic line.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(msg) | Self::Empty(msg) => msg.clone(),
            Self::Unauthorized => "Not connected. Please log in again.".to_string(),
            Self::Http { .. } | Self::Transport(_) | Self::Decode(_) => {
                "Unable to fetch data. Please try again later.".to_string()
            }
            Self::ConfigParse(_)
            | Self::Storage(_)
            | Self::NotFound(_)
            | Self::PermissionDenied(_)
            | Self::Io(_) => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Returns `true` for failures that came from talking to a provider.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Transport(_) | Self::Decode(_) | Self::Empty(_)
        )
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Convenience alias used throughout `vantage-core`.
pub type CoreResult<T> = Result<T, CoreError>;
