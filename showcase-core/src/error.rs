//! Error types for the showcase crates.

use thiserror::Error;

/// Errors that can occur in showcase operations.
#[derive(Error, Debug)]
pub enum ShowcaseError {
    #[error("This device has already voted on proposal {0}")]
    AlreadyVoted(String),

    #[error("Document store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("Store rejected the request: {0}")]
    Rejected(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid proposal: {0}")]
    InvalidProposal(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Could not hash password")]
    PasswordHash,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ShowcaseError {
    fn from(err: serde_json::Error) -> Self {
        ShowcaseError::Serialization(err.to_string())
    }
}

/// Result type alias for showcase operations.
pub type ShowcaseResult<T> = Result<T, ShowcaseError>;
