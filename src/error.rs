//! Error types for the onboarding wizard.

use uuid::Uuid;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Submission error: {0}")]
    Submit(#[from] SubmitError),
}

/// Record field update errors.
///
/// Incomplete *content* is never an error (the forward gates handle that);
/// these fire only for integration bugs — a field name outside the Record,
/// or a value of the wrong shape.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("Unknown record field: {name}")]
    UnknownField { name: String },

    #[error("Invalid value for field {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Session registry errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found: {id}")]
    NotFound { id: Uuid },
}

/// Submission boundary errors.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Submission endpoint rejected the record with status {status}")]
    Rejected { status: u16 },

    #[error("Submission transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for the wizard.
pub type Result<T> = std::result::Result<T, Error>;
