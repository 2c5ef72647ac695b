//! Error types for the focus timer and its persistence collaborator

use thiserror::Error;

/// Failure while handing a finished session to the planner API
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("No authentication token available")]
    MissingCredential,

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx answer; `message` comes from the body when the server sent one
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid response from planner API: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug)]
pub enum FocusError {
    #[error("Failed to lock timer state: {0}")]
    StatePoisoned(String),

    #[error("No session summary is pending")]
    NoPendingSummary,

    #[error("A session summary is already being saved")]
    SubmissionInProgress,

    #[error("Score must be between 1 and 5, got {0}")]
    InvalidScore(i64),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("Background task failed: {0}")]
    Task(String),
}

pub type Result<T, E = FocusError> = std::result::Result<T, E>;
