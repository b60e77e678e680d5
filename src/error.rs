//! Error types shared by the front ends
//!
//! Every failure that can end an analysis attempt lands in one of these
//! enums, and each carries the message a user should see. None of them is
//! fatal to a session: the state machine records the message and the user
//! can submit again.

use std::path::PathBuf;
use thiserror::Error;

/// Fixed message shown when the backend never answered.
pub const NO_RESPONSE_MESSAGE: &str = "No response from backend. Is the server running?";

/// Rejected user input, caught before any network call.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Please enter an image URL.")]
    EmptyUrl,

    #[error("Please enter a valid image URL (https://...)")]
    InvalidUrl(String),

    #[error("Unsupported file type '{0}' (supported: png, jpg, jpeg, gif, webp)")]
    UnsupportedFileType(String),

    #[error("Could not read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Transport-level failure talking to the analysis backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Nothing came back: refused connection, timeout, reset.
    #[error("{}", NO_RESPONSE_MESSAGE)]
    NoResponse(#[source] reqwest::Error),

    /// The request never left the client.
    #[error("{0}")]
    Request(String),

    /// A 2xx body that was not the JSON we expected.
    #[error("Malformed response from backend: {0}")]
    Malformed(#[source] serde_json::Error),
}

impl ApiError {
    /// Message to surface in the UI for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Request(msg) if msg.is_empty() => "Unexpected error".to_string(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Why a submission did not start an analysis.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("An analysis is already in progress")]
    Busy,

    #[error(transparent)]
    Input(#[from] InputError),
}

/// Failure writing a report file.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Unsupported report format '{0}' (use .html or .json)")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
