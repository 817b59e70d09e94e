//! Engine errors

use thiserror::Error;

use crate::model::TaskId;

/// Gesture-side failures
#[derive(Debug, Error)]
pub enum DragError {
    #[error("a drag session is already active for task {0}")]
    SessionActive(TaskId),
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("malformed drag payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Failures reported by a [`crate::TaskApi`] implementation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid response: {0}")]
    Decode(String),
}
