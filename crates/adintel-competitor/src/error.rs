use thiserror::Error;

use crate::types::RawSearchPayload;

#[derive(Debug, Error)]
pub enum CompetitorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response whose body carried a recognizable search payload.
    ///
    /// These are normalized into the same response model as successes so the
    /// backend's structured failure details are never thrown away.
    #[error("backend error (status {status})")]
    Backend {
        status: u16,
        payload: RawSearchPayload,
    },

    /// Non-2xx response with no usable payload.
    #[error("backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Validation(String),
}
