//! Error taxonomy for runwatch.

use std::time::Duration;

use super::run::RunId;

/// Errors reported by a [`CiApi`](crate::ci_api::CiApi) implementation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("run not found: {0}")]
    RunNotFound(RunId),
}

impl ApiError {
    /// Whether retrying the same request later can succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(_) | ApiError::RateLimited(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
            ApiError::Decode(_) | ApiError::RunNotFound(_) => false,
        }
    }
}

/// Why the watcher stopped before the run completed.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("run {run_id} did not complete within {waited:?}")]
    DeadlineExceeded { run_id: RunId, waited: Duration },

    #[error("gave up watching run {run_id}: {source}")]
    Api {
        run_id: RunId,
        #[source]
        source: ApiError,
    },
}

/// Errors raised while setting up a wait.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid criteria: {0}")]
    InvalidCriteria(String),
}

/// Result type for runwatch setup operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Result type for CI API calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
