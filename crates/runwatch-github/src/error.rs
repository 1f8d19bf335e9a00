//! Error types for runwatch-github

use runwatch_core::ApiError;
use thiserror::Error;

/// Errors raised while setting up the GitHub client
#[derive(Error, Debug)]
pub enum GitHubError {
    /// Repository path is missing
    #[error("GitHub repository is not configured (expected owner/repo)")]
    RepositoryNotConfigured,

    /// Token is missing
    #[error("GitHub token is not configured")]
    TokenNotConfigured,

    /// Invalid configuration value
    #[error("Invalid GitHub configuration: {0}")]
    InvalidConfig(String),

    /// HTTP client construction failed
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for GitHubError {
    fn from(err: reqwest::Error) -> Self {
        GitHubError::Http(err.to_string())
    }
}

/// Map a failed request (no usable HTTP status) onto the core taxonomy.
pub(crate) fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Transport(err.to_string())
    }
}

/// Map a non-success HTTP response onto the core taxonomy.
///
/// GitHub signals primary rate limiting with 403 plus
/// `x-ratelimit-remaining: 0`, and secondary limits with 429.
pub(crate) fn status_error(status: u16, ratelimit_remaining: Option<&str>, body: &str) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    if status == 429 || (status == 403 && ratelimit_remaining == Some("0")) {
        ApiError::RateLimited(message)
    } else {
        ApiError::Status { status, message }
    }
}
