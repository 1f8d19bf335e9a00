//! Wait configuration.

use std::time::Duration;

use crate::domain::criteria::TokenPolicy;
use crate::domain::error::{CoreError, Result};

/// Default upper bound on the search phase.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default delay between two polls of the CI API.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Timing and matching knobs for a single wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitConfig {
    /// How long to search for a matching run before giving up.
    pub timeout: Duration,

    /// Fixed delay between polls, also applied once before the first search.
    pub poll_interval: Duration,

    /// Upper bound on watching a matched run. `None` waits until it completes.
    pub watch_timeout: Option<Duration>,

    pub token_policy: TokenPolicy,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            watch_timeout: None,
            token_policy: TokenPolicy::Strict,
        }
    }
}

impl WaitConfig {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
            ..Self::default()
        }
    }

    pub fn with_watch_timeout(mut self, watch_timeout: Duration) -> Self {
        self.watch_timeout = Some(watch_timeout);
        self
    }

    pub fn with_token_policy(mut self, policy: TokenPolicy) -> Self {
        self.token_policy = policy;
        self
    }

    /// Reject settings that would spin the poll loop.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(CoreError::InvalidConfig(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.watch_timeout.is_some_and(|t| t.is_zero()) {
            return Err(CoreError::InvalidConfig(
                "watch timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Caller-supplied wording for the final verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages {
    pub success: Option<String>,
    pub error: Option<String>,
}

impl Messages {
    pub fn new(success: Option<String>, error: Option<String>) -> Self {
        Self { success, error }
    }
}
