//! What the locator looks for.

use serde::{Deserialize, Serialize};

use super::run::PipelineRun;

/// How a correlation token that matches nothing is treated.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenPolicy {
    /// No run carries the token: report no match and let the caller poll again.
    #[default]
    Strict,

    /// No run carries the token: fall back to the runs matching the commit alone.
    FallbackToCommit,
}

/// Search criteria for a single wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCriteria {
    /// Workflow display name or file name (`onrelease.yml`).
    pub workflow: String,

    /// Head commit, compared verbatim.
    pub commit_sha: String,

    /// Substring expected in the display title or name of the run.
    pub correlation_token: Option<String>,
}

impl MatchCriteria {
    pub fn new(workflow: impl Into<String>, commit_sha: impl Into<String>) -> Self {
        Self {
            workflow: workflow.into(),
            commit_sha: commit_sha.into(),
            correlation_token: None,
        }
    }

    pub fn with_correlation_token(mut self, token: impl Into<String>) -> Self {
        self.correlation_token = Some(token.into());
        self
    }

    /// Exact, case-sensitive comparison of the head commit.
    pub fn matches_commit(&self, run: &PipelineRun) -> bool {
        run.head_sha == self.commit_sha
    }

    /// True when no token was given or the token occurs in the title or name.
    pub fn matches_token(&self, run: &PipelineRun) -> bool {
        match &self.correlation_token {
            None => true,
            Some(token) => run.display_title.contains(token) || run.name.contains(token),
        }
    }

    /// Human suffix used in progress messages, e.g. ` with Test ID t-1`.
    pub fn token_suffix(&self) -> String {
        self.correlation_token
            .as_deref()
            .map(|t| format!(" with Test ID {t}"))
            .unwrap_or_default()
    }
}
