//! runwatch GitHub backend
//!
//! [`GitHubClient`] implements [`runwatch_core::CiApi`] against the GitHub
//! Actions REST API. [`wait_on_action`] wires it into a
//! [`WaitOrchestrator`] for the common single-wait case.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

use std::sync::Arc;

use anyhow::Context;
use runwatch_core::{MatchCriteria, Messages, Progress, WaitConfig, WaitOrchestrator, WaitResult};

pub use client::GitHubClient;
pub use config::{GitHubConfig, DEFAULT_API_URL};
pub use error::GitHubError;

/// Result type for GitHub client setup
pub type Result<T> = std::result::Result<T, GitHubError>;

/// Wait for the run `criteria` identifies on GitHub and validate it against `expected`.
pub async fn wait_on_action(
    github: GitHubConfig,
    criteria: &MatchCriteria,
    expected: &str,
    messages: &Messages,
    wait: WaitConfig,
    progress: &mut dyn Progress,
) -> anyhow::Result<WaitResult> {
    let repo = github.repo.clone();
    let client = GitHubClient::new(github).context("failed to create GitHub client")?;
    let orchestrator = WaitOrchestrator::new(Arc::new(client), wait)
        .context("invalid wait configuration")?
        .with_repository(&repo);

    orchestrator
        .run(criteria, expected, messages, progress)
        .await
        .with_context(|| format!("wait on {repo} failed"))
}
