//! Structured observability hooks for the wait lifecycle.
//!
//! Emission functions for key lifecycle events: start, match, status,
//! conclusion, timeout and abort. The human-readable text of each event is
//! what the console shows; the structured fields are there for JSON output.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::config::WaitConfig;
use crate::domain::criteria::MatchCriteria;
use crate::domain::run::{Conclusion, PipelineRun, RunId, RunStatus};

/// Emit event: wait started. Parameters are dumped at debug level.
pub fn emit_wait_started(
    repository: Option<&str>,
    criteria: &MatchCriteria,
    expected: &str,
    config: &WaitConfig,
) {
    debug!("Starting workflow monitoring:");
    if let Some(repo) = repository {
        debug!("  Repo: {repo}");
    }
    debug!("  Commit SHA: {}", criteria.commit_sha);
    debug!("  Workflow: {}", criteria.workflow);
    if let Some(token) = &criteria.correlation_token {
        debug!("  Test ID: {token}");
    }
    debug!("  Expected Conclusion: {expected}");
    debug!("  Timeout: {} seconds", config.timeout.as_secs());
    debug!("  Poll Interval: {} seconds", config.poll_interval.as_secs());
    info!(
        event = "wait.started",
        commit_sha = %criteria.commit_sha,
        workflow = %criteria.workflow,
        timeout_secs = config.timeout.as_secs(),
        "Waiting for workflow to start (up to {} seconds)...",
        config.timeout.as_secs()
    );
}

/// Emit event: a run matching the criteria was found.
pub fn emit_run_matched(criteria: &MatchCriteria, run: &PipelineRun) {
    info!(
        event = "run.matched",
        run_id = %run.id,
        "✅ Workflow triggered by commit {}{}!",
        criteria.commit_sha,
        criteria.token_suffix()
    );
    debug!("Workflow Details:");
    debug!("  ID: {}", run.id);
    debug!("  Name: {}", run.name);
    debug!("  Display Title: {}", run.display_title);
    debug!("  Status: {}", run.status);
    debug!("  Created: {}", run.created_at);
}

/// Emit event: status observed while watching a run.
pub fn emit_run_status(run_id: RunId, status: RunStatus) {
    info!(
        event = "run.status",
        run_id = %run_id,
        status = %status,
        "Run #{run_id} - Status: {status}"
    );
}

/// Emit event: the watched run concluded.
pub fn emit_run_concluded(run_id: RunId, conclusion: Conclusion, expected: &str) {
    info!(
        event = "run.concluded",
        run_id = %run_id,
        conclusion = %conclusion,
        "Workflow concluded with status: {conclusion}"
    );
    info!("Expected status: {expected}");
}

/// Emit event: no run matched before the search timeout. Returns the message.
pub fn emit_no_run_found(criteria: &MatchCriteria, timeout: Duration) -> String {
    let message = format!(
        "❌ Error: No workflow was triggered by commit {}{} after {} seconds",
        criteria.commit_sha,
        criteria.token_suffix(),
        timeout.as_secs()
    );
    error!(event = "wait.no_run_found", "{message}");
    message
}

/// Emit event: watching was abandoned. Returns the message.
pub fn emit_watch_aborted(run_id: RunId, reason: &dyn std::fmt::Display) -> String {
    let message = format!("❌ Error: Stopped watching run #{run_id}: {reason}");
    error!(event = "wait.watch_aborted", run_id = %run_id, "{message}");
    message
}
