//! Run Locator: find the runs a commit triggered.
//!
//! Resolution is forgiving: a workflow that is not registered yet, or any
//! API error, yields an empty result rather than an error. The orchestrator
//! polls again later.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::ci_api::CiApi;
use crate::domain::criteria::{MatchCriteria, TokenPolicy};
use crate::domain::error::ApiResult;
use crate::domain::run::{PipelineRun, Workflow};

/// Finds the pipeline runs matching a commit and correlation token.
pub struct RunLocator {
    api: Arc<dyn CiApi>,
    policy: TokenPolicy,
}

impl RunLocator {
    pub fn new(api: Arc<dyn CiApi>, policy: TokenPolicy) -> Self {
        Self { api, policy }
    }

    /// Runs of `criteria.workflow` matching the commit (and token), newest first.
    ///
    /// Never fails: unresolved workflows and API errors are logged and
    /// reported as "nothing found".
    pub async fn find_runs(&self, criteria: &MatchCriteria) -> Vec<PipelineRun> {
        debug!(
            "Looking for workflow runs for commit {}",
            criteria.commit_sha
        );
        if let Some(token) = &criteria.correlation_token {
            debug!("Also filtering by Test ID: {token}");
        }

        match self.fetch_candidates(criteria).await {
            Ok(Some(runs)) => select_runs(runs, criteria, self.policy),
            Ok(None) => {
                error!("Workflow '{}' not found", criteria.workflow);
                Vec::new()
            }
            Err(e) => {
                error!("CI API error: {e}");
                Vec::new()
            }
        }
    }

    /// Resolve the workflow and list its runs. `None` when no workflow matches.
    async fn fetch_candidates(
        &self,
        criteria: &MatchCriteria,
    ) -> ApiResult<Option<Vec<PipelineRun>>> {
        let workflows = self.api.list_workflows().await?;
        let Some(workflow) = resolve_workflow(&workflows, &criteria.workflow) else {
            return Ok(None);
        };
        let runs = self
            .api
            .list_runs(workflow, Some(&criteria.commit_sha))
            .await?;
        Ok(Some(runs))
    }
}

/// First workflow named `reference`, by display name or file name.
pub fn resolve_workflow<'a>(workflows: &'a [Workflow], reference: &str) -> Option<&'a Workflow> {
    workflows.iter().find(|w| w.is_named(reference))
}

/// Filter `runs` down to the matches for `criteria` and order them newest first.
///
/// The commit must match exactly. When a correlation token is given and no
/// commit match carries it, the result depends on `policy`: `Strict` returns
/// nothing, `FallbackToCommit` returns the commit matches.
pub fn select_runs(
    runs: Vec<PipelineRun>,
    criteria: &MatchCriteria,
    policy: TokenPolicy,
) -> Vec<PipelineRun> {
    let by_commit: Vec<PipelineRun> = runs
        .into_iter()
        .filter(|run| criteria.matches_commit(run))
        .collect();

    let mut matched: Vec<PipelineRun> = by_commit
        .iter()
        .filter(|run| criteria.matches_token(run))
        .cloned()
        .collect();

    if matched.is_empty() {
        if let Some(token) = &criteria.correlation_token {
            match policy {
                TokenPolicy::Strict => {
                    debug!("No runs found with Test ID: {token}");
                }
                TokenPolicy::FallbackToCommit if !by_commit.is_empty() => {
                    warn!(
                        "No runs found with Test ID: {token}; using {} run(s) for commit {}",
                        by_commit.len(),
                        criteria.commit_sha
                    );
                    matched = by_commit;
                }
                TokenPolicy::FallbackToCommit => {}
            }
        }
    }

    sort_newest_first(&mut matched);
    matched
}

/// Creation time descending; ties go to the higher run id.
fn sort_newest_first(runs: &mut [PipelineRun]) {
    runs.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
