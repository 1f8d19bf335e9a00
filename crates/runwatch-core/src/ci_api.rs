//! CI API abstraction.
//!
//! The locator and watcher only talk to the CI service through [`CiApi`].
//! Credentials and the repository path belong to the concrete client; the
//! core never inspects them. An in-memory fake lives in [`crate::fakes`].

use async_trait::async_trait;

use crate::domain::error::ApiResult;
use crate::domain::run::{PipelineRun, RunId, Workflow};

/// Read-only view of a CI service scoped to one repository.
#[async_trait]
pub trait CiApi: Send + Sync {
    /// List the workflows registered in the repository.
    async fn list_workflows(&self) -> ApiResult<Vec<Workflow>>;

    /// List the runs of `workflow`.
    ///
    /// `head_sha` is a narrowing hint; implementations may ignore it, so
    /// callers must still filter the result themselves.
    async fn list_runs(&self, workflow: &Workflow, head_sha: Option<&str>)
        -> ApiResult<Vec<PipelineRun>>;

    /// Fetch the current state of a single run.
    async fn get_run(&self, run_id: RunId) -> ApiResult<PipelineRun>;
}
