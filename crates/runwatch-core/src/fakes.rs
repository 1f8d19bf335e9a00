//! In-memory fake of [`CiApi`] (testing only)
//!
//! `MemoryCiApi` serves a fixed set of workflows and scripted runs. A run can
//! stay hidden for a number of `list_runs` calls (CI registration lag) and can
//! walk through a sequence of snapshots on successive `get_run` calls
//! (queued → in progress → completed). Failures can be injected on both paths.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::ci_api::CiApi;
use crate::domain::error::{ApiError, ApiResult};
use crate::domain::run::{Conclusion, PipelineRun, RunId, RunStatus, Workflow, WorkflowId};

// ---------------------------------------------------------------------------
// RunScript
// ---------------------------------------------------------------------------

/// Successive states a run goes through, as observed by `get_run`.
///
/// The first snapshot is also what `list_runs` reports. The final snapshot
/// sticks once reached.
#[derive(Debug, Clone)]
pub struct RunScript {
    id: RunId,
    snapshots: VecDeque<PipelineRun>,
    visible_after_lists: u32,
}

impl RunScript {
    pub fn new(initial: PipelineRun) -> Self {
        Self {
            id: initial.id,
            snapshots: VecDeque::from([initial]),
            visible_after_lists: 0,
        }
    }

    fn push_from_last(&mut self, step: impl FnOnce(PipelineRun) -> PipelineRun) {
        if let Some(last) = self.snapshots.back().cloned() {
            self.snapshots.push_back(step(last));
        }
    }

    /// Append a snapshot with a new non-terminal status.
    pub fn then_status(mut self, status: RunStatus) -> Self {
        self.push_from_last(|run| run.with_status(status));
        self
    }

    /// Append a completed snapshot.
    pub fn then_complete(mut self, conclusion: Option<Conclusion>) -> Self {
        self.push_from_last(|run| run.completed(conclusion));
        self
    }

    /// Hide the run from the first `lists` calls to `list_runs`.
    pub fn visible_after(mut self, lists: u32) -> Self {
        self.visible_after_lists = lists;
        self
    }
}

// ---------------------------------------------------------------------------
// MemoryCiApi
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ScriptedRun {
    workflow: WorkflowId,
    script: RunScript,
}

#[derive(Debug, Default)]
struct State {
    workflows: Vec<Workflow>,
    runs: Vec<ScriptedRun>,
    list_calls: u32,
    get_calls: u32,
    workflow_failures: VecDeque<ApiError>,
    list_failures: VecDeque<ApiError>,
    get_failures: VecDeque<ApiError>,
}

/// In-memory CI service for one repository.
#[derive(Debug, Default)]
pub struct MemoryCiApi {
    state: Mutex<State>,
}

impl MemoryCiApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_workflow(&self, workflow: Workflow) {
        self.state().workflows.push(workflow);
    }

    /// Add a run that never changes state.
    pub fn add_run(&self, workflow: WorkflowId, run: PipelineRun) {
        self.add_script(workflow, RunScript::new(run));
    }

    pub fn add_script(&self, workflow: WorkflowId, script: RunScript) {
        self.state().runs.push(ScriptedRun { workflow, script });
    }

    /// Make the next call to `list_workflows` fail with `error`.
    pub fn fail_next_workflow_list(&self, error: ApiError) {
        self.state().workflow_failures.push_back(error);
    }

    /// Make the next call to `list_runs` fail with `error`.
    pub fn fail_next_list(&self, error: ApiError) {
        self.state().list_failures.push_back(error);
    }

    /// Make the next call to `get_run` fail with `error`.
    pub fn fail_next_get(&self, error: ApiError) {
        self.state().get_failures.push_back(error);
    }

    /// Number of `list_runs` calls served so far (including failures).
    pub fn list_calls(&self) -> u32 {
        self.state().list_calls
    }

    /// Number of `get_run` calls served so far (including failures).
    pub fn get_calls(&self) -> u32 {
        self.state().get_calls
    }
}

#[async_trait]
impl CiApi for MemoryCiApi {
    async fn list_workflows(&self) -> ApiResult<Vec<Workflow>> {
        let mut state = self.state();
        if let Some(err) = state.workflow_failures.pop_front() {
            return Err(err);
        }
        Ok(state.workflows.clone())
    }

    async fn list_runs(
        &self,
        workflow: &Workflow,
        _head_sha: Option<&str>,
    ) -> ApiResult<Vec<PipelineRun>> {
        let mut state = self.state();
        state.list_calls += 1;
        if let Some(err) = state.list_failures.pop_front() {
            return Err(err);
        }
        let calls = state.list_calls;
        Ok(state
            .runs
            .iter()
            .filter(|r| r.workflow == workflow.id && calls > r.script.visible_after_lists)
            .filter_map(|r| r.script.snapshots.front().cloned())
            .collect())
    }

    async fn get_run(&self, run_id: RunId) -> ApiResult<PipelineRun> {
        let mut state = self.state();
        state.get_calls += 1;
        if let Some(err) = state.get_failures.pop_front() {
            return Err(err);
        }
        let scripted = state
            .runs
            .iter_mut()
            .find(|r| r.script.id == run_id)
            .ok_or(ApiError::RunNotFound(run_id))?;

        let snapshots = &mut scripted.script.snapshots;
        let current = if snapshots.len() > 1 {
            snapshots.pop_front()
        } else {
            snapshots.front().cloned()
        };
        current.ok_or(ApiError::RunNotFound(run_id))
    }
}
