//! Wait Orchestrator: search for the run a commit triggered, watch it, validate it.
//!
//! One call to [`WaitOrchestrator::run`] drives a single wait through three
//! phases:
//!
//! - `Searching`: poll the locator at a fixed interval until a run matches or
//!   the search timeout elapses.
//! - `Watching`: follow the newest match until it completes. This phase is
//!   bounded only by `WaitConfig::watch_timeout`.
//! - `Done`: validate the conclusion, or report that nothing matched.
//!
//! The matched run is fixed once chosen, even if newer matches appear later.

use std::sync::Arc;

use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::ci_api::CiApi;
use crate::config::{Messages, WaitConfig};
use crate::domain::criteria::MatchCriteria;
use crate::domain::error::{CoreError, Result};
use crate::domain::result::{WaitOutcome, WaitResult};
use crate::domain::run::{Conclusion, PipelineRun};
use crate::locator::RunLocator;
use crate::obs::{
    emit_no_run_found, emit_run_concluded, emit_run_matched, emit_wait_started,
    emit_watch_aborted,
};
use crate::progress::Progress;
use crate::validator::OutcomeValidator;
use crate::watcher::RunWatcher;

/// Phase of a wait.
#[derive(Debug)]
enum Phase {
    Searching,
    Watching(Box<PipelineRun>),
    Done(WaitResult),
}

/// Composes locator, watcher and validator into one bounded wait.
pub struct WaitOrchestrator {
    locator: RunLocator,
    watcher: RunWatcher,
    config: WaitConfig,
    repository: Option<String>,
}

impl WaitOrchestrator {
    /// Build an orchestrator over `api`. Fails on an invalid `config`.
    pub fn new(api: Arc<dyn CiApi>, config: WaitConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            locator: RunLocator::new(api.clone(), config.token_policy),
            watcher: RunWatcher::new(api, config.poll_interval),
            config,
            repository: None,
        })
    }

    /// Name the repository being watched in the start-up log.
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn config(&self) -> &WaitConfig {
        &self.config
    }

    /// Wait for the run triggered by `criteria` and check it concluded as `expected`.
    ///
    /// Sleeps one poll interval before the first search to let the CI service
    /// register the run. The returned result maps onto exit codes 0 (passed),
    /// 1 (wrong conclusion), 2 (no run appeared) and 3 (watch abandoned).
    pub async fn run(
        &self,
        criteria: &MatchCriteria,
        expected: &str,
        messages: &Messages,
        progress: &mut dyn Progress,
    ) -> Result<WaitResult> {
        if criteria.commit_sha.is_empty() || criteria.workflow.is_empty() {
            return Err(CoreError::InvalidCriteria(
                "commit SHA and workflow must not be empty".to_string(),
            ));
        }

        emit_wait_started(
            self.repository.as_deref(),
            criteria,
            expected,
            &self.config,
        );
        sleep(self.config.poll_interval).await;

        let mut phase = Phase::Searching;
        loop {
            phase = match phase {
                Phase::Searching => self.search(criteria, progress).await,
                Phase::Watching(run) => self.watch(*run, expected, messages).await,
                Phase::Done(result) => return Ok(result),
            };
        }
    }

    /// Poll the locator until a run matches or the timeout elapses.
    async fn search(&self, criteria: &MatchCriteria, progress: &mut dyn Progress) -> Phase {
        let start = Instant::now();
        // A timeout too large to represent leaves the search unbounded.
        let deadline = start.checked_add(self.config.timeout);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let runs = self.locator.find_runs(criteria).await;
            if let Some(newest) = runs.into_iter().next() {
                progress.search_finished();
                emit_run_matched(criteria, &newest);
                return Phase::Watching(Box::new(newest));
            }
            progress.no_match_yet(attempt, start.elapsed());

            let mut nap = self.config.poll_interval;
            if let Some(deadline) = deadline {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                nap = nap.min(deadline - now);
            }
            sleep(nap).await;
        }

        progress.search_finished();
        debug!("Search gave up after {attempt} attempt(s)");
        Phase::Done(WaitResult {
            outcome: WaitOutcome::NoRunFound,
            run_id: None,
            conclusion: None,
            message: emit_no_run_found(criteria, self.config.timeout),
        })
    }

    /// Follow the matched run to completion and validate its conclusion.
    async fn watch(&self, run: PipelineRun, expected: &str, messages: &Messages) -> Phase {
        let deadline = self
            .config
            .watch_timeout
            .and_then(|t| Instant::now().checked_add(t));
        info!("Watching workflow run until completion:");

        let conclusion = match self.watcher.watch(run.id, deadline).await {
            Ok(conclusion) => conclusion,
            Err(e) => {
                return Phase::Done(WaitResult {
                    outcome: WaitOutcome::WatchAborted,
                    run_id: Some(run.id),
                    conclusion: None,
                    message: emit_watch_aborted(run.id, &e),
                });
            }
        };

        emit_run_concluded(run.id, conclusion, expected);
        Phase::Done(validated(&run, conclusion, expected, messages))
    }
}

fn validated(
    run: &PipelineRun,
    conclusion: Conclusion,
    expected: &str,
    messages: &Messages,
) -> WaitResult {
    let verdict = OutcomeValidator::validate(
        conclusion.as_str(),
        expected,
        messages.success.as_deref(),
        messages.error.as_deref(),
    );
    WaitResult {
        outcome: if verdict.passed {
            WaitOutcome::Passed
        } else {
            WaitOutcome::Mismatched
        },
        run_id: Some(run.id),
        conclusion: Some(conclusion),
        message: verdict.message,
    }
}
