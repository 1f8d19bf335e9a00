//! runwatch Core Library
//!
//! Waits on the CI pipeline run a commit triggered and checks how it ended.
//!
//! The pieces, leaves first:
//!
//! - [`RunLocator`] finds the runs of a workflow for a commit (and optional
//!   correlation token), newest first.
//! - [`RunWatcher`] polls one run until it completes.
//! - [`OutcomeValidator`] compares the conclusion with the expected one.
//! - [`WaitOrchestrator`] ties them into one bounded wait.
//!
//! All CI access goes through the [`CiApi`] trait; [`fakes::MemoryCiApi`]
//! implements it in memory for tests.

pub mod ci_api;
pub mod config;
pub mod domain;
pub mod fakes;
pub mod locator;
pub mod obs;
pub mod orchestrator;
pub mod progress;
pub mod telemetry;
pub mod validator;
pub mod watcher;

pub use ci_api::CiApi;
pub use config::{Messages, WaitConfig, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT};
pub use domain::{
    ApiError, ApiResult, Conclusion, CoreError, MatchCriteria, PipelineRun, Result, RunId,
    RunStatus, TokenPolicy, WaitOutcome, WaitResult, WatchError, Workflow, WorkflowId,
};
pub use locator::{resolve_workflow, select_runs, RunLocator};
pub use orchestrator::WaitOrchestrator;
pub use progress::{DotProgress, LogProgress, NoProgress, Progress};
pub use telemetry::init_tracing;
pub use validator::{OutcomeValidator, Verdict};
pub use watcher::RunWatcher;

/// runwatch version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
