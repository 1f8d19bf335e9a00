//! Outcome of one wait.

use serde::{Deserialize, Serialize};

use super::run::{Conclusion, RunId};

/// Terminal state of a wait, mapped one-to-one onto process exit codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WaitOutcome {
    /// A run was found and concluded as expected.
    Passed,

    /// A run was found but concluded differently.
    Mismatched,

    /// No matching run appeared before the search timeout.
    NoRunFound,

    /// A run was found but watching it was abandoned (deadline or fatal API error).
    WatchAborted,
}

impl WaitOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            WaitOutcome::Passed => 0,
            WaitOutcome::Mismatched => 1,
            WaitOutcome::NoRunFound => 2,
            WaitOutcome::WatchAborted => 3,
        }
    }
}

/// Result handed back to the caller of the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaitResult {
    pub outcome: WaitOutcome,

    /// Run that was watched, if one matched.
    pub run_id: Option<RunId>,

    /// Conclusion observed on the watched run.
    pub conclusion: Option<Conclusion>,

    pub message: String,
}

impl WaitResult {
    pub fn exit_code(&self) -> u8 {
        self.outcome.exit_code()
    }

    pub fn passed(&self) -> bool {
        self.outcome == WaitOutcome::Passed
    }
}
