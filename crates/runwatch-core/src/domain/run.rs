//! Pipeline runs and workflow definitions as seen through the CI API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque handle of a pipeline run, used for follow-up lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a workflow (pipeline definition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowId(pub u64);

impl std::fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a run.
///
/// GitHub reports a few pre-start states (`requested`, `waiting`, `pending`)
/// that carry no extra meaning here; they deserialize as [`RunStatus::Pending`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    Completed,
    #[serde(other)]
    Pending,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::Completed => "completed",
            RunStatus::Pending => "pending",
        }
    }

    /// Whether the run has reached its terminal state.
    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final outcome of a completed run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Failure,
    Skipped,
    Cancelled,
    TimedOut,
    ActionRequired,
    Neutral,
    StartupFailure,
    Stale,
    #[serde(other)]
    Unknown,
}

impl Conclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conclusion::Success => "success",
            Conclusion::Failure => "failure",
            Conclusion::Skipped => "skipped",
            Conclusion::Cancelled => "cancelled",
            Conclusion::TimedOut => "timed_out",
            Conclusion::ActionRequired => "action_required",
            Conclusion::Neutral => "neutral",
            Conclusion::StartupFailure => "startup_failure",
            Conclusion::Stale => "stale",
            Conclusion::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Conclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Conclusion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "success" => Ok(Conclusion::Success),
            "failure" => Ok(Conclusion::Failure),
            "skipped" => Ok(Conclusion::Skipped),
            "cancelled" => Ok(Conclusion::Cancelled),
            "timed_out" => Ok(Conclusion::TimedOut),
            "action_required" => Ok(Conclusion::ActionRequired),
            "neutral" => Ok(Conclusion::Neutral),
            "startup_failure" => Ok(Conclusion::StartupFailure),
            "stale" => Ok(Conclusion::Stale),
            "unknown" => Ok(Conclusion::Unknown),
            other => Err(format!("unknown conclusion: {other}")),
        }
    }
}

/// A single execution of a workflow.
///
/// Runs are never mutated locally: the watcher re-fetches them until the
/// status turns `completed`, after which the record no longer changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineRun {
    pub id: RunId,

    /// Workflow name as reported on the run.
    pub name: String,

    /// Free-text title; release tooling embeds its correlation token here.
    #[serde(default)]
    pub display_title: String,

    pub head_sha: String,

    pub status: RunStatus,

    /// Set only once `status` is `completed`.
    pub conclusion: Option<Conclusion>,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub run_number: u64,

    /// Triggering event (`push`, `release`, ...).
    #[serde(default)]
    pub event: String,

    #[serde(default)]
    pub html_url: String,
}

impl PipelineRun {
    /// Create a queued run with the fields the matcher cares about.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        display_title: impl Into<String>,
        head_sha: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RunId(id),
            name: name.into(),
            display_title: display_title.into(),
            head_sha: head_sha.into(),
            status: RunStatus::Queued,
            conclusion: None,
            created_at,
            run_number: id,
            event: "push".to_string(),
            html_url: String::new(),
        }
    }

    pub fn with_status(mut self, status: RunStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark the run completed with the given conclusion.
    pub fn completed(mut self, conclusion: Option<Conclusion>) -> Self {
        self.status = RunStatus::Completed;
        self.conclusion = conclusion;
        self
    }

    /// Conclusion to report once completed; `unknown` when the API left it empty.
    pub fn final_conclusion(&self) -> Option<Conclusion> {
        if self.status.is_completed() {
            Some(self.conclusion.unwrap_or(Conclusion::Unknown))
        } else {
            None
        }
    }
}

/// A pipeline definition registered in the repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,

    /// Defining file, e.g. `.github/workflows/onrelease.yml`.
    pub path: String,

    #[serde(default)]
    pub state: String,
}

impl Workflow {
    pub fn new(id: u64, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: WorkflowId(id),
            name: name.into(),
            path: path.into(),
            state: "active".to_string(),
        }
    }

    /// Whether `reference` names this workflow, either by its display name or
    /// by the file name at the end of its path.
    pub fn is_named(&self, reference: &str) -> bool {
        self.name == reference || self.path.ends_with(&format!("/{reference}"))
    }
}
