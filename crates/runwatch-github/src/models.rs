//! Wire shapes of the GitHub Actions REST responses.
//!
//! Only the fields the waiter reads are declared; serde skips the rest.

use chrono::{DateTime, Utc};
use runwatch_core::{Conclusion, PipelineRun, RunId, RunStatus, Workflow, WorkflowId};
use serde::Deserialize;

/// `GET /repos/{repo}/actions/workflows`
#[derive(Debug, Deserialize)]
pub struct WorkflowsPage {
    pub total_count: u64,
    pub workflows: Vec<WireWorkflow>,
}

#[derive(Debug, Deserialize)]
pub struct WireWorkflow {
    pub id: u64,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub state: String,
}

impl From<WireWorkflow> for Workflow {
    fn from(w: WireWorkflow) -> Self {
        Workflow {
            id: WorkflowId(w.id),
            name: w.name,
            path: w.path,
            state: w.state,
        }
    }
}

/// `GET /repos/{repo}/actions/workflows/{id}/runs`
#[derive(Debug, Deserialize)]
pub struct RunsPage {
    pub total_count: u64,
    pub workflow_runs: Vec<WireRun>,
}

/// A workflow run as GitHub serializes it. `name`, `display_title` and
/// `conclusion` are nullable on the wire.
#[derive(Debug, Deserialize)]
pub struct WireRun {
    pub id: u64,
    pub name: Option<String>,
    pub display_title: Option<String>,
    pub head_sha: String,
    pub status: Option<RunStatus>,
    pub conclusion: Option<Conclusion>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub run_number: u64,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub html_url: String,
}

impl From<WireRun> for PipelineRun {
    fn from(r: WireRun) -> Self {
        PipelineRun {
            id: RunId(r.id),
            name: r.name.unwrap_or_default(),
            display_title: r.display_title.unwrap_or_default(),
            head_sha: r.head_sha,
            status: r.status.unwrap_or(RunStatus::Pending),
            conclusion: r.conclusion,
            created_at: r.created_at,
            run_number: r.run_number,
            event: r.event,
            html_url: r.html_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUNS_FIXTURE: &str = r#"{
        "total_count": 2,
        "workflow_runs": [
            {
                "id": 30433642,
                "name": "Release",
                "display_title": "Release v1.4.0 with Test ID 7f3a",
                "head_sha": "acb5820ced9479c074f688cc328bf03f341a511d",
                "status": "completed",
                "conclusion": "startup_failure",
                "created_at": "2025-03-01T12:00:05Z",
                "run_number": 562,
                "event": "release",
                "html_url": "https://github.com/octo/release-demo/actions/runs/30433642",
                "run_attempt": 1
            },
            {
                "id": 30433643,
                "name": null,
                "display_title": null,
                "head_sha": "acb5820ced9479c074f688cc328bf03f341a511d",
                "status": "waiting",
                "conclusion": null,
                "created_at": "2025-03-01T12:00:09Z"
            }
        ]
    }"#;

    #[test]
    fn test_runs_page_decodes() {
        let page: RunsPage = serde_json::from_str(RUNS_FIXTURE).unwrap();
        assert_eq!(page.total_count, 2);

        let runs: Vec<PipelineRun> = page.workflow_runs.into_iter().map(Into::into).collect();
        assert_eq!(runs[0].id, RunId(30433642));
        assert_eq!(runs[0].final_conclusion(), Some(Conclusion::StartupFailure));
        assert_eq!(runs[0].event, "release");
    }

    #[test]
    fn test_nullable_fields_become_empty() {
        let page: RunsPage = serde_json::from_str(RUNS_FIXTURE).unwrap();
        let run: PipelineRun = page.workflow_runs.into_iter().nth(1).unwrap().into();

        assert_eq!(run.name, "");
        assert_eq!(run.display_title, "");
        assert_eq!(run.status, RunStatus::Pending);
        assert_eq!(run.final_conclusion(), None);
    }

    #[test]
    fn test_unrecognized_conclusion_is_unknown() {
        let json = r#"{
            "id": 1, "name": "CI", "display_title": "x", "head_sha": "abc",
            "status": "completed", "conclusion": "some_future_value",
            "created_at": "2025-03-01T12:00:00Z"
        }"#;
        let run: PipelineRun = serde_json::from_str::<WireRun>(json).unwrap().into();
        assert_eq!(run.final_conclusion(), Some(Conclusion::Unknown));
    }

    #[test]
    fn test_workflows_page_decodes() {
        let json = r#"{
            "total_count": 1,
            "workflows": [
                {"id": 161335, "node_id": "MDg6V29ya2Zsb3cxNjEzMzU=", "name": "Release",
                 "path": ".github/workflows/onrelease.yml", "state": "active"}
            ]
        }"#;
        let page: WorkflowsPage = serde_json::from_str(json).unwrap();
        let workflow: Workflow = page.workflows.into_iter().next().unwrap().into();

        assert_eq!(workflow.id, WorkflowId(161335));
        assert!(workflow.is_named("onrelease.yml"));
        assert!(workflow.is_named("Release"));
    }
}
