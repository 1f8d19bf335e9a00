//! GitHub Actions REST client
//!
//! Implements [`CiApi`] over the three endpoints the waiter needs: workflow
//! listing, per-workflow run listing and single-run lookup.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use runwatch_core::{ApiError, ApiResult, CiApi, PipelineRun, RunId, Workflow};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::GitHubConfig;
use crate::error::{status_error, transport_error, GitHubError};
use crate::models::{RunsPage, WireRun, WorkflowsPage};
use crate::Result;

const API_VERSION: &str = "2022-11-28";

/// Authenticated client for one repository
pub struct GitHubClient {
    config: GitHubConfig,
    http_client: reqwest::Client,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(config: GitHubConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(API_VERSION),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| GitHubError::InvalidConfig("token is not a valid header value".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(GitHubClient {
            config,
            http_client,
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GitHubConfig::from_env())
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        debug!("GET {url} {query:?}");
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let remaining = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), remaining.as_deref(), &body));
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn page_query(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("per_page", self.config.per_page.to_string()),
            ("page", page.to_string()),
        ]
    }
}

/// Page to request after `page`, or `None` once the listing is exhausted or
/// the page cap is reached.
fn next_page(page: u32, page_len: usize, collected: usize, total: u64, config: &GitHubConfig) -> Option<u32> {
    let short_page = page_len < config.per_page as usize;
    if short_page || collected as u64 >= total || page >= config.max_pages {
        None
    } else {
        Some(page + 1)
    }
}

#[async_trait]
impl CiApi for GitHubClient {
    async fn list_workflows(&self) -> ApiResult<Vec<Workflow>> {
        let url = self.config.repo_url("actions/workflows");
        let mut workflows = Vec::new();
        let mut page = 1;

        loop {
            let body: WorkflowsPage = self.get_json(&url, &self.page_query(page)).await?;
            let page_len = body.workflows.len();
            workflows.extend(body.workflows.into_iter().map(Workflow::from));
            match next_page(page, page_len, workflows.len(), body.total_count, &self.config) {
                Some(next) => page = next,
                None => break,
            }
        }

        debug!("Listed {} workflow(s)", workflows.len());
        Ok(workflows)
    }

    async fn list_runs(
        &self,
        workflow: &Workflow,
        head_sha: Option<&str>,
    ) -> ApiResult<Vec<PipelineRun>> {
        let url = self
            .config
            .repo_url(&format!("actions/workflows/{}/runs", workflow.id));
        let mut runs = Vec::new();
        let mut page = 1;

        loop {
            let mut query = self.page_query(page);
            if let Some(sha) = head_sha {
                query.push(("head_sha", sha.to_string()));
            }
            let body: RunsPage = self.get_json(&url, &query).await?;
            let page_len = body.workflow_runs.len();
            runs.extend(body.workflow_runs.into_iter().map(PipelineRun::from));
            match next_page(page, page_len, runs.len(), body.total_count, &self.config) {
                Some(next) => page = next,
                None => break,
            }
        }

        debug!("Listed {} run(s) of workflow {}", runs.len(), workflow.id);
        Ok(runs)
    }

    async fn get_run(&self, run_id: RunId) -> ApiResult<PipelineRun> {
        let url = self.config.repo_url(&format!("actions/runs/{run_id}"));
        match self.get_json::<WireRun>(&url, &[]).await {
            Ok(run) => Ok(run.into()),
            Err(ApiError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(ApiError::RunNotFound(run_id))
            }
            Err(e) => Err(e),
        }
    }
}
