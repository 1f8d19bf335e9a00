//! `GitHubClient` against a local HTTP stub of the Actions API.

use std::sync::{Arc, Mutex};

use runwatch_core::{ApiError, CiApi, RunId, Workflow};
use runwatch_github::{GitHubClient, GitHubConfig};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const REPO: &str = "octo/release-demo";
const SHA: &str = "acb5820ced9479c074f688cc328bf03f341a511d";

struct Reply {
    status: u16,
    headers: Vec<(&'static str, String)>,
    body: String,
}

impl Reply {
    fn ok(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn status(status: u16, message: &str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: json!({ "message": message }).to_string(),
        }
    }

    fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }
}

type Route = dyn Fn(&str) -> Reply + Send + Sync;

/// Serves one canned reply per connection and records each request target.
struct Stub {
    base_url: String,
    targets: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    async fn start(route: impl Fn(&str) -> Reply + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let targets = Arc::new(Mutex::new(Vec::new()));
        let route: Arc<Route> = Arc::new(route);

        let recorded = targets.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&head);
                let target = head
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or_default()
                    .to_string();
                recorded.lock().unwrap().push(target.clone());

                let reply = route(&target);
                let mut response = format!(
                    "HTTP/1.1 {} STUB\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n",
                    reply.status,
                    reply.body.len()
                );
                for (name, value) in &reply.headers {
                    response.push_str(&format!("{name}: {value}\r\n"));
                }
                response.push_str("\r\n");
                response.push_str(&reply.body);
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { base_url, targets }
    }

    fn client(&self, per_page: u32) -> GitHubClient {
        let config = GitHubConfig::new(REPO, "ghp_test")
            .with_api_url(&self.base_url)
            .with_per_page(per_page);
        GitHubClient::new(config).unwrap()
    }

    fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

/// Value of `key` in the query string of a request target.
fn query_param<'a>(target: &'a str, key: &str) -> Option<&'a str> {
    let (_, query) = target.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

fn wire_run(id: u64, status: &str, conclusion: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Release",
        "display_title": format!("Release with Test ID t-{id}"),
        "head_sha": SHA,
        "status": status,
        "conclusion": conclusion,
        "created_at": "2025-03-01T12:00:00Z",
        "run_number": id,
        "event": "release",
        "html_url": format!("https://github.com/{REPO}/actions/runs/{id}")
    })
}

fn release_workflow() -> Workflow {
    Workflow::new(161335, "Release", ".github/workflows/onrelease.yml")
}

#[tokio::test]
async fn test_list_runs_follows_pages_until_total_count() {
    let stub = Stub::start(|target| {
        let page: u64 = query_param(target, "page").unwrap_or("1").parse().unwrap();
        let runs: Vec<_> = match page {
            1 => vec![wire_run(1, "completed", Some("success")), wire_run(2, "queued", None)],
            2 => vec![wire_run(3, "in_progress", None), wire_run(4, "completed", Some("failure"))],
            _ => vec![wire_run(5, "waiting", None)],
        };
        Reply::ok(json!({ "total_count": 5, "workflow_runs": runs }))
    })
    .await;

    let runs = stub
        .client(2)
        .list_runs(&release_workflow(), Some(SHA))
        .await
        .unwrap();

    let ids: Vec<u64> = runs.iter().map(|r| r.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    let targets = stub.targets();
    assert_eq!(targets.len(), 3);
    for (i, target) in targets.iter().enumerate() {
        assert!(target.starts_with(&format!(
            "/repos/{REPO}/actions/workflows/161335/runs?"
        )));
        assert_eq!(query_param(target, "head_sha"), Some(SHA));
        assert_eq!(query_param(target, "per_page"), Some("2"));
        assert_eq!(query_param(target, "page"), Some((i + 1).to_string().as_str()));
    }
}

#[tokio::test]
async fn test_list_runs_without_sha_hint_omits_parameter() {
    let stub = Stub::start(|_| Reply::ok(json!({ "total_count": 0, "workflow_runs": [] }))).await;

    let runs = stub
        .client(100)
        .list_runs(&release_workflow(), None)
        .await
        .unwrap();

    assert!(runs.is_empty());
    let targets = stub.targets();
    assert_eq!(targets.len(), 1);
    assert_eq!(query_param(&targets[0], "head_sha"), None);
}

#[tokio::test]
async fn test_list_workflows_stops_on_short_page() {
    let stub = Stub::start(|target| {
        let workflows = match query_param(target, "page") {
            Some("1") => json!([
                {"id": 1, "name": "CI", "path": ".github/workflows/ci.yml", "state": "active"},
                {"id": 2, "name": "Docs", "path": ".github/workflows/docs.yml", "state": "active"}
            ]),
            _ => json!([
                {"id": 161335, "name": "Release", "path": ".github/workflows/onrelease.yml", "state": "active"}
            ]),
        };
        Reply::ok(json!({ "total_count": 3, "workflows": workflows }))
    })
    .await;

    let workflows = stub.client(2).list_workflows().await.unwrap();

    assert_eq!(workflows.len(), 3);
    assert!(workflows[2].is_named("onrelease.yml"));
    assert_eq!(stub.targets().len(), 2);
    assert!(stub.targets()[0].starts_with(&format!("/repos/{REPO}/actions/workflows?")));
}

#[tokio::test]
async fn test_get_run_decodes_current_state() {
    let stub = Stub::start(|_| Reply::ok(wire_run(42, "completed", Some("timed_out")))).await;

    let run = stub.client(100).get_run(RunId(42)).await.unwrap();

    assert_eq!(run.id, RunId(42));
    assert_eq!(run.conclusion.map(|c| c.as_str()), Some("timed_out"));
    assert_eq!(stub.targets(), vec![format!("/repos/{REPO}/actions/runs/42")]);
}

#[tokio::test]
async fn test_get_run_missing_is_run_not_found() {
    let stub = Stub::start(|_| Reply::status(404, "Not Found")).await;

    let err = stub.client(100).get_run(RunId(99)).await.unwrap_err();

    assert!(matches!(err, ApiError::RunNotFound(RunId(99))));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_exhausted_quota_is_rate_limited() {
    let stub = Stub::start(|_| {
        Reply::status(403, "API rate limit exceeded").with_header("x-ratelimit-remaining", "0")
    })
    .await;

    let err = stub.client(100).list_workflows().await.unwrap_err();

    assert!(matches!(err, ApiError::RateLimited(ref m) if m == "API rate limit exceeded"));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let stub = Stub::start(|_| Reply {
        status: 200,
        headers: Vec::new(),
        body: "{\"total_count\": ".to_string(),
    })
    .await;

    let err = stub
        .client(100)
        .list_runs(&release_workflow(), Some(SHA))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}
