//! wait-on-action - block until the CI run a commit triggered has finished
//!
//! Finds the GitHub Actions run of `--workflow` for `--commit` (optionally
//! tagged with `--test-id` in its title), waits for it to complete and exits
//! with:
//!
//! - `0`: concluded as `--expected`
//! - `1`: concluded differently
//! - `2`: no matching run appeared within `--timeout`
//! - `3`: the run was found but watching it was abandoned
//! - `4`: the wait could not start (bad arguments or configuration)

use std::process::ExitCode;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use runwatch_core::{
    DotProgress, LogProgress, MatchCriteria, Messages, Progress, TokenPolicy, WaitConfig,
    WaitResult,
};
use runwatch_github::{wait_on_action, GitHubConfig, DEFAULT_API_URL};
use tracing::{error, Level};

/// Exit status when the wait never started; distinct from every wait outcome.
const EXIT_SETUP_FAILED: u8 = 4;

#[derive(Parser, Debug)]
#[command(name = "wait-on-action")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Wait for a GitHub Actions run triggered by a commit and check its conclusion", long_about = None)]
struct Cli {
    /// GitHub token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Repository as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repo: String,

    /// Commit SHA that triggered the workflow
    #[arg(long)]
    commit: String,

    /// Workflow name or file name (e.g. onrelease.yml)
    #[arg(long)]
    workflow: String,

    /// Conclusion the run must reach
    #[arg(long, value_enum)]
    expected: ExpectedConclusion,

    /// Correlation token that must appear in the run title
    #[arg(long, visible_alias = "correlation-token")]
    test_id: Option<String>,

    /// Seconds to search for the run before giving up
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Seconds between polls
    #[arg(long, default_value_t = 5)]
    poll_interval: u64,

    /// Seconds to watch a matched run before giving up (default: no limit)
    #[arg(long)]
    watch_timeout: Option<u64>,

    /// Accept commit-only matches when no run carries the test id
    #[arg(long)]
    token_fallback: bool,

    /// Message printed when the conclusion matches
    #[arg(long)]
    message: Option<String>,

    /// Message printed when the conclusion differs
    #[arg(long)]
    error: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[value(rename_all = "snake_case")]
enum ExpectedConclusion {
    Success,
    Failure,
    Skipped,
    Cancelled,
    StartupFailure,
    TimedOut,
    ActionRequired,
    Neutral,
}

impl ExpectedConclusion {
    fn as_str(self) -> &'static str {
        match self {
            ExpectedConclusion::Success => "success",
            ExpectedConclusion::Failure => "failure",
            ExpectedConclusion::Skipped => "skipped",
            ExpectedConclusion::Cancelled => "cancelled",
            ExpectedConclusion::StartupFailure => "startup_failure",
            ExpectedConclusion::TimedOut => "timed_out",
            ExpectedConclusion::ActionRequired => "action_required",
            ExpectedConclusion::Neutral => "neutral",
        }
    }
}

impl Cli {
    fn criteria(&self) -> MatchCriteria {
        let criteria = MatchCriteria::new(&self.workflow, &self.commit);
        match &self.test_id {
            Some(token) => criteria.with_correlation_token(token),
            None => criteria,
        }
    }

    fn wait_config(&self) -> WaitConfig {
        let mut config = WaitConfig::new(
            Duration::from_secs(self.timeout),
            Duration::from_secs(self.poll_interval),
        );
        if let Some(secs) = self.watch_timeout {
            config = config.with_watch_timeout(Duration::from_secs(secs));
        }
        if self.token_fallback {
            config = config.with_token_policy(TokenPolicy::FallbackToCommit);
        }
        config
    }

    fn github_config(&self) -> GitHubConfig {
        GitHubConfig::new(&self.repo, &self.token).with_api_url(&self.api_url)
    }

    fn messages(&self) -> Messages {
        Messages::new(self.message.clone(), self.error.clone())
    }
}

/// Exit status for a finished wait, or [`EXIT_SETUP_FAILED`] when it never ran.
fn exit_status(result: anyhow::Result<WaitResult>) -> u8 {
    match result {
        Ok(result) => result.exit_code(),
        Err(e) => {
            error!("❌ Error: {e:#}");
            EXIT_SETUP_FAILED
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // clap's own usage status (2) would read as "no run found".
            let _ = e.print();
            return ExitCode::from(EXIT_SETUP_FAILED);
        }
    };

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    runwatch_core::init_tracing(cli.json, level);

    // Dots only make sense on a plain console.
    let mut progress: Box<dyn Progress> = if cli.verbose || cli.json {
        Box::new(LogProgress)
    } else {
        Box::new(DotProgress::stdout())
    };

    let result = wait_on_action(
        cli.github_config(),
        &cli.criteria(),
        cli.expected.as_str(),
        &cli.messages(),
        cli.wait_config(),
        progress.as_mut(),
    )
    .await;

    ExitCode::from(exit_status(result))
}
