//! GitHub client configuration
//!
//! Values default from the environment variables GitHub Actions itself sets,
//! so the client works unconfigured inside a workflow.

use std::time::Duration;

use crate::error::GitHubError;
use crate::Result;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Largest page size the Actions API accepts.
const MAX_PER_PAGE: u32 = 100;

/// GitHub API configuration
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// REST base URL (differs on GitHub Enterprise Server)
    pub api_url: String,
    /// Repository as `owner/repo`
    pub repo: String,
    /// Bearer token
    pub token: String,
    pub user_agent: String,
    /// Runs and workflows requested per page
    pub per_page: u32,
    /// Upper bound on pages fetched per listing
    pub max_pages: u32,
    pub request_timeout: Duration,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        GitHubConfig {
            api_url: std::env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            repo: std::env::var("GITHUB_REPOSITORY").unwrap_or_default(),
            token: std::env::var("GITHUB_TOKEN").unwrap_or_default(),
            user_agent: format!("runwatch/{}", env!("CARGO_PKG_VERSION")),
            per_page: MAX_PER_PAGE,
            max_pages: 10,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl GitHubConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific repository and token
    pub fn new(repo: &str, token: &str) -> Self {
        GitHubConfig {
            api_url: DEFAULT_API_URL.to_string(),
            repo: repo.to_string(),
            token: token.to_string(),
            ..Self::default()
        }
    }

    /// Point the client at another API endpoint
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Check that the client can be built from this config.
    ///
    /// Token and repository are passed through as given; only presence is
    /// checked here.
    pub fn validate(&self) -> Result<()> {
        if self.repo.trim().is_empty() {
            return Err(GitHubError::RepositoryNotConfigured);
        }
        if self.token.trim().is_empty() {
            return Err(GitHubError::TokenNotConfigured);
        }
        if self.api_url.is_empty() {
            return Err(GitHubError::InvalidConfig("API URL is empty".to_string()));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(GitHubError::InvalidConfig(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}, got {}",
                self.per_page
            )));
        }
        if self.max_pages == 0 {
            return Err(GitHubError::InvalidConfig(
                "max_pages must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// `{api_url}/repos/{repo}/{path}`
    pub(crate) fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_url.trim_end_matches('/'),
            self.repo,
            path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = GitHubConfig::new("octo/release-demo", "ghp_test");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.repo, "octo/release-demo");
        assert_eq!(config.per_page, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_repo_or_token() {
        let config = GitHubConfig::new("", "ghp_test");
        assert!(matches!(
            config.validate(),
            Err(GitHubError::RepositoryNotConfigured)
        ));

        let config = GitHubConfig::new("octo/release-demo", " ");
        assert!(matches!(
            config.validate(),
            Err(GitHubError::TokenNotConfigured)
        ));
    }

    #[test]
    fn test_page_size_bounds() {
        let config = GitHubConfig::new("octo/release-demo", "t").with_per_page(0);
        assert!(config.validate().is_err());
        let config = GitHubConfig::new("octo/release-demo", "t").with_per_page(101);
        assert!(config.validate().is_err());
        let config = GitHubConfig::new("octo/release-demo", "t").with_max_pages(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_repo_url_for_enterprise_server() {
        let config = GitHubConfig::new("octo/release-demo", "t")
            .with_api_url("https://github.example.com/api/v3/");
        assert_eq!(
            config.repo_url("actions/runs/42"),
            "https://github.example.com/api/v3/repos/octo/release-demo/actions/runs/42"
        );
    }
}
