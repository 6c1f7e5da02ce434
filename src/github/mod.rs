//! GitHub data access.
//!
//! [`RepoSource`] is the seam between the scoring core and the network:
//! the resolver and the metrics collector only talk to this trait, so tests
//! can supply canned data and the CLI supplies [`GitHubClient`].

mod client;
mod metrics;

pub use client::{last_page_from_link, GitHubClient};
pub use metrics::fetch_activity_metrics;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::RepositoryCandidate;

/// Errors from GitHub API access
#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),
    #[error("GitHub API returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("GitHub API rate limit exceeded")]
    RateLimited,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Failed to parse GitHub response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("GitHub response is missing field '{0}'")]
    MissingField(&'static str),
}

impl GitHubError {
    /// Whether retrying the same request might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Issue state filter for issue counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Repository listing entry as returned by `/orgs/{o}/repos` and `/users/{u}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRepoSummary {
    pub name: String,
    pub owner: RawOwner,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub stargazers_count: Option<u64>,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOwner {
    pub login: String,
}

impl From<RawRepoSummary> for RepositoryCandidate {
    fn from(raw: RawRepoSummary) -> Self {
        Self {
            name: raw.name,
            owner: raw.owner.login,
            description: raw.description.filter(|d| !d.trim().is_empty()),
            is_fork: raw.fork,
            // only used for ranking, where an unknown count ranks like zero
            star_count: raw.stargazers_count.unwrap_or(0),
            last_pushed_at: raw.pushed_at,
        }
    }
}

/// Details for a single repository from `/repos/{o}/{r}`.
///
/// Counts stay optional here; callers decide how to treat unknown values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoDetails {
    #[serde(default)]
    pub stargazers_count: Option<u64>,
    #[serde(default)]
    pub forks_count: Option<u64>,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
}

/// Trait for GitHub data access - allows mocking in tests
pub trait RepoSource: Send + Sync {
    /// List repositories of an organization account
    fn list_org_repos(&self, owner: &str) -> Result<Vec<RepositoryCandidate>, GitHubError>;

    /// List repositories of a user account
    fn list_user_repos(&self, owner: &str) -> Result<Vec<RepositoryCandidate>, GitHubError>;

    /// Fetch star/fork counts, flags and last push time for one repository
    fn repo_details(&self, owner: &str, repo: &str) -> Result<RepoDetails, GitHubError>;

    /// Count commits on the default branch since `since`
    fn count_commits_since(
        &self,
        owner: &str,
        repo: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, GitHubError>;

    /// Count issues (excluding pull requests) in the given state
    fn count_issues(&self, owner: &str, repo: &str, state: IssueState)
        -> Result<u64, GitHubError>;

    /// Count contributors, including anonymous ones
    fn count_contributors(&self, owner: &str, repo: &str) -> Result<u64, GitHubError>;
}
