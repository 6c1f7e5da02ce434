//! Shared test utilities for creating test fixtures.

use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::github::{GitHubError, IssueState, RepoDetails, RepoSource};
use crate::models::{RepositoryActivityMetrics, RepositoryCandidate};

/// Fixed "current time" so recency-based scores are deterministic.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    fixed_now() - Duration::days(days)
}

/// Create a non-fork candidate without a description
pub fn make_candidate(
    owner: &str,
    name: &str,
    stars: u64,
    pushed_at: Option<DateTime<Utc>>,
) -> RepositoryCandidate {
    let candidate = RepositoryCandidate::new(owner, name).with_stars(stars);
    match pushed_at {
        Some(pushed_at) => candidate.with_pushed_at(pushed_at),
        None => candidate,
    }
}

/// Metrics of a moderately active repository pushed three days ago
pub fn make_metrics() -> RepositoryActivityMetrics {
    RepositoryActivityMetrics {
        star_count: 200,
        fork_count: 40,
        commits_last_30_days: 25,
        contributors_count: 12,
        open_issues_count: 10,
        closed_issues_count: 30,
        last_pushed_at: Some(days_ago(3)),
        is_archived: false,
        is_fork: false,
    }
}

#[derive(Debug, Clone, Copy)]
struct Activity {
    commits: u64,
    contributors: u64,
    open_issues: u64,
    closed_issues: u64,
}

/// In-memory [`RepoSource`].
///
/// Listings return the configured candidates whose owner matches the
/// request; unconfigured listings and unknown repositories are `NotFound`.
#[derive(Debug, Default)]
pub struct MockRepoSource {
    org_repos: Option<Vec<RepositoryCandidate>>,
    user_repos: Option<Vec<RepositoryCandidate>>,
    details: HashMap<String, RepoDetails>,
    activity: HashMap<String, Activity>,
}

impl MockRepoSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_org_repos(mut self, repos: Vec<RepositoryCandidate>) -> Self {
        self.org_repos = Some(repos);
        self
    }

    pub fn with_user_repos(mut self, repos: Vec<RepositoryCandidate>) -> Self {
        self.user_repos = Some(repos);
        self
    }

    pub fn failing_org_listing(mut self) -> Self {
        self.org_repos = None;
        self
    }

    pub fn with_details(mut self, owner: &str, repo: &str, details: RepoDetails) -> Self {
        self.details.insert(key(owner, repo), details);
        self
    }

    pub fn with_activity(
        mut self,
        owner: &str,
        repo: &str,
        commits: u64,
        contributors: u64,
        open_issues: u64,
        closed_issues: u64,
    ) -> Self {
        self.activity.insert(
            key(owner, repo),
            Activity {
                commits,
                contributors,
                open_issues,
                closed_issues,
            },
        );
        self
    }

    fn listing(
        repos: &Option<Vec<RepositoryCandidate>>,
        owner: &str,
    ) -> Result<Vec<RepositoryCandidate>, GitHubError> {
        match repos {
            Some(repos) => Ok(repos
                .iter()
                .filter(|c| c.owner.eq_ignore_ascii_case(owner))
                .cloned()
                .collect()),
            None => Err(GitHubError::NotFound(owner.to_string())),
        }
    }

    fn activity(&self, owner: &str, repo: &str) -> Result<Activity, GitHubError> {
        self.activity
            .get(&key(owner, repo))
            .copied()
            .ok_or_else(|| GitHubError::NotFound(key(owner, repo)))
    }
}

fn key(owner: &str, repo: &str) -> String {
    format!("{}/{}", owner, repo)
}

impl RepoSource for MockRepoSource {
    fn list_org_repos(&self, owner: &str) -> Result<Vec<RepositoryCandidate>, GitHubError> {
        Self::listing(&self.org_repos, owner)
    }

    fn list_user_repos(&self, owner: &str) -> Result<Vec<RepositoryCandidate>, GitHubError> {
        Self::listing(&self.user_repos, owner)
    }

    fn repo_details(&self, owner: &str, repo: &str) -> Result<RepoDetails, GitHubError> {
        self.details
            .get(&key(owner, repo))
            .cloned()
            .ok_or_else(|| GitHubError::NotFound(key(owner, repo)))
    }

    fn count_commits_since(
        &self,
        owner: &str,
        repo: &str,
        _since: DateTime<Utc>,
    ) -> Result<u64, GitHubError> {
        Ok(self.activity(owner, repo)?.commits)
    }

    fn count_issues(
        &self,
        owner: &str,
        repo: &str,
        state: IssueState,
    ) -> Result<u64, GitHubError> {
        let activity = self.activity(owner, repo)?;
        Ok(match state {
            IssueState::Open => activity.open_issues,
            IssueState::Closed => activity.closed_issues,
        })
    }

    fn count_contributors(&self, owner: &str, repo: &str) -> Result<u64, GitHubError> {
        Ok(self.activity(owner, repo)?.contributors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_candidate() {
        let candidate = make_candidate("acme", "core", 7, Some(days_ago(2)));
        assert_eq!(candidate.owner, "acme");
        assert_eq!(candidate.star_count, 7);
        assert!(!candidate.is_fork);
        assert_eq!(candidate.last_pushed_at, Some(days_ago(2)));
    }

    #[test]
    fn test_mock_listing_filters_by_owner() {
        let source = MockRepoSource::new().with_org_repos(vec![
            make_candidate("acme", "core", 1, None),
            make_candidate("other", "app", 1, None),
        ]);
        assert_eq!(source.list_org_repos("acme").unwrap().len(), 1);
        assert!(source.list_org_repos("nobody").unwrap().is_empty());
        assert!(source.list_user_repos("acme").is_err());
    }
}
