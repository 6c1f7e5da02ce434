use chrono::{DateTime, Duration, Utc};
use log::debug;

use super::{GitHubError, IssueState, RepoSource};
use crate::models::{RepositoryActivityMetrics, ResolvedRepository};

/// Window for the recent-commit count.
pub const COMMIT_WINDOW_DAYS: i64 = 30;

/// Collect the activity metrics for a resolved repository.
///
/// Any failed lookup fails the whole collection: a missing count must show
/// up as an unknown development pillar, never as a verified zero.
pub fn fetch_activity_metrics(
    source: &dyn RepoSource,
    repository: &ResolvedRepository,
    now: DateTime<Utc>,
) -> Result<RepositoryActivityMetrics, GitHubError> {
    let ResolvedRepository { owner, repo } = repository;

    let details = source.repo_details(owner, repo)?;
    let star_count = details
        .stargazers_count
        .ok_or(GitHubError::MissingField("stargazers_count"))?;
    let fork_count = details
        .forks_count
        .ok_or(GitHubError::MissingField("forks_count"))?;

    let since = now - Duration::days(COMMIT_WINDOW_DAYS);
    let commits_last_30_days = source.count_commits_since(owner, repo, since)?;
    let contributors_count = source.count_contributors(owner, repo)?;
    let open_issues_count = source.count_issues(owner, repo, IssueState::Open)?;
    let closed_issues_count = source.count_issues(owner, repo, IssueState::Closed)?;

    debug!(
        "{}: {} commits/30d, {} contributors, {}/{} open/closed issues",
        repository, commits_last_30_days, contributors_count, open_issues_count, closed_issues_count
    );

    Ok(RepositoryActivityMetrics {
        star_count,
        fork_count,
        commits_last_30_days,
        contributors_count,
        open_issues_count,
        closed_issues_count,
        last_pushed_at: details.pushed_at,
        is_archived: details.archived,
        is_fork: details.fork,
    })
}
