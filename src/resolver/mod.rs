//! Resolve a GitHub URL to the repository that best represents a project.
//!
//! Direct repository links resolve immediately. Owner links list the
//! owner's repositories (organization listing first, user listing second)
//! and pick the top-ranked candidate; see [`ranking`] for the heuristics.

pub mod ranking;

pub use ranking::{rank_candidates, CandidateScore, RankedCandidate};

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::github::RepoSource;
use crate::models::{RepositoryCandidate, ResolvedRepository};
use crate::url::GitHubUrl;

/// How many ranked candidates to log at debug level.
const LOGGED_CANDIDATES: usize = 5;

/// Why a URL could not be resolved to a repository.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Not a GitHub organization or repository URL: {0}")]
    InvalidUrl(String),
    #[error("No repositories found for GitHub account '{0}'")]
    NotFound(String),
}

/// Resolve `url` using `source` for owner listings.
///
/// Listing failures are not errors: an organization lookup that fails falls
/// through to the user lookup, and if both come back empty the result is
/// [`ResolveError::NotFound`].
pub fn resolve_repository(
    url: &str,
    source: &dyn RepoSource,
    now: DateTime<Utc>,
) -> Result<ResolvedRepository, ResolveError> {
    resolve_with(url, |owner| fetch_owner_candidates(source, owner), now)
}

/// Resolve `url` with an arbitrary owner-listing function.
///
/// `fetch_owner_repos` returns `None` when no listing could be obtained.
/// It is never called for direct repository URLs.
pub fn resolve_with<F>(
    url: &str,
    mut fetch_owner_repos: F,
    now: DateTime<Utc>,
) -> Result<ResolvedRepository, ResolveError>
where
    F: FnMut(&str) -> Option<Vec<RepositoryCandidate>>,
{
    let owner = match GitHubUrl::parse(url) {
        Some(GitHubUrl::Repository { owner, repo }) => {
            debug!("{} is a direct repository link", url);
            return Ok(ResolvedRepository::new(owner, repo));
        }
        Some(GitHubUrl::Owner { owner }) => owner,
        None => return Err(ResolveError::InvalidUrl(url.to_string())),
    };

    let candidates = fetch_owner_repos(&owner).unwrap_or_default();
    select_primary(&owner, &candidates, now).ok_or(ResolveError::NotFound(owner))
}

/// Pick the best repository among `candidates`, or `None` if there are none.
pub fn select_primary(
    owner: &str,
    candidates: &[RepositoryCandidate],
    now: DateTime<Utc>,
) -> Option<ResolvedRepository> {
    let ranked = rank_candidates(candidates, owner, now);

    for entry in ranked.iter().take(LOGGED_CANDIDATES) {
        debug!(
            "  {} (type {}, version {}, activity {}, stars {}) = {}",
            entry.candidate.name,
            entry.score.type_score,
            entry.score.version,
            entry.score.activity,
            entry.score.stars,
            entry.score.total()
        );
    }

    let winner = ranked.first()?;
    let resolved = ResolvedRepository::from(winner.candidate);
    info!(
        "Selected {} from {} candidates for '{}'",
        resolved,
        candidates.len(),
        owner
    );
    Some(resolved)
}

/// Organization listing, falling back to user listing. Empty means none found.
pub fn fetch_owner_candidates(
    source: &dyn RepoSource,
    owner: &str,
) -> Option<Vec<RepositoryCandidate>> {
    match source.list_org_repos(owner) {
        Ok(repos) if !repos.is_empty() => return Some(repos),
        Ok(_) => debug!("Organization '{}' has no repositories", owner),
        Err(err) => debug!("Organization lookup for '{}' failed: {}", owner, err),
    }

    match source.list_user_repos(owner) {
        Ok(repos) if !repos.is_empty() => Some(repos),
        Ok(_) => {
            debug!("User '{}' has no repositories", owner);
            None
        }
        Err(err) => {
            debug!("User lookup for '{}' failed: {}", owner, err);
            None
        }
    }
}
