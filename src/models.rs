use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::health::PillarScores;

/// A repository under consideration while resolving an owner URL.
///
/// Candidates only live for the duration of one resolution call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryCandidate {
    pub name: String,
    pub owner: String,
    pub description: Option<String>,
    pub is_fork: bool,
    pub star_count: u64,
    pub last_pushed_at: Option<DateTime<Utc>>,
}

impl RepositoryCandidate {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            description: None,
            is_fork: false,
            star_count: 0,
            last_pushed_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_stars(mut self, stars: u64) -> Self {
        self.star_count = stars;
        self
    }

    pub fn with_pushed_at(mut self, pushed_at: DateTime<Utc>) -> Self {
        self.last_pushed_at = Some(pushed_at);
        self
    }

    pub fn as_fork(mut self) -> Self {
        self.is_fork = true;
        self
    }
}

/// The repository chosen to represent a project's primary codebase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedRepository {
    pub owner: String,
    pub repo: String,
}

impl ResolvedRepository {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl Display for ResolvedRepository {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl From<&RepositoryCandidate> for ResolvedRepository {
    fn from(candidate: &RepositoryCandidate) -> Self {
        Self::new(candidate.owner.clone(), candidate.name.clone())
    }
}

/// Raw activity facts about a resolved repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryActivityMetrics {
    pub star_count: u64,
    pub fork_count: u64,
    pub commits_last_30_days: u64,
    pub contributors_count: u64,
    pub open_issues_count: u64,
    pub closed_issues_count: u64,
    /// `None` means the repository has never been pushed to.
    pub last_pushed_at: Option<DateTime<Utc>>,
    pub is_archived: bool,
    pub is_fork: bool,
}

impl RepositoryActivityMetrics {
    pub fn total_issues(&self) -> u64 {
        self.open_issues_count.saturating_add(self.closed_issues_count)
    }

    /// Whole days between the last push and `now`, or `None` if never pushed.
    pub fn days_since_push(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_pushed_at
            .map(|pushed| (now - pushed).num_days().max(0))
    }
}

/// One named contribution (or cap) that went into a development score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub name: String,
    /// Signed points added; for caps, the points removed (negative).
    pub points: f64,
    pub detail: String,
}

impl ScoreComponent {
    pub fn new(name: impl Into<String>, points: f64, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points,
            detail: detail.into(),
        }
    }
}

/// Result of scoring a repository's development activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentScoreResult {
    /// Integer score in `[0, 100]`.
    pub score: u8,
    pub metrics: RepositoryActivityMetrics,
    pub components: Vec<ScoreComponent>,
}

/// A token to scan in batch mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenTarget {
    pub symbol: String,
    #[serde(default)]
    pub github_url: Option<String>,
    /// Pillar scores computed elsewhere; `development` is always recomputed.
    #[serde(default)]
    pub pillars: PillarScores,
}

impl TokenTarget {
    pub fn new(symbol: impl Into<String>, github_url: Option<String>) -> Self {
        Self {
            symbol: symbol.into(),
            github_url,
            pillars: PillarScores::default(),
        }
    }
}

/// Per-token outcome of a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenReport {
    pub symbol: String,
    pub github_url: Option<String>,
    pub repository: Option<ResolvedRepository>,
    pub development: Option<DevelopmentScoreResult>,
    /// Why the development pillar is unknown, if it is.
    pub failure: Option<String>,
    pub pillars: PillarScores,
    pub overall_score: Option<u8>,
    /// Timestamp of the scan (RFC 3339 format).
    pub scanned_at: String,
}
