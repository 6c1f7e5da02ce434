//! Candidate ranking heuristics for picking an owner's primary repository.
//!
//! Each candidate gets three independent scores:
//!
//! - a *type* score from keywords in its name and description,
//! - a *version* score from a version number embedded in its name,
//! - an *activity* tier from the time since its last push.
//!
//! They are combined with the star count so that type always outranks
//! version, version outranks activity, and activity outranks stars.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::models::RepositoryCandidate;

/// Repository names that typically hold a project's primary contracts.
pub const CORE_KEYWORDS: &[&str] = &["core", "protocol", "contracts", "main"];

pub const EXACT_CORE_NAME_BONUS: i64 = 5000;
pub const CONTAINS_CORE_KEYWORD_BONUS: i64 = 3000;
pub const CORE_SUFFIX_BONUS: i64 = 2500;
pub const OWNER_FRAGMENT_BONUS: i64 = 1500;
pub const CORE_DESCRIPTION_BONUS: i64 = 500;

pub const UTILITY_PENALTY: i64 = -2000;
pub const DOCS_PENALTY: i64 = -3000;
pub const TOOLING_PENALTY: i64 = -1500;
pub const LEGACY_PENALTY: i64 = -4000;

/// Version assigned to names tagged `latest` or `current`.
pub const LATEST_VERSION: u32 = 999;

pub const VERSION_WEIGHT: i64 = 10_000;
pub const ACTIVITY_WEIGHT: i64 = 1_000;
pub const STAR_CAP: u64 = 500;
/// Larger than the largest possible version + activity + star contribution.
pub const TYPE_WEIGHT: i64 = 10_000_000;

/// Words that contain a penalty keyword without being one.
const PENALTY_ALLOW_LIST: &[&str] = &["typescript", "javascript", "solidscript"];

/// Fragments of the owner name shorter than this are ignored.
const MIN_OWNER_FRAGMENT_LEN: usize = 3;

/// Keyword classes that mark a repository as something other than the main codebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PenaltyClass {
    Utility,
    Docs,
    Tooling,
    Legacy,
}

impl PenaltyClass {
    fn points(self) -> i64 {
        match self {
            Self::Utility => UTILITY_PENALTY,
            Self::Docs => DOCS_PENALTY,
            Self::Tooling => TOOLING_PENALTY,
            Self::Legacy => LEGACY_PENALTY,
        }
    }

    /// Whether the description is also checked, not just the name.
    fn applies_to_description(self) -> bool {
        matches!(self, Self::Docs | Self::Legacy)
    }

    /// Short words only count as whole tokens; longer ones also count when
    /// glued into a larger name such as `sdkdocs` or `coreutils`.
    fn pattern(self) -> &'static Regex {
        static UTILITY: OnceLock<Regex> = OnceLock::new();
        static DOCS: OnceLock<Regex> = OnceLock::new();
        static TOOLING: OnceLock<Regex> = OnceLock::new();
        static LEGACY: OnceLock<Regex> = OnceLock::new();

        let (cell, source) = match self {
            Self::Utility => (
                &UTILITY,
                r"\butil\b|erc20|erc721|erc1155|utils|common|shared|helpers?",
            ),
            Self::Docs => (
                &DOCS,
                r"\b(doc|demos?)\b|docs|documentation|examples?|templates?|tutorials?",
            ),
            Self::Tooling => (
                &TOOLING,
                r"\b(tests?|tools?|ci|bench)\b|testing|tooling|scripts?|benchmarks?",
            ),
            Self::Legacy => (&LEGACY, r"\bold\b|legacy|deprecated|archived"),
        };
        cell.get_or_init(|| Regex::new(source).expect("penalty pattern is valid"))
    }

    fn all() -> [PenaltyClass; 4] {
        [Self::Utility, Self::Docs, Self::Tooling, Self::Legacy]
    }
}

fn core_description_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b(main|core|primary|protocol|smart contracts?)\b")
            .expect("description pattern is valid")
    })
}

fn embedded_version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|-)v(\d+)(?:-|$)").expect("version pattern is valid")
    })
}

fn trailing_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)$").expect("trailing number pattern is valid"))
}

/// Names whose trailing digits belong to a standard or network, not a release.
fn numbered_standard_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:erc|bep|trc|eip|bip|web)\d+$|(?:^|-)l[1-3]$")
            .expect("numbered standard pattern is valid")
    })
}

fn latest_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b(latest|current)\b").expect("latest pattern is valid"))
}

/// Lowercase, split CamelCase and turn `_`/`.` separators into `-` so
/// word boundaries line up, e.g. `AcmeProtocol_Docs` -> `acme-protocol-docs`.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            out.push('-');
        }
        match c {
            '_' | '.' => out.push('-'),
            _ => out.extend(c.to_lowercase()),
        }
        prev = Some(c);
    }
    out
}

/// Blank out allow-listed words so they cannot trip a penalty.
fn strip_allowed(text: &str) -> String {
    PENALTY_ALLOW_LIST
        .iter()
        .fold(text.to_string(), |acc, word| acc.replace(word, "-"))
}

/// Meaningful pieces of an owner login, e.g. `aave-dao` -> `["aave", "dao"]`.
pub fn owner_fragments(owner: &str) -> Vec<String> {
    owner
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|fragment| fragment.len() >= MIN_OWNER_FRAGMENT_LEN)
        .map(str::to_string)
        .collect()
}

/// Keyword heuristic over a repository's name and description.
pub fn type_score(name: &str, description: Option<&str>, owner: &str) -> i64 {
    let name = normalize(name);
    let description = description.map(normalize).unwrap_or_default();
    let mut score = 0;

    if CORE_KEYWORDS.iter().any(|keyword| name == *keyword) {
        score += EXACT_CORE_NAME_BONUS;
    } else if CORE_KEYWORDS.iter().any(|keyword| name.contains(keyword)) {
        score += CONTAINS_CORE_KEYWORD_BONUS;
    }

    if CORE_KEYWORDS
        .iter()
        .any(|keyword| name.ends_with(&format!("-{}", keyword)))
    {
        score += CORE_SUFFIX_BONUS;
    }

    let compact_name = name.replace('-', "");
    for fragment in owner_fragments(owner) {
        if compact_name.contains(&fragment) {
            score += OWNER_FRAGMENT_BONUS;
        }
    }

    if core_description_pattern().is_match(&description) {
        score += CORE_DESCRIPTION_BONUS;
    }

    let penalty_name = strip_allowed(&name);
    let penalty_description = strip_allowed(&description);
    for class in PenaltyClass::all() {
        let pattern = class.pattern();
        let hit = pattern.is_match(&penalty_name)
            || (class.applies_to_description() && pattern.is_match(&penalty_description));
        if hit {
            score += class.points();
        }
    }

    score
}

/// Version number embedded in a repository name, or 0 if there is none.
///
/// An explicit `v<N>` token wins. Otherwise trailing digits count, unless
/// they are part of a token standard or network name (`erc20`, `web3`, `l2`).
pub fn version_score(name: &str) -> u32 {
    let name = normalize(name);

    let trailing = || {
        if numbered_standard_pattern().is_match(&name) {
            None
        } else {
            trailing_number_pattern().captures(&name)
        }
    };
    let embedded = embedded_version_pattern()
        .captures(&name)
        .or_else(trailing)
        .and_then(|caps| caps[1].parse::<u32>().ok());

    // a year-like suffix such as `-2024` must not outrank `latest`
    match embedded {
        Some(version) => version.min(LATEST_VERSION),
        None if latest_pattern().is_match(&name) => LATEST_VERSION,
        None => 0,
    }
}

/// Recency tier: 3 within a week, 2 within a month, 1 within six months, else 0.
pub fn activity_score(last_pushed_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u8 {
    let Some(pushed) = last_pushed_at else {
        return 0;
    };
    match (now - pushed).num_days() {
        d if d <= 7 => 3,
        d if d <= 30 => 2,
        d if d <= 180 => 1,
        _ => 0,
    }
}

/// All ranking inputs for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateScore {
    pub type_score: i64,
    pub version: u32,
    pub activity: u8,
    pub stars: u64,
}

impl CandidateScore {
    pub fn compute(candidate: &RepositoryCandidate, owner: &str, now: DateTime<Utc>) -> Self {
        Self {
            type_score: type_score(&candidate.name, candidate.description.as_deref(), owner),
            version: version_score(&candidate.name),
            activity: activity_score(candidate.last_pushed_at, now),
            stars: candidate.star_count,
        }
    }

    /// Weighted sum; the weights keep each factor strictly below the next.
    pub fn total(&self) -> i64 {
        self.type_score * TYPE_WEIGHT
            + i64::from(self.version) * VERSION_WEIGHT
            + i64::from(self.activity) * ACTIVITY_WEIGHT
            + self.stars.min(STAR_CAP) as i64
    }
}

/// A candidate together with its computed score.
#[derive(Debug, Clone)]
pub struct RankedCandidate<'a> {
    pub candidate: &'a RepositoryCandidate,
    pub score: CandidateScore,
}

/// Rank candidates best-first.
///
/// Forks are dropped whenever at least one non-fork exists. Ties keep the
/// order in which candidates were supplied.
pub fn rank_candidates<'a>(
    candidates: &'a [RepositoryCandidate],
    owner: &str,
    now: DateTime<Utc>,
) -> Vec<RankedCandidate<'a>> {
    let has_original = candidates.iter().any(|c| !c.is_fork);

    let mut ranked: Vec<RankedCandidate<'a>> = candidates
        .iter()
        .filter(|c| !has_original || !c.is_fork)
        .map(|candidate| RankedCandidate {
            candidate,
            score: CandidateScore::compute(candidate, owner, now),
        })
        .collect();

    // sort_by is stable, so equal totals stay in fetch order
    ranked.sort_by(|a, b| b.score.total().cmp(&a.score.total()));
    ranked
}
