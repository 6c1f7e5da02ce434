//! Development activity score.
//!
//! The score is a baseline plus four bounded contributions, minus a fork
//! penalty, then capped for stale or archived repositories:
//!
//! | component          | max points | input                                 |
//! |--------------------|-----------:|---------------------------------------|
//! | baseline           | 20         | repository exists                     |
//! | contributors       | 25         | log-scaled, saturates at 50           |
//! | recent commits     | 30         | log-scaled, saturates at 100 / 30 days |
//! | issue resolution   | 15         | closed / max(1, total)                |
//! | popularity         | 10         | log-scaled stars, saturates at 1000   |
//!
//! Archived repositories are capped rather than zeroed so that a
//! well-maintained archived project still ranks above an unknown one.

use chrono::{DateTime, Utc};

use crate::models::{DevelopmentScoreResult, RepositoryActivityMetrics, ScoreComponent};

pub const BASELINE_POINTS: f64 = 20.0;
pub const CONTRIBUTOR_POINTS: f64 = 25.0;
pub const CONTRIBUTOR_SATURATION: u64 = 50;
pub const COMMIT_POINTS: f64 = 30.0;
pub const COMMIT_SATURATION: u64 = 100;
pub const ISSUE_RESOLUTION_POINTS: f64 = 15.0;
pub const POPULARITY_POINTS: f64 = 10.0;
pub const STAR_SATURATION: u64 = 1000;

pub const FORK_PENALTY: f64 = 15.0;
pub const ARCHIVED_CAP: f64 = 10.0;
/// No push for longer than this caps the score at [`STALE_CAP`].
pub const STALE_AFTER_DAYS: i64 = 365;
pub const STALE_CAP: f64 = 40.0;
pub const NEVER_PUSHED_CAP: f64 = 25.0;

pub const MAX_SCORE: f64 = 100.0;

/// `ln(1 + value) / ln(1 + saturation)`, capped at 1.
fn saturating_log(value: u64, saturation: u64) -> f64 {
    let ratio = (value as f64).ln_1p() / (saturation.max(1) as f64).ln_1p();
    ratio.min(1.0)
}

/// Score a repository's development activity.
///
/// Pure: the same metrics and `now` always produce the same result.
pub fn score_development_activity(
    metrics: &RepositoryActivityMetrics,
    now: DateTime<Utc>,
) -> DevelopmentScoreResult {
    let mut components = Vec::new();

    components.push(ScoreComponent::new(
        "baseline",
        BASELINE_POINTS,
        "repository exists",
    ));

    components.push(ScoreComponent::new(
        "contributors",
        CONTRIBUTOR_POINTS * saturating_log(metrics.contributors_count, CONTRIBUTOR_SATURATION),
        format!("{} contributors", metrics.contributors_count),
    ));

    components.push(ScoreComponent::new(
        "recent_commits",
        COMMIT_POINTS * saturating_log(metrics.commits_last_30_days, COMMIT_SATURATION),
        format!("{} commits in the last 30 days", metrics.commits_last_30_days),
    ));

    let resolution_ratio =
        metrics.closed_issues_count as f64 / metrics.total_issues().max(1) as f64;
    components.push(ScoreComponent::new(
        "issue_resolution",
        ISSUE_RESOLUTION_POINTS * resolution_ratio,
        format!(
            "{} of {} issues closed",
            metrics.closed_issues_count,
            metrics.total_issues()
        ),
    ));

    components.push(ScoreComponent::new(
        "popularity",
        POPULARITY_POINTS * saturating_log(metrics.star_count, STAR_SATURATION),
        format!("{} stars", metrics.star_count),
    ));

    if metrics.is_fork {
        components.push(ScoreComponent::new(
            "fork",
            -FORK_PENALTY,
            "repository is a fork",
        ));
    }

    let mut score: f64 = components.iter().map(|c| c.points).sum();

    let recency_cap = match metrics.days_since_push(now) {
        None => Some((NEVER_PUSHED_CAP, "never pushed".to_string())),
        Some(days) if days > STALE_AFTER_DAYS => {
            Some((STALE_CAP, format!("no push for {} days", days)))
        }
        Some(_) => None,
    };
    if let Some((cap, detail)) = recency_cap {
        apply_cap(&mut score, &mut components, "recency_cap", cap, detail);
    }

    if metrics.is_archived {
        apply_cap(
            &mut score,
            &mut components,
            "archived_cap",
            ARCHIVED_CAP,
            "repository is archived".to_string(),
        );
    }

    let score = score.clamp(0.0, MAX_SCORE).round() as u8;

    DevelopmentScoreResult {
        score,
        metrics: metrics.clone(),
        components,
    }
}

/// Lower `score` to `cap`, recording the reduction if there was one.
fn apply_cap(
    score: &mut f64,
    components: &mut Vec<ScoreComponent>,
    name: &str,
    cap: f64,
    detail: String,
) {
    if *score > cap {
        components.push(ScoreComponent::new(name, cap - *score, detail));
        *score = cap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{days_ago, fixed_now, make_metrics};

    fn score(metrics: &RepositoryActivityMetrics) -> u8 {
        score_development_activity(metrics, fixed_now()).score
    }

    #[test]
    fn saturating_log_bounds() {
        assert_eq!(saturating_log(0, 50), 0.0);
        assert_eq!(saturating_log(50, 50), 1.0);
        assert_eq!(saturating_log(5000, 50), 1.0);
        assert!(saturating_log(10, 50) > 0.5);
        assert_eq!(saturating_log(3, 0), 1.0);
    }

    #[test]
    fn healthy_repository_scores_high() {
        let mut metrics = make_metrics();
        metrics.contributors_count = 80;
        metrics.commits_last_30_days = 150;
        metrics.open_issues_count = 0;
        metrics.closed_issues_count = 40;
        metrics.star_count = 5000;
        assert_eq!(score(&metrics), 100);
    }

    #[test]
    fn all_zero_metrics_score_baseline() {
        let mut metrics = make_metrics();
        metrics.contributors_count = 0;
        metrics.commits_last_30_days = 0;
        metrics.open_issues_count = 0;
        metrics.closed_issues_count = 0;
        metrics.star_count = 0;
        let result = score_development_activity(&metrics, fixed_now());
        assert_eq!(result.score, BASELINE_POINTS as u8);
        assert!(result.components.iter().all(|c| c.points.is_finite()));
    }

    #[test]
    fn diminishing_returns_on_contributors() {
        let mut metrics = make_metrics();
        metrics.contributors_count = 50;
        let at_fifty = score(&metrics);
        metrics.contributors_count = 500;
        assert_eq!(score(&metrics), at_fifty);
    }

    #[test]
    fn fork_is_penalized() {
        let metrics = make_metrics();
        let mut fork = metrics.clone();
        fork.is_fork = true;
        assert!(score(&fork) < score(&metrics));
    }

    #[test]
    fn archived_is_capped() {
        let mut metrics = make_metrics();
        metrics.is_archived = true;
        let result = score_development_activity(&metrics, fixed_now());
        assert_eq!(result.score, ARCHIVED_CAP as u8);
        assert!(result.components.iter().any(|c| c.name == "archived_cap"));
    }

    #[test]
    fn stale_repository_is_capped() {
        let mut metrics = make_metrics();
        metrics.contributors_count = 80;
        metrics.commits_last_30_days = 150;
        metrics.last_pushed_at = Some(days_ago(400));
        assert_eq!(score(&metrics), STALE_CAP as u8);
    }

    #[test]
    fn never_pushed_gets_harshest_cap() {
        let mut metrics = make_metrics();
        metrics.contributors_count = 80;
        metrics.last_pushed_at = None;
        assert_eq!(score(&metrics), NEVER_PUSHED_CAP as u8);
    }

    #[test]
    fn caps_do_not_raise_low_scores() {
        let mut metrics = make_metrics();
        metrics.contributors_count = 0;
        metrics.commits_last_30_days = 0;
        metrics.closed_issues_count = 0;
        metrics.star_count = 0;
        metrics.last_pushed_at = Some(days_ago(400));
        let result = score_development_activity(&metrics, fixed_now());
        assert_eq!(result.score, BASELINE_POINTS as u8);
        assert!(!result.components.iter().any(|c| c.name == "recency_cap"));
    }

    #[test]
    fn metrics_pass_through() {
        let metrics = make_metrics();
        let result = score_development_activity(&metrics, fixed_now());
        assert_eq!(result.metrics, metrics);
    }
}
