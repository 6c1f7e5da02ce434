//! Report formatting for resolve, score and scan output.

use clap::ValueEnum;

use crate::models::{DevelopmentScoreResult, ResolvedRepository, TokenReport};
use crate::scoring::{Pillar, PillarScores};

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output.
    #[default]
    Pretty,
    /// JSON output.
    Json,
    /// Single line per repository or token.
    Compact,
}

/// Format the repository a URL resolved to.
pub fn format_resolution(url: &str, repository: &ResolvedRepository, format: OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => format!("{} -> {}\n", url, repository),
        OutputFormat::Json => to_json(&serde_json::json!({
            "url": url,
            "repository": repository,
        })),
        OutputFormat::Compact => format!("{}\n", repository),
    }
}

/// Format a development score for one repository.
pub fn format_development(
    repository: &ResolvedRepository,
    result: &DevelopmentScoreResult,
    format: OutputFormat,
    verbose: bool,
) -> String {
    match format {
        OutputFormat::Pretty => {
            let mut output = format!("Repository: {}\n", repository);
            output.push_str(&format_development_pretty(result, verbose));
            output
        }
        OutputFormat::Json => to_json(&serde_json::json!({
            "repository": repository,
            "development": result,
        })),
        OutputFormat::Compact => format!("{} {}\n", repository, result.score),
    }
}

/// Format a single token scan.
pub fn format_token_report(report: &TokenReport, format: OutputFormat, verbose: bool) -> String {
    match format {
        OutputFormat::Pretty => format_report_pretty(report, verbose),
        OutputFormat::Json => to_json(report),
        OutputFormat::Compact => format_report_compact(report),
    }
}

/// Format the results of a batch scan.
pub fn format_batch(reports: &[TokenReport], format: OutputFormat, verbose: bool) -> String {
    match format {
        OutputFormat::Pretty => {
            let mut output = String::new();
            for report in reports {
                output.push_str(&format_report_pretty(report, verbose));
                output.push('\n');
            }
            let unknown = reports.iter().filter(|r| r.development.is_none()).count();
            output.push_str(&format!(
                "{} tokens scanned, {} with unknown development score\n",
                reports.len(),
                unknown
            ));
            output
        }
        OutputFormat::Json => to_json(&reports),
        OutputFormat::Compact => reports.iter().map(format_report_compact).collect(),
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(json) => json + "\n",
        Err(e) => format!("Error: {}\n", e),
    }
}

fn score_or_unknown(score: Option<u8>) -> String {
    score.map_or_else(|| "unknown".to_string(), |s| s.to_string())
}

fn format_development_pretty(result: &DevelopmentScoreResult, verbose: bool) -> String {
    let mut output = format!("Development Score: {}/100\n", result.score);

    for component in &result.components {
        output.push_str(&format!(
            "  {:<18} {:>+7.1}  {}\n",
            component.name, component.points, component.detail
        ));
    }

    if verbose {
        let m = &result.metrics;
        output.push_str("  Metrics:\n");
        output.push_str(&format!("    stars: {}, forks: {}\n", m.star_count, m.fork_count));
        output.push_str(&format!(
            "    commits (30d): {}, contributors: {}\n",
            m.commits_last_30_days, m.contributors_count
        ));
        output.push_str(&format!(
            "    issues: {} open, {} closed\n",
            m.open_issues_count, m.closed_issues_count
        ));
        let pushed = m
            .last_pushed_at
            .map_or_else(|| "never".to_string(), |t| t.to_rfc3339());
        output.push_str(&format!(
            "    last push: {}, archived: {}, fork: {}\n",
            pushed, m.is_archived, m.is_fork
        ));
    }

    output
}

fn format_pillars(pillars: &PillarScores) -> String {
    let mut output = String::new();
    for pillar in Pillar::all() {
        output.push_str(&format!(
            "  {:<12} {}\n",
            pillar.name(),
            score_or_unknown(pillars.get(*pillar))
        ));
    }
    output
}

fn format_report_pretty(report: &TokenReport, verbose: bool) -> String {
    let mut output = format!("Token: {}\n", report.symbol);

    match (&report.repository, &report.github_url) {
        (Some(repository), _) => output.push_str(&format!("Repository: {}\n", repository)),
        (None, Some(url)) => output.push_str(&format!("GitHub: {} (unresolved)\n", url)),
        (None, None) => {}
    }

    match &report.development {
        Some(result) => output.push_str(&format_development_pretty(result, verbose)),
        None => output.push_str("Development Score: unknown\n"),
    }
    if let Some(reason) = &report.failure {
        output.push_str(&format!("  Reason: {}\n", reason));
    }

    output.push_str("Pillars:\n");
    output.push_str(&format_pillars(&report.pillars));
    output.push_str(&format!(
        "Overall Health: {} ({} of {} pillars known)\n",
        score_or_unknown(report.overall_score),
        report.pillars.known_count(),
        Pillar::all().len()
    ));

    output
}

fn format_report_compact(report: &TokenReport) -> String {
    let repository = report
        .repository
        .as_ref()
        .map_or_else(|| "-".to_string(), |r| r.to_string());
    format!(
        "{} {} dev={} overall={}\n",
        report.symbol,
        repository,
        score_or_unknown(report.development.as_ref().map(|d| d.score)),
        score_or_unknown(report.overall_score)
    )
}
