use std::sync::{Arc, Mutex};
use std::thread;

use chrono::{DateTime, Utc};
use log::{error, info, warn};

use crate::cancel;
use crate::github::{fetch_activity_metrics, RepoSource};
use crate::models::{TokenReport, TokenTarget};
use crate::resolver::resolve_repository;
use crate::scoring::score_development_activity;

/// Run the full development pipeline for one token.
///
/// Never fails: resolution and fetch problems leave the development pillar
/// unknown and are recorded in [`TokenReport::failure`].
pub fn scan_token(source: &dyn RepoSource, target: &TokenTarget, now: DateTime<Utc>) -> TokenReport {
    let mut repository = None;
    let mut development = None;
    let mut failure = None;

    match target.github_url.as_deref().filter(|url| !url.trim().is_empty()) {
        None => failure = Some("no GitHub URL".to_string()),
        Some(url) => match resolve_repository(url, source, now) {
            Err(err) => failure = Some(err.to_string()),
            Ok(resolved) => {
                match fetch_activity_metrics(source, &resolved, now) {
                    Ok(metrics) => development = Some(score_development_activity(&metrics, now)),
                    Err(err) => {
                        failure = Some(format!("metrics unavailable for {}: {}", resolved, err))
                    }
                }
                repository = Some(resolved);
            }
        },
    }

    if let Some(reason) = &failure {
        warn!("{}: development score unknown ({})", target.symbol, reason);
    }

    let pillars = target
        .pillars
        .with_development(development.as_ref().map(|d| d.score));

    TokenReport {
        symbol: target.symbol.clone(),
        github_url: target.github_url.clone(),
        repository,
        development,
        failure,
        overall_score: pillars.overall(),
        pillars,
        scanned_at: now.to_rfc3339(),
    }
}

/// Result of a batch scan.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Reports in input order. Shorter than the input if cancelled.
    pub reports: Vec<TokenReport>,
    pub cancelled: bool,
}

/// Scans many tokens in parallel batches.
pub struct BatchScanner {
    source: Arc<dyn RepoSource>,
    max_parallel: usize,
}

impl BatchScanner {
    pub fn new(source: Arc<dyn RepoSource>) -> Self {
        Self {
            source,
            max_parallel: 4, // Default parallelism for tokens
        }
    }

    /// Set maximum parallel token scans.
    pub fn with_parallelism(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    pub fn scan_all(&self, targets: &[TokenTarget], now: DateTime<Utc>) -> BatchOutcome {
        let total = targets.len();
        info!("Scanning {} tokens ({} parallel)...", total, self.max_parallel);

        let results: Arc<Mutex<Vec<(usize, TokenReport)>>> = Arc::new(Mutex::new(Vec::new()));
        let indexed: Vec<(usize, TokenTarget)> = targets.iter().cloned().enumerate().collect();
        let mut cancelled = false;

        for chunk in indexed.chunks(self.max_parallel) {
            if cancel::is_cancelled() {
                warn!("Cancelled; skipping remaining tokens");
                cancelled = true;
                break;
            }

            let handles: Vec<_> = chunk
                .iter()
                .map(|(position, target)| {
                    let source = Arc::clone(&self.source);
                    let results = Arc::clone(&results);
                    let position = *position;
                    let target = target.clone();

                    thread::spawn(move || {
                        info!("  [{}/{}] {}", position + 1, total, target.symbol);
                        let report = scan_token(source.as_ref(), &target, now);
                        results
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner())
                            .push((position, report));
                    })
                })
                .collect();

            // Wait for this batch to complete
            for handle in handles {
                if handle.join().is_err() {
                    error!("A token scan thread panicked");
                }
            }
        }

        let mut reports = match Arc::try_unwrap(results) {
            Ok(mutex) => mutex
                .into_inner()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
            Err(shared) => shared
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone(),
        };
        // Restore input order (threads finish in any order)
        reports.sort_by_key(|(position, _)| *position);

        BatchOutcome {
            reports: reports.into_iter().map(|(_, report)| report).collect(),
            cancelled,
        }
    }
}
