mod scanner;

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::cancel;
use crate::cli::{BatchOpts, Command, ResolveOpts, ScanOpts, ScoreOpts};
use crate::config::ConfigError;
use crate::github::{fetch_activity_metrics, GitHubError, RepoSource};
use crate::models::{TokenReport, TokenTarget};
use crate::report::{self, OutputFormat};
use crate::resolver::{resolve_repository, ResolveError};
use crate::scoring::score_development_activity;
use crate::store;

pub use scanner::{scan_token, BatchOutcome, BatchScanner};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    GitHub(#[from] GitHubError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    User(String),
}

pub struct App<W: Write> {
    source: Arc<dyn RepoSource>,
    out: W,
    format: OutputFormat,
    verbose: bool,
    now: Option<DateTime<Utc>>,
}

impl<W: Write> App<W> {
    pub fn new(source: Arc<dyn RepoSource>, out: W) -> Self {
        Self {
            source,
            out,
            format: OutputFormat::Pretty,
            verbose: false,
            now: None,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Include raw metrics in pretty output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Pin the clock used for recency calculations.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    pub fn run(&mut self, command: Command) -> Result<(), AppError> {
        match command {
            Command::Resolve(opts) => self.handle_resolve(opts),
            Command::Score(opts) => self.handle_score(opts),
            Command::Scan(opts) => self.handle_scan(opts),
            Command::Batch(opts) => self.handle_batch(opts),
        }
    }

    fn handle_resolve(&mut self, opts: ResolveOpts) -> Result<(), AppError> {
        let repository = resolve_repository(&opts.url, self.source.as_ref(), self.now())?;
        let output = report::format_resolution(&opts.url, &repository, self.format);
        self.out.write_all(output.as_bytes())?;
        Ok(())
    }

    fn handle_score(&mut self, opts: ScoreOpts) -> Result<(), AppError> {
        let now = self.now();
        let repository = resolve_repository(&opts.url, self.source.as_ref(), now)?;
        info!("Collecting activity metrics for {}", repository);
        let metrics = fetch_activity_metrics(self.source.as_ref(), &repository, now)?;
        let result = score_development_activity(&metrics, now);

        let output = report::format_development(&repository, &result, self.format, self.verbose);
        self.out.write_all(output.as_bytes())?;
        Ok(())
    }

    fn handle_scan(&mut self, opts: ScanOpts) -> Result<(), AppError> {
        let target = TokenTarget {
            symbol: opts.symbol.clone().unwrap_or_else(|| opts.url.clone()),
            github_url: Some(opts.url.clone()),
            pillars: opts.pillars(),
        };

        let token_report = scan_token(self.source.as_ref(), &target, self.now());
        let output = report::format_token_report(&token_report, self.format, self.verbose);
        self.out.write_all(output.as_bytes())?;

        if let Some(save_path) = opts.save {
            let path = store::save_reports(&[token_report], save_path.as_deref())?;
            info!("Report saved to {}", path.display());
        }
        Ok(())
    }

    fn handle_batch(&mut self, opts: BatchOpts) -> Result<(), AppError> {
        let targets = load_targets(&opts.file)?;
        if targets.is_empty() {
            return Err(AppError::User(format!(
                "No tokens listed in {}",
                opts.file.display()
            )));
        }

        cancel::reset();
        cancel::register_handler();

        let outcome = BatchScanner::new(Arc::clone(&self.source))
            .with_parallelism(opts.parallel)
            .scan_all(&targets, self.now());

        if outcome.cancelled {
            warn!(
                "Cancelled after {} of {} tokens",
                outcome.reports.len(),
                targets.len()
            );
        }

        let output = report::format_batch(&outcome.reports, self.format, self.verbose);
        self.out.write_all(output.as_bytes())?;

        if let Some(save_path) = opts.save {
            let path = store::save_reports(&outcome.reports, save_path.as_deref())?;
            info!("Reports saved to {}", path.display());
        }

        summarize(&outcome.reports);
        Ok(())
    }
}

/// Read and validate a batch file.
pub fn load_targets(path: &Path) -> Result<Vec<TokenTarget>, AppError> {
    let json = fs::read_to_string(path)?;
    let targets: Vec<TokenTarget> = serde_json::from_str(&json).map_err(|e| {
        AppError::User(format!("Invalid batch file {}: {}", path.display(), e))
    })?;

    for target in &targets {
        if let Some(pillar) = target.pillars.out_of_range() {
            return Err(AppError::User(format!(
                "{}: {} score must be between 0 and 100",
                target.symbol, pillar
            )));
        }
    }
    Ok(targets)
}

fn summarize(reports: &[TokenReport]) {
    let scored = reports.iter().filter(|r| r.development.is_some()).count();
    info!(
        "{} of {} tokens have a development score",
        scored,
        reports.len()
    );
}
