use std::io;
use std::sync::Arc;

use clap::Parser;
use log::{warn, LevelFilter};

use token_health_scan::app::App;
use token_health_scan::cli::Cli;
use token_health_scan::config::ScanConfig;
use token_health_scan::github::GitHubClient;

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_target(false)
        .format_timestamp(None)
        .init();

    // Build config from environment, then apply CLI overrides
    let config = match ScanConfig::from_env() {
        Ok(config) => config.with_overrides(cli.github.into_overrides()),
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };
    if config.github_token.is_none() {
        warn!("No GitHub token configured; unauthenticated requests are limited to 60 per hour");
    }

    let client = GitHubClient::new(config);
    let mut app = App::new(Arc::new(client), io::stdout())
        .with_format(cli.format)
        .with_verbose(cli.verbosity > 0);

    if let Err(err) = app.run(cli.command) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
