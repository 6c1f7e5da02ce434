use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::ConfigOverrides;
use crate::report::OutputFormat;
use crate::scoring::PillarScores;

/// Command line interface definition for token-health-scan.
#[derive(Parser, Debug)]
#[command(name = "token-health-scan")]
#[command(about = "Score the development health of crypto projects from their GitHub activity")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub github: GitHubArgs,
}

/// GitHub client settings; each overrides its environment variable.
#[derive(Args, Debug, Clone, Default)]
pub struct GitHubArgs {
    /// GitHub API token (overrides TOKEN_HEALTH_GITHUB_TOKEN / GITHUB_TOKEN)
    #[arg(long, global = true)]
    pub github_token: Option<String>,

    /// GitHub API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Minimum delay between API requests in milliseconds
    #[arg(long, global = true)]
    pub min_interval_ms: Option<u64>,

    /// Maximum repositories to consider per owner
    #[arg(long, global = true)]
    pub max_repos: Option<u32>,

    /// Retries for transient API failures
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Response cache lifetime in seconds (0 disables caching)
    #[arg(long, global = true)]
    pub cache_ttl_secs: Option<u64>,
}

impl GitHubArgs {
    pub fn into_overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            github_token: self.github_token,
            api_url: self.api_url,
            timeout_secs: self.timeout_secs,
            min_interval_ms: self.min_interval_ms,
            max_repos: self.max_repos,
            retries: self.retries,
            cache_ttl_secs: self.cache_ttl_secs,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Resolve a GitHub URL to the project's primary repository
    Resolve(ResolveOpts),
    /// Compute the development activity score for a GitHub URL
    Score(ScoreOpts),
    /// Scan one token: development score plus overall health
    Scan(ScanOpts),
    /// Scan every token listed in a JSON file
    Batch(BatchOpts),
}

#[derive(Args, Debug, Clone)]
pub struct ResolveOpts {
    /// GitHub organization, user or repository URL
    pub url: String,
}

#[derive(Args, Debug, Clone)]
pub struct ScoreOpts {
    /// GitHub organization, user or repository URL
    pub url: String,
}

#[derive(Args, Debug, Clone)]
pub struct ScanOpts {
    /// GitHub organization, user or repository URL
    pub url: String,

    /// Token symbol shown in the report (default: the URL)
    #[arg(long)]
    pub symbol: Option<String>,

    /// Known security score (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub security: Option<u8>,

    /// Known liquidity score (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub liquidity: Option<u8>,

    /// Known tokenomics score (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub tokenomics: Option<u8>,

    /// Known community score (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub community: Option<u8>,

    /// Save the report as JSON (default: .token-health/scans/)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub save: Option<Option<PathBuf>>,
}

impl ScanOpts {
    pub fn pillars(&self) -> PillarScores {
        PillarScores {
            security: self.security,
            liquidity: self.liquidity,
            tokenomics: self.tokenomics,
            community: self.community,
            development: None,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct BatchOpts {
    /// JSON file with an array of {"symbol", "github_url", "pillars"} entries
    pub file: PathBuf,

    /// Number of tokens scanned concurrently
    #[arg(long, default_value_t = 4)]
    pub parallel: usize,

    /// Save the reports as JSON (default: .token-health/scans/)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub save: Option<Option<PathBuf>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scan_with_pillars() {
        let cli = Cli::parse_from([
            "token-health-scan",
            "scan",
            "https://github.com/acme",
            "--security",
            "80",
            "--symbol",
            "ACME",
            "--save",
        ]);
        let Command::Scan(opts) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(opts.symbol.as_deref(), Some("ACME"));
        assert_eq!(opts.pillars().security, Some(80));
        assert_eq!(opts.pillars().development, None);
        assert_eq!(opts.save, Some(None));
    }

    #[test]
    fn rejects_pillar_above_100() {
        let result = Cli::try_parse_from([
            "token-health-scan",
            "scan",
            "https://github.com/acme",
            "--community",
            "101",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "token-health-scan",
            "resolve",
            "github.com/acme",
            "-vv",
            "--format",
            "json",
            "--max-repos",
            "20",
        ]);
        assert_eq!(cli.verbosity, 2);
        assert_eq!(cli.format, OutputFormat::Json);
        let overrides = cli.github.into_overrides();
        assert_eq!(overrides.max_repos, Some(20));
        assert_eq!(overrides.github_token, None);
    }

    #[test]
    fn batch_defaults() {
        let cli = Cli::parse_from(["token-health-scan", "batch", "tokens.json"]);
        let Command::Batch(opts) = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(opts.parallel, 4);
        assert_eq!(opts.save, None);
        assert_eq!(opts.file, PathBuf::from("tokens.json"));
    }
}
