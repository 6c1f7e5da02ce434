//! Classification of GitHub URLs into repository and owner-root shapes.

use std::sync::OnceLock;

use regex::Regex;

/// Shape of a GitHub link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubUrl {
    /// `github.com/{owner}/{repo}(/...)?`
    Repository { owner: String, repo: String },
    /// `github.com/{owner}/?`
    Owner { owner: String },
}

fn repository_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:https?://)?(?:www\.)?github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)(?:[/?#].*)?$",
        )
        .expect("repository pattern is valid")
    })
}

fn owner_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?:https?://)?(?:www\.)?github\.com/([A-Za-z0-9_.-]+)/?(?:[?#].*)?$")
            .expect("owner pattern is valid")
    })
}

impl GitHubUrl {
    /// Classify `input`, returning `None` if it is not a GitHub link.
    ///
    /// The repository shape is tried first, so any URL with a second path
    /// segment is a direct repository reference.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();

        if let Some(caps) = repository_pattern().captures(input) {
            let owner = caps[1].to_string();
            let repo = strip_git_suffix(&caps[2]);
            if repo.is_empty() {
                return None;
            }
            return Some(Self::Repository { owner, repo });
        }

        owner_pattern()
            .captures(input)
            .map(|caps| Self::Owner {
                owner: caps[1].to_string(),
            })
    }

    pub fn owner(&self) -> &str {
        match self {
            Self::Repository { owner, .. } | Self::Owner { owner } => owner,
        }
    }
}

fn strip_git_suffix(repo: &str) -> String {
    repo.strip_suffix(".git").unwrap_or(repo).to_string()
}
