//! GitHub REST client over a sync `ureq` agent.

use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, warn};
use regex::Regex;
use serde::Deserialize;

use super::{GitHubError, IssueState, RawRepoSummary, RepoDetails, RepoSource};
use crate::cache::{CachedResponse, ResponseCache};
use crate::config::ScanConfig;
use crate::models::RepositoryCandidate;
use crate::rate_limit::RateLimiter;

const USER_AGENT: &str = concat!("token-health-scan/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";
/// Base delay between retry attempts; attempt `n` waits `n` times this.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Real implementation of RepoSource that calls the GitHub REST API
pub struct GitHubClient {
    config: ScanConfig,
    agent: ureq::Agent,
    limiter: Arc<RateLimiter>,
    cache: Arc<ResponseCache>,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // status codes are mapped to GitHubError below
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl GitHubClient {
    pub fn new(config: ScanConfig) -> Self {
        let limiter = Arc::new(RateLimiter::new(config.min_interval));
        let cache = Arc::new(ResponseCache::new(config.cache_ttl));
        Self {
            agent: make_agent(config.timeout),
            config,
            limiter,
            cache,
        }
    }

    /// Share a limiter with other clients hitting the same quota.
    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// GET `path` with retries for transient failures, served from cache when fresh.
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<CachedResponse, GitHubError> {
        let url = format!("{}{}", self.config.base_url(), path);
        let cache_key = cache_key(&url, query);

        if let Some(cached) = self.cache.get(&cache_key) {
            debug!("Cache hit: {}", cache_key);
            return Ok(cached);
        }

        let mut attempt = 0;
        loop {
            match self.execute(&url, query) {
                Ok(response) => {
                    self.cache.insert(cache_key, response.clone());
                    return Ok(response);
                }
                Err(err) if err.is_transient() && attempt < self.config.retries => {
                    attempt += 1;
                    warn!(
                        "GET {} failed ({}), retrying ({}/{})",
                        cache_key, err, attempt, self.config.retries
                    );
                    thread::sleep(RETRY_BACKOFF * attempt);
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn execute(&self, url: &str, query: &[(&str, String)]) -> Result<CachedResponse, GitHubError> {
        self.limiter.acquire();

        let mut request = self
            .agent
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION);
        for (key, value) in query {
            request = request.query(*key, value);
        }
        if let Some(token) = &self.config.github_token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        debug!("GET {}", cache_key(url, query));
        let response = request.call()?;
        let status = response.status().as_u16();
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        let link = header("link");
        let quota_exhausted = header("x-ratelimit-remaining").as_deref() == Some("0");

        if (200..300).contains(&status) {
            let body = response.into_body().read_to_string()?;
            return Ok(CachedResponse { body, link });
        }

        match status {
            404 => Err(GitHubError::NotFound(url.to_string())),
            429 => Err(GitHubError::RateLimited),
            403 if quota_exhausted => Err(GitHubError::RateLimited),
            _ => {
                let message = response.into_body().read_to_string().unwrap_or_default();
                Err(GitHubError::Status { status, message })
            }
        }
    }

    /// List up to `max_repos` repositories under an owner listing endpoint.
    fn list_repos(&self, path: &str) -> Result<Vec<RepositoryCandidate>, GitHubError> {
        let max = self.config.max_repos as usize;
        let per_page = self.config.listing_page_size();
        let mut candidates = Vec::new();
        let mut page = 1u32;

        while candidates.len() < max {
            let response = self.get(
                path,
                &[
                    ("per_page", per_page.to_string()),
                    ("sort", "pushed".to_string()),
                    ("page", page.to_string()),
                ],
            )?;
            let batch: Vec<RawRepoSummary> = serde_json::from_str(&response.body)?;
            let fetched = batch.len();
            candidates.extend(batch.into_iter().map(RepositoryCandidate::from));

            if fetched < per_page as usize {
                break;
            }
            page += 1;
        }

        candidates.truncate(max);
        Ok(candidates)
    }
}

impl RepoSource for GitHubClient {
    fn list_org_repos(&self, owner: &str) -> Result<Vec<RepositoryCandidate>, GitHubError> {
        self.list_repos(&format!("/orgs/{}/repos", owner))
    }

    fn list_user_repos(&self, owner: &str) -> Result<Vec<RepositoryCandidate>, GitHubError> {
        self.list_repos(&format!("/users/{}/repos", owner))
    }

    fn repo_details(&self, owner: &str, repo: &str) -> Result<RepoDetails, GitHubError> {
        let response = self.get(&format!("/repos/{}/{}", owner, repo), &[])?;
        Ok(serde_json::from_str(&response.body)?)
    }

    fn count_commits_since(
        &self,
        owner: &str,
        repo: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, GitHubError> {
        let result = self.get(
            &format!("/repos/{}/{}/commits", owner, repo),
            &[
                ("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("per_page", "1".to_string()),
            ],
        );
        match result {
            Ok(response) => count_listed_items(&response),
            // 409 Conflict: the repository has no commits at all
            Err(GitHubError::Status { status: 409, .. }) => Ok(0),
            Err(err) => Err(err),
        }
    }

    fn count_issues(
        &self,
        owner: &str,
        repo: &str,
        state: IssueState,
    ) -> Result<u64, GitHubError> {
        #[derive(Deserialize)]
        struct SearchTotal {
            total_count: Option<u64>,
        }

        let response = self.get(
            "/search/issues",
            &[
                (
                    "q",
                    format!("repo:{}/{} type:issue state:{}", owner, repo, state.as_str()),
                ),
                ("per_page", "1".to_string()),
            ],
        )?;
        let total: SearchTotal = serde_json::from_str(&response.body)?;
        total.total_count.ok_or(GitHubError::MissingField("total_count"))
    }

    fn count_contributors(&self, owner: &str, repo: &str) -> Result<u64, GitHubError> {
        let response = self.get(
            &format!("/repos/{}/{}/contributors", owner, repo),
            &[("per_page", "1".to_string()), ("anon", "true".to_string())],
        )?;
        count_listed_items(&response)
    }
}

fn cache_key(url: &str, query: &[(&str, String)]) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let params: Vec<String> = query
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    format!("{}?{}", url, params.join("&"))
}

/// Total item count of a `per_page=1` listing.
///
/// With one item per page the last page number is the total; without a
/// `Link` header everything fit on a single page.
fn count_listed_items(response: &CachedResponse) -> Result<u64, GitHubError> {
    if let Some(last) = response.link.as_deref().and_then(last_page_from_link) {
        return Ok(last);
    }
    // 204 No Content for empty repositories
    if response.body.trim().is_empty() {
        return Ok(0);
    }
    let items: Vec<serde_json::Value> = serde_json::from_str(&response.body)?;
    Ok(items.len() as u64)
}

/// Page number of the `rel="last"` entry of a GitHub `Link` header.
pub fn last_page_from_link(link: &str) -> Option<u64> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r#"<[^>]*[?&]page=(\d+)[^>]*>\s*;\s*rel="last""#)
            .expect("link pattern is valid")
    });
    pattern
        .captures(link)
        .and_then(|caps| caps[1].parse().ok())
}
