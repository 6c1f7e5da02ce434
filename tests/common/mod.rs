//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Duration, TimeZone, Utc};

use token_health_scan::github::{GitHubError, IssueState, RepoDetails, RepoSource};
use token_health_scan::models::{RepositoryActivityMetrics, RepositoryCandidate};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    fixed_now() - Duration::days(days)
}

pub fn candidate(owner: &str, name: &str, stars: u64, pushed_days_ago: i64) -> RepositoryCandidate {
    RepositoryCandidate::new(owner, name)
        .with_stars(stars)
        .with_pushed_at(days_ago(pushed_days_ago))
}

pub fn active_metrics() -> RepositoryActivityMetrics {
    RepositoryActivityMetrics {
        star_count: 300,
        fork_count: 60,
        commits_last_30_days: 40,
        contributors_count: 15,
        open_issues_count: 20,
        closed_issues_count: 60,
        last_pushed_at: Some(days_ago(2)),
        is_archived: false,
        is_fork: false,
    }
}

/// Owner listings keyed by login, counting how often they are requested.
#[derive(Default)]
pub struct ListingSource {
    orgs: HashMap<String, Vec<RepositoryCandidate>>,
    users: HashMap<String, Vec<RepositoryCandidate>>,
    pub listing_calls: AtomicUsize,
}

impl ListingSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn org(mut self, owner: &str, repos: Vec<RepositoryCandidate>) -> Self {
        self.orgs.insert(owner.to_string(), repos);
        self
    }

    pub fn user(mut self, owner: &str, repos: Vec<RepositoryCandidate>) -> Self {
        self.users.insert(owner.to_string(), repos);
        self
    }

    pub fn calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    fn lookup(
        &self,
        map: &HashMap<String, Vec<RepositoryCandidate>>,
        owner: &str,
    ) -> Result<Vec<RepositoryCandidate>, GitHubError> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        map.get(owner)
            .cloned()
            .ok_or_else(|| GitHubError::NotFound(owner.to_string()))
    }
}

impl RepoSource for ListingSource {
    fn list_org_repos(&self, owner: &str) -> Result<Vec<RepositoryCandidate>, GitHubError> {
        self.lookup(&self.orgs, owner)
    }

    fn list_user_repos(&self, owner: &str) -> Result<Vec<RepositoryCandidate>, GitHubError> {
        self.lookup(&self.users, owner)
    }

    fn repo_details(&self, owner: &str, repo: &str) -> Result<RepoDetails, GitHubError> {
        Err(GitHubError::NotFound(format!("{}/{}", owner, repo)))
    }

    fn count_commits_since(
        &self,
        _owner: &str,
        _repo: &str,
        _since: DateTime<Utc>,
    ) -> Result<u64, GitHubError> {
        Ok(0)
    }

    fn count_issues(&self, _owner: &str, _repo: &str, _state: IssueState) -> Result<u64, GitHubError> {
        Ok(0)
    }

    fn count_contributors(&self, _owner: &str, _repo: &str) -> Result<u64, GitHubError> {
        Ok(0)
    }
}

/// A canned HTTP response.
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            headers: Vec::new(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: r#"{"message": "canned"}"#.to_string(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Minimal HTTP/1.1 server answering every request through `route`.
///
/// `route` receives the request target (path plus query string).
pub struct CannedServer {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl CannedServer {
    pub fn start<F>(route: F) -> Self
    where
        F: Fn(&str) -> Reply + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind canned server");
        let addr = listener.local_addr().expect("local addr");
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                // drain headers
                let mut line = String::new();
                while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                    if line == "\r\n" || line == "\n" {
                        break;
                    }
                    line.clear();
                }

                counter.fetch_add(1, Ordering::SeqCst);
                let target = request_line.split_whitespace().nth(1).unwrap_or("/");
                let reply = route(target);

                let mut response = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
                    reply.status,
                    reply.body.len()
                );
                for (name, value) in &reply.headers {
                    response.push_str(&format!("{}: {}\r\n", name, value));
                }
                response.push_str("\r\n");
                response.push_str(&reply.body);
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self { addr, hits }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}
