pub mod app;
pub mod cache;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod github;
pub mod models;
pub mod rate_limit;
pub mod report;
pub mod resolver;
pub mod scoring;
pub mod store;
pub mod url;

#[cfg(test)]
pub mod test_utils;
