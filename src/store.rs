//! Persistence of scan reports as JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::TokenReport;

const DEFAULT_REPORTS_DIR: &str = ".token-health/scans";

pub fn default_reports_dir() -> PathBuf {
    PathBuf::from(DEFAULT_REPORTS_DIR)
}

/// Generate a timestamped filename for a scan.
pub fn default_report_filename() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    format!("scan_{}.json", timestamp)
}

/// Save reports to disk.
///
/// If `path` is None, saves to the default location.
pub fn save_reports(reports: &[TokenReport], path: Option<&Path>) -> Result<PathBuf, std::io::Error> {
    let save_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_reports_dir().join(default_report_filename()),
    };

    if let Some(parent) = save_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(reports).map_err(std::io::Error::other)?;
    fs::write(&save_path, json)?;
    Ok(save_path)
}

/// Load previously saved reports.
pub fn load_reports(path: &Path) -> Result<Vec<TokenReport>, std::io::Error> {
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(std::io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::PillarScores;
    use tempfile::TempDir;

    fn make_report(symbol: &str) -> TokenReport {
        TokenReport {
            symbol: symbol.to_string(),
            github_url: None,
            repository: None,
            development: None,
            failure: Some("no GitHub URL".to_string()),
            pillars: PillarScores::default(),
            overall_score: None,
            scanned_at: "2024-06-01T12:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("scan.json");

        let saved = save_reports(&[make_report("AAA"), make_report("BBB")], Some(&path)).unwrap();
        assert_eq!(saved, path);

        let loaded = load_reports(&path).unwrap();
        let symbols: Vec<_> = loaded.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAA", "BBB"]);
        assert_eq!(loaded[0].failure.as_deref(), Some("no GitHub URL"));
    }

    #[test]
    fn load_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_reports(&path).is_err());
    }

    #[test]
    fn default_filename_is_timestamped() {
        let name = default_report_filename();
        assert!(name.starts_with("scan_"));
        assert!(name.ends_with(".json"));
    }
}
