// Configuration loading.
// Reads config.toml from the platform config directory and applies defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::paths;
use crate::error::{CatalogError, Result};
use crate::github::RetryPolicy;

const DEFAULT_OWNER: &str = "loryanstrant";
const DEFAULT_REPO: &str = "MicrosoftCloudLogos";
const DEFAULT_BRANCH: &str = "HEAD";
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Values as they appear in config.toml. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub api_base: Option<String>,
    pub raw_base: Option<String>,
    pub cache_ttl_secs: Option<u64>,
    pub lookback_days: Option<i64>,
    pub commit_limit: Option<u32>,
    pub commit_detail_limit: Option<usize>,
    pub retry_attempts: Option<u32>,
    pub retry_base_delay_ms: Option<u64>,
    pub image_retry_delay_ms: Option<u64>,
}

/// Resolved configuration with defaults applied.
#[derive(Debug, Clone)]
pub struct Config {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub api_base: String,
    pub raw_base: String,
    pub cache_ttl: Duration,
    pub lookback_days: i64,
    pub commit_limit: u32,
    pub commit_detail_limit: usize,
    pub retry: RetryPolicy,
    pub image_retry_delay: Duration,
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config::from_file(FileConfig::default())
    }
}

impl Config {
    /// Apply defaults to the values read from disk.
    pub fn from_file(file: FileConfig) -> Self {
        let owner = file.owner.unwrap_or_else(|| DEFAULT_OWNER.to_string());
        let repo = file.repo.unwrap_or_else(|| DEFAULT_REPO.to_string());
        let branch = file.branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string());
        let mut raw_base = file.raw_base.unwrap_or_else(|| {
            format!(
                "https://raw.githubusercontent.com/{}/{}/{}/",
                owner, repo, branch
            )
        });
        if !raw_base.ends_with('/') {
            raw_base.push('/');
        }

        Self {
            api_base: file
                .api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            raw_base,
            cache_ttl: Duration::from_secs(file.cache_ttl_secs.unwrap_or(24 * 60 * 60)),
            lookback_days: file.lookback_days.unwrap_or(30),
            commit_limit: file.commit_limit.unwrap_or(100).clamp(1, 100),
            commit_detail_limit: file.commit_detail_limit.unwrap_or(20),
            retry: RetryPolicy {
                max_attempts: file.retry_attempts.unwrap_or(3).max(1),
                base_delay: Duration::from_millis(file.retry_base_delay_ms.unwrap_or(1000)),
            },
            image_retry_delay: Duration::from_millis(file.image_retry_delay_ms.unwrap_or(2000)),
            token: None,
            owner,
            repo,
            branch,
        }
    }

    /// Load configuration from an explicit path, or the default location if present.
    /// A missing default file is not an error; a missing explicit file is.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let file = match explicit {
            Some(path) => parse_file(path)?,
            None => match paths::config_path() {
                Some(path) if path.exists() => parse_file(&path)?,
                _ => FileConfig::default(),
            },
        };

        let mut config = Config::from_file(file);
        config.token = std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        Ok(config)
    }

    /// Short display name, e.g. "owner/repo".
    pub fn repo_slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

fn parse_file(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| CatalogError::Config(format!("{}: {}", path.display(), e)))
}
