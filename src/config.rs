//! Console configuration
//!
//! Resolved in order: command-line flag, environment, config file, defaults.

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::pager::PAGE_SIZE_OPTIONS;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

const ENV_API_URL: &str = "MUSEUM_API_URL";
const ENV_API_TIMEOUT: &str = "MUSEUM_API_TIMEOUT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid timeout {0:?}: expected whole seconds, at least 1")]
    InvalidTimeout(String),

    #[error("page size {0} is not one of 10, 20, 50, 100")]
    InvalidPageSize(u32),

    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Optional settings from `<config dir>/museumcmd/config.json`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub page_size: Option<u32>,
}

impl FileConfig {
    /// Missing file reads as empty settings.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("museumcmd").join("config.json"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub timeout_secs: u64,
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from the environment and the default config file.
    /// `api_url` is the command-line override and wins over everything.
    pub fn load(api_url: Option<&str>) -> Result<Self, ConfigError> {
        let file = match FileConfig::default_path() {
            Some(path) => FileConfig::load(&path)?,
            None => FileConfig::default(),
        };
        Self::resolve(api_url, |key| env::var(key).ok(), file)
    }

    pub fn resolve(
        api_url: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
        file: FileConfig,
    ) -> Result<Self, ConfigError> {
        let non_empty = |v: String| (!v.trim().is_empty()).then_some(v);

        let api_url = api_url
            .map(str::to_string)
            .or_else(|| env(ENV_API_URL).and_then(non_empty))
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = match env(ENV_API_TIMEOUT).and_then(non_empty) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
            None => file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        // timeouts are whole seconds, at least one
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(timeout_secs.to_string()));
        }

        let page_size = file.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            return Err(ConfigError::InvalidPageSize(page_size));
        }

        Ok(Self {
            api_url: validate_api_url(&api_url)?,
            timeout_secs,
            page_size,
        })
    }
}

/// Require an absolute http(s) URL and drop trailing slashes.
fn validate_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}
