//! YAML configuration.
//!
//! # File layout
//!
//! ```yaml
//! source:
//!   organization: acme
//!   token: ghp_xxx
//! mirror:
//!   organization: acme
//!   token: xxx
//! transfer:
//!   work_directory: ~/mirrors
//! ```
//!
//! # API pattern
//!
//! As with every path-dependent helper in this workspace, there are two forms:
//! - `load_at(path, home)`: explicit home used for `~` expansion; tests use this
//! - `load(path)`: derives home from `dirs::home_dir()`, delegates to `load_at`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::retry::{RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};
use crate::secret::SecretString;

pub const DEFAULT_SOURCE_API_URL: &str = "https://api.github.com";
pub const DEFAULT_MIRROR_API_URL: &str = "https://codeberg.org/api/v1";
pub const DEFAULT_MIRROR_GIT_URL: &str = "https://codeberg.org";
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1_000;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub source: SourceConfig,
    pub mirror: MirrorConfig,
    pub transfer: TransferConfig,
}

/// The organization being mirrored from.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub organization: String,
    pub token: SecretString,
    #[serde(default = "default_source_api_url")]
    pub api_url: String,
}

/// The organization being mirrored to.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MirrorConfig {
    pub organization: String,
    pub token: SecretString,
    #[serde(default = "default_mirror_api_url")]
    pub api_url: String,
    /// Base URL that git pushes go to: `<git_url>/<organization>/<name>.git`.
    #[serde(default = "default_mirror_git_url")]
    pub git_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransferConfig {
    /// Parent directory of the bare mirror clones. A leading `~` is expanded.
    pub work_directory: PathBuf,
    /// Pacing delay between remote calls.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Attempts per network operation, including the first.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_base_delay_secs")]
    pub retry_base_delay_secs: u64,
}

fn default_source_api_url() -> String {
    DEFAULT_SOURCE_API_URL.to_string()
}

fn default_mirror_api_url() -> String {
    DEFAULT_MIRROR_API_URL.to_string()
}

fn default_mirror_git_url() -> String {
    DEFAULT_MIRROR_GIT_URL.to_string()
}

fn default_request_delay_ms() -> u64 {
    DEFAULT_REQUEST_DELAY_MS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_retry_base_delay_secs() -> u64 {
    DEFAULT_BASE_DELAY.as_secs()
}

impl TransferConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_secs(self.retry_base_delay_secs),
        )
    }
}

impl Config {
    /// Reject values that parse but cannot drive a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("source.organization", &self.source.organization)?;
        require_non_empty("mirror.organization", &self.mirror.organization)?;
        if self.source.token.is_empty() {
            return Err(ConfigError::Invalid("source.token must not be empty".into()));
        }
        if self.mirror.token.is_empty() {
            return Err(ConfigError::Invalid("mirror.token must not be empty".into()));
        }
        require_http("source.api_url", &self.source.api_url)?;
        require_http("mirror.api_url", &self.mirror.api_url)?;
        require_http("mirror.git_url", &self.mirror.git_url)?;
        if self.transfer.max_retries == 0 {
            return Err(ConfigError::Invalid(
                "transfer.max_retries must be at least 1".into(),
            ));
        }
        if self.transfer.work_directory.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "transfer.work_directory must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_http(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("https://") || value.starts_with("http://") {
        return Ok(());
    }
    Err(ConfigError::Invalid(format!(
        "{field} must be an http(s) URL, got '{value}'"
    )))
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `<home>/.config/orgmirror/config.yaml`: pure, no I/O.
pub fn default_path_at(home: &Path) -> PathBuf {
    home.join(".config").join("orgmirror").join("config.yaml")
}

/// `default_path_at` convenience wrapper.
pub fn default_path() -> Result<PathBuf, ConfigError> {
    Ok(default_path_at(&home()?))
}

/// Expand a leading `~` against `home`. Other paths are returned unchanged.
pub fn expand_home_at(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Read, parse, expand and validate the config file at `path`.
pub fn load_at(path: &Path, home: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: Config =
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    config.transfer.work_directory = expand_home_at(&config.transfer.work_directory, home);
    config.source.api_url = trim_trailing_slash(&config.source.api_url);
    config.mirror.api_url = trim_trailing_slash(&config.mirror.api_url);
    config.mirror.git_url = trim_trailing_slash(&config.mirror.git_url);

    config.validate()?;
    Ok(config)
}

/// `load_at` convenience wrapper.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    load_at(path, &home()?)
}

fn trim_trailing_slash(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}
