//! Error types for orgmirror-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file does not exist.
    #[error("config file not found: {path} (copy config.example.yaml there and fill in your tokens)")]
    NotFound { path: PathBuf },

    /// Underlying I/O failure while reading the file.
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error with the line context serde_yaml reports.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The file parsed but a value is unusable.
    #[error("invalid config: {0}")]
    Invalid(String),

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// Errors raised before reconciliation begins.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// An explicit repository filter matched nothing in the source listing.
    #[error("repository '{name}' not found in organization '{organization}'")]
    RepositoryNotFound { name: String, organization: String },
}
