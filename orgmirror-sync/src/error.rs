//! Error types for orgmirror-sync.

use std::path::PathBuf;

use orgmirror_core::{ReconcileError, Retryable};
use orgmirror_forge::ForgeError;
use thiserror::Error;

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to list source repositories: {0}")]
    SourceInventory(#[source] ForgeError),

    #[error("failed to list mirror repositories: {0}")]
    MirrorInventory(#[source] ForgeError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why one repository's transfer failed. Messages are already redacted.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("clone failed: {0}")]
    Clone(String),

    #[error("failed to list refs: {0}")]
    ListRefs(String),

    /// The mirror host could not be reached during push.
    #[error("connection error: {0}")]
    Connectivity(String),

    #[error("push failed: {0}")]
    PushRejected(String),

    #[error("unsupported remote URL: {0}")]
    InvalidUrl(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Retryable for TransferError {
    fn is_retryable(&self) -> bool {
        matches!(self, TransferError::Connectivity(_))
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`TransferError::Io`].
pub(crate) fn transfer_io_err(path: impl Into<PathBuf>, source: std::io::Error) -> TransferError {
    TransferError::Io {
        path: path.into(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_connectivity_is_retryable() {
        assert!(TransferError::Connectivity("Could not connect".into()).is_retryable());
        assert!(!TransferError::Clone("Connection refused".into()).is_retryable());
        assert!(!TransferError::PushRejected("denied".into()).is_retryable());
        assert!(!TransferError::ListRefs("bad".into()).is_retryable());
    }
}
