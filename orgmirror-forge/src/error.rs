//! Error types for orgmirror-forge.

use orgmirror_core::Retryable;
use thiserror::Error;

/// Longest response body kept in an error message.
const MAX_BODY_CHARS: usize = 512;

/// Coarse transport failure class, used for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Connection refused or reset while connecting.
    ConnectionFailed,
    Dns,
    /// Read/connect timeouts surface here.
    Io,
    Other,
}

/// All errors that can arise from a hosting API call.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// The request never produced an HTTP response.
    #[error("request to {url} failed: {message}")]
    Transport {
        url: String,
        kind: TransportKind,
        message: String,
    },

    /// The server answered with an unexpected status.
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The body could not be decoded into the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ForgeError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ForgeError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Retryable for ForgeError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            ForgeError::Transport {
                kind: TransportKind::ConnectionFailed | TransportKind::Dns | TransportKind::Io,
                ..
            }
        )
    }
}

/// Convert a `ureq` failure into a [`ForgeError`] for `url`.
pub(crate) fn from_ureq(url: &str, err: ureq::Error) -> ForgeError {
    match err {
        ureq::Error::Status(status, response) => status_error(url, status, response),
        ureq::Error::Transport(transport) => {
            let kind = match transport.kind() {
                ureq::ErrorKind::ConnectionFailed => TransportKind::ConnectionFailed,
                ureq::ErrorKind::Dns => TransportKind::Dns,
                ureq::ErrorKind::Io => TransportKind::Io,
                _ => TransportKind::Other,
            };
            ForgeError::Transport {
                url: url.to_string(),
                kind,
                message: transport.to_string(),
            }
        }
    }
}

pub(crate) fn status_error(url: &str, status: u16, response: ureq::Response) -> ForgeError {
    let body = response.into_string().unwrap_or_default();
    ForgeError::Status {
        url: url.to_string(),
        status,
        body: truncate(body.trim()),
    }
}

pub(crate) fn decode_error(url: &str, err: impl std::fmt::Display) -> ForgeError {
    ForgeError::Decode {
        url: url.to_string(),
        message: err.to_string(),
    }
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_BODY_CHARS {
        return body.to_string();
    }
    let mut cut: String = body.chars().take(MAX_BODY_CHARS).collect();
    cut.push('…');
    cut
}
