//! Redacted wrapper for API tokens.
//!
//! [`SecretString`] never prints its value: `Debug`, `Display` and
//! `Serialize` all emit [`REDACTED`]. Callers must go through
//! [`SecretString::expose`] to read it, and the buffer is zeroed on drop.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Placeholder emitted wherever a secret would otherwise appear.
pub const REDACTED: &str = "[REDACTED]";

/// An opaque token read from configuration.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    inner: String,
}

impl SecretString {
    pub fn new(inner: impl Into<String>) -> Self {
        Self {
            inner: inner.into(),
        }
    }

    /// Explicit access to the token value.
    pub fn expose(&self) -> &str {
        &self.inner
    }

    pub fn is_empty(&self) -> bool {
        self.inner.trim().is_empty()
    }

    /// Replace every occurrence of this secret in `text` with [`REDACTED`].
    pub fn redact(&self, text: &str) -> String {
        if self.inner.is_empty() {
            return text.to_owned();
        }
        text.replace(self.inner.as_str(), REDACTED)
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretString").field(&REDACTED).finish()
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretString::new)
    }
}

/// Redact every secret in `secrets` from `text`.
pub fn redact_all(text: &str, secrets: &[&SecretString]) -> String {
    secrets
        .iter()
        .fold(text.to_owned(), |acc, secret| secret.redact(&acc))
}
