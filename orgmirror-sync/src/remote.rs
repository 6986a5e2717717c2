//! Authenticated git remote URLs and redaction of the tokens they embed.

use orgmirror_core::{secret::redact_all, Config, SecretString};

use crate::error::TransferError;

const SOURCE_USER: &str = "x-access-token";
const MIRROR_USER: &str = "mirror";

/// Credentials and locations for both ends of a transfer.
#[derive(Debug, Clone)]
pub struct Remotes {
    pub source_token: SecretString,
    pub mirror_token: SecretString,
    /// Base URL of the mirror's git service, e.g. `https://codeberg.org`.
    pub mirror_git_url: String,
    pub mirror_organization: String,
}

impl Remotes {
    pub fn from_config(config: &Config) -> Self {
        Self {
            source_token: config.source.token.clone(),
            mirror_token: config.mirror.token.clone(),
            mirror_git_url: config.mirror.git_url.clone(),
            mirror_organization: config.mirror.organization.clone(),
        }
    }

    /// Fetch URL for a source repository's `clone_url`.
    pub fn source_url(&self, clone_url: &str) -> Result<String, TransferError> {
        with_credentials(clone_url, SOURCE_USER, &self.source_token)
    }

    /// Push URL for `name` in the mirror organization.
    pub fn mirror_url(&self, name: &str) -> Result<String, TransferError> {
        let plain = format!(
            "{}/{}/{}.git",
            self.mirror_git_url.trim_end_matches('/'),
            self.mirror_organization,
            name
        );
        with_credentials(&plain, MIRROR_USER, &self.mirror_token)
    }

    /// `text` with both tokens replaced.
    pub fn redact(&self, text: &str) -> String {
        redact_all(text, &[&self.source_token, &self.mirror_token])
    }
}

/// Embed `user:token@` after the scheme of an http(s) URL. Local `file://`
/// URLs are returned unchanged.
fn with_credentials(url: &str, user: &str, token: &SecretString) -> Result<String, TransferError> {
    if url.starts_with("file://") {
        return Ok(url.to_string());
    }
    let (scheme, rest) = url
        .split_once("://")
        .filter(|(scheme, _)| matches!(*scheme, "https" | "http"))
        .ok_or_else(|| TransferError::InvalidUrl(token.redact(url)))?;

    // Drop any userinfo already present.
    let host_and_path = match rest.split_once('@') {
        Some((userinfo, tail)) if !userinfo.contains('/') => tail,
        _ => rest,
    };
    Ok(format!(
        "{scheme}://{user}:{}@{host_and_path}",
        token.expose()
    ))
}
