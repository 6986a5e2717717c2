//! The operations a mirror run consumes from each hosting API.
//!
//! Listing calls are page-granular; walking pages, pacing and retries are
//! the caller's concern.

use orgmirror_core::{RepoName, RepositoryDescriptor};
use serde::{Deserialize, Serialize};

use crate::error::ForgeError;

/// The host being mirrored from.
pub trait SourceHost {
    /// One page of the organization's repositories, private ones included.
    fn list_repository_page(
        &self,
        organization: &str,
        page: u32,
        per_page: usize,
    ) -> Result<Vec<RepositoryDescriptor>, ForgeError>;

    /// Who the token authenticates as, and what it may do.
    fn check_token(&self) -> Result<TokenReport, ForgeError>;

    /// Organization metadata visible to the token.
    fn org_summary(&self, organization: &str) -> Result<OrgSummary, ForgeError>;
}

/// The host being mirrored to.
pub trait MirrorHost {
    /// One page of repository names in the organization.
    fn list_repository_page(
        &self,
        organization: &str,
        page: u32,
        limit: usize,
    ) -> Result<Vec<RepoName>, ForgeError>;

    /// Create a repository. "Already exists" is reported as
    /// [`CreateOutcome::AlreadyExists`], not as an error.
    fn create_repository(
        &self,
        organization: &str,
        request: &CreateRepository,
    ) -> Result<CreateOutcome, ForgeError>;

    fn update_visibility(
        &self,
        organization: &str,
        name: &str,
        private: bool,
    ) -> Result<(), ForgeError>;
}

/// Body of a repository creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRepository {
    pub name: String,
    pub private: bool,
    pub description: String,
    pub auto_init: bool,
}

impl CreateRepository {
    /// An empty repository ready to receive a mirror push.
    pub fn empty(name: impl Into<String>, private: bool, description: Option<&str>) -> Self {
        Self {
            name: name.into(),
            private,
            description: description.unwrap_or_default().to_string(),
            auto_init: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Result of a token check. A rejected token still yields a report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenReport {
    pub status: u16,
    /// `None` when the token was rejected.
    pub login: Option<String>,
    pub scopes: Option<String>,
    pub rate_limit_remaining: Option<String>,
}

impl TokenReport {
    pub fn is_valid(&self) -> bool {
        self.login.is_some()
    }
}

/// Organization metadata. Private counts are only visible to admins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrgSummary {
    pub login: String,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub total_private_repos: Option<u64>,
    #[serde(default)]
    pub owned_private_repos: Option<u64>,
}
