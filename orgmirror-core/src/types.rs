//! Domain types for repository inventories.
//!
//! [`RepositoryDescriptor`] deserializes directly from the source host's
//! listing payload; unknown fields are ignored.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A repository name, unique within an organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoName(pub String);

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RepoName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RepoName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Borrow<str> for RepoName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RepoName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Repository visibility, derived from the `private` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn from_private(private: bool) -> Self {
        if private {
            Visibility::Private
        } else {
            Visibility::Public
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One repository as listed by the source host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    pub name: RepoName,
    /// HTTPS fetch URL, without credentials.
    pub clone_url: String,
    /// Carried for completeness; transfers always go over HTTPS.
    #[serde(default)]
    pub ssh_url: String,
    pub private: bool,
    #[serde(default)]
    pub description: Option<String>,
    /// Empty repositories may not report one.
    #[serde(default)]
    pub default_branch: String,
}

impl RepositoryDescriptor {
    pub fn visibility(&self) -> Visibility {
        Visibility::from_private(self.private)
    }
}

/// Visibility breakdown of a source inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InventorySummary {
    pub total: usize,
    pub public: usize,
    pub private: usize,
}

impl InventorySummary {
    pub fn of(repos: &[RepositoryDescriptor]) -> Self {
        let private = repos.iter().filter(|r| r.private).count();
        Self {
            total: repos.len(),
            public: repos.len() - private,
            private,
        }
    }
}

/// Names of the repositories that already exist on the mirror host.
///
/// Built once per run and only used for membership tests afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorInventory {
    names: HashSet<RepoName>,
}

impl MirrorInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<N: Into<RepoName>> FromIterator<N> for MirrorInventory {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<N: Into<RepoName>> Extend<N> for MirrorInventory {
    fn extend<I: IntoIterator<Item = N>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
