//! # orgmirror-forge
//!
//! Blocking clients for the two hosting APIs a mirror run talks to.
//!
//! [`GitHubClient`] implements [`SourceHost`] (the organization being
//! mirrored from) and [`GiteaClient`] implements [`MirrorHost`] (the
//! organization being mirrored to). Callers depend on the traits so runs can
//! be exercised without a network.

mod client;
pub mod error;
pub mod gitea;
pub mod github;
pub mod host;

pub use client::{agent, user_agent, DIAGNOSTIC_TIMEOUT, REQUEST_TIMEOUT};
pub use error::{ForgeError, TransportKind};
pub use gitea::GiteaClient;
pub use github::GitHubClient;
pub use host::{CreateOutcome, CreateRepository, MirrorHost, OrgSummary, SourceHost, TokenReport};
