//! orgmirror core library: domain types, configuration, retry policy and
//! reconciliation.
//!
//! Nothing in this crate touches the network or spawns processes:
//! - [`types`]: repository descriptors and the mirror inventory
//! - [`secret`]: [`SecretString`] for API tokens
//! - [`config`]: YAML configuration load / validate
//! - [`retry`]: [`RetryPolicy`] exponential backoff and the [`Sleeper`] seam
//! - [`pagination`]: page-walking helper shared by both inventory fetchers
//! - [`reconcile`]: per-repository create / update / skip decisions

pub mod config;
pub mod error;
pub mod pagination;
pub mod reconcile;
pub mod retry;
pub mod secret;
pub mod types;

pub use config::{Config, MirrorConfig, SourceConfig, TransferConfig};
pub use error::{ConfigError, ReconcileError};
pub use reconcile::{Action, PlannedRepository, ReconcileOptions, SkipReason};
pub use retry::{RetryPolicy, Retryable, Sleeper, ThreadSleeper};
#[cfg(any(test, feature = "test-util"))]
pub use retry::RecordingSleeper;
pub use secret::SecretString;
pub use types::{InventorySummary, MirrorInventory, RepoName, RepositoryDescriptor, Visibility};
