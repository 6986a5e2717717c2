//! Creates mirror repositories and keeps their visibility in line with the
//! source.

use orgmirror_core::{RetryPolicy, Sleeper};
use orgmirror_forge::{CreateOutcome, CreateRepository, ForgeError, MirrorHost};
use tracing::{info, warn};

/// Result of a best-effort visibility update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibilityOutcome {
    Updated,
    /// The update failed after retries; the message is for the log only.
    Failed(String),
}

impl VisibilityOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, VisibilityOutcome::Updated)
    }
}

pub struct Provisioner<'a> {
    host: &'a dyn MirrorHost,
    organization: &'a str,
    policy: RetryPolicy,
    sleeper: &'a dyn Sleeper,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        host: &'a dyn MirrorHost,
        organization: &'a str,
        policy: RetryPolicy,
        sleeper: &'a dyn Sleeper,
    ) -> Self {
        Self {
            host,
            organization,
            policy,
            sleeper,
        }
    }

    /// Create an empty mirror repository. An existing repository of the same
    /// name counts as success.
    pub fn create(
        &self,
        name: &str,
        private: bool,
        description: Option<&str>,
    ) -> Result<CreateOutcome, ForgeError> {
        let request = CreateRepository::empty(name, private, description);
        let outcome = self
            .policy
            .run_retryable(self.sleeper, "create mirror repository", |_| {
                self.host.create_repository(self.organization, &request)
            })?;

        match outcome {
            CreateOutcome::Created => info!(repo = name, private, "Created repository on mirror"),
            CreateOutcome::AlreadyExists => info!(repo = name, "Repository already exists on mirror"),
        }
        Ok(outcome)
    }

    /// Set the mirror repository's visibility. Failures are logged and
    /// reported, never raised.
    pub fn update_visibility(&self, name: &str, private: bool) -> VisibilityOutcome {
        let result = self
            .policy
            .run_retryable(self.sleeper, "update mirror visibility", |_| {
                self.host.update_visibility(self.organization, name, private)
            });

        match result {
            Ok(()) => {
                info!(repo = name, private, "Updated visibility on mirror");
                VisibilityOutcome::Updated
            }
            Err(err) => {
                warn!(repo = name, error = %err, "Failed to update visibility");
                VisibilityOutcome::Failed(err.to_string())
            }
        }
    }
}
