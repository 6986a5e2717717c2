//! Per-repository provisioning decisions.
//!
//! Pure functions over the source listing and the mirror inventory; nothing
//! here performs I/O.

use crate::error::ReconcileError;
use crate::types::{MirrorInventory, RepositoryDescriptor};

/// Flags that influence the decision for every repository in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub dry_run: bool,
    pub skip_existing: bool,
}

/// Why a repository needs no provisioning call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Present on the mirror and `skip_existing` was requested; the
    /// repository is left out of the run entirely.
    ExistsOnMirror,
    /// Present on the mirror during a dry run. The inventory carries names
    /// only, so visibility is taken to match; the transfer is still reported.
    DryRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Absent from the mirror inventory.
    Create,
    /// Present on the mirror; re-assert its visibility.
    UpdateVisibility,
    Skip(SkipReason),
}

/// A source repository paired with the action chosen for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRepository {
    pub repository: RepositoryDescriptor,
    pub action: Action,
}

/// Decide the action for one repository.
pub fn plan(
    repository: &RepositoryDescriptor,
    inventory: &MirrorInventory,
    options: ReconcileOptions,
) -> Action {
    if !inventory.contains(&repository.name.0) {
        return Action::Create;
    }
    if options.skip_existing {
        Action::Skip(SkipReason::ExistsOnMirror)
    } else if options.dry_run {
        Action::Skip(SkipReason::DryRun)
    } else {
        Action::UpdateVisibility
    }
}

/// Classify every repository exactly once, preserving source order.
pub fn plan_all(
    repositories: &[RepositoryDescriptor],
    inventory: &MirrorInventory,
    options: ReconcileOptions,
) -> Vec<PlannedRepository> {
    repositories
        .iter()
        .map(|repository| PlannedRepository {
            action: plan(repository, inventory, options),
            repository: repository.clone(),
        })
        .collect()
}

/// Narrow the listing to the single repository called `name`.
///
/// An empty match is an error: the caller asked for a repository the
/// organization does not have.
pub fn select_repository(
    repositories: Vec<RepositoryDescriptor>,
    name: &str,
    organization: &str,
) -> Result<Vec<RepositoryDescriptor>, ReconcileError> {
    let selected: Vec<_> = repositories
        .into_iter()
        .filter(|r| r.name.0 == name)
        .collect();
    if selected.is_empty() {
        return Err(ReconcileError::RepositoryNotFound {
            name: name.to_string(),
            organization: organization.to_string(),
        });
    }
    Ok(selected)
}

/// Drop repositories that already exist on the mirror. Returns how many
/// were removed.
pub fn retain_missing(
    repositories: &mut Vec<RepositoryDescriptor>,
    inventory: &MirrorInventory,
) -> usize {
    let before = repositories.len();
    repositories.retain(|r| !inventory.contains(&r.name.0));
    before - repositories.len()
}
