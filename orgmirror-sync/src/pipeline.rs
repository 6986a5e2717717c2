//! The mirror run: diagnostics, inventories, then every repository in source
//! order.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use orgmirror_core::{
    reconcile::{plan_all, retain_missing, select_repository},
    Action, Config, PlannedRepository, ReconcileOptions, RetryPolicy, SkipReason, Sleeper,
};
use orgmirror_forge::{MirrorHost, SourceHost};
use tracing::{debug, error, info, warn};

use crate::error::{io_err, SyncError};
use crate::git::GitRunner;
use crate::inventory::{fetch_mirror_inventory, fetch_source_inventory};
use crate::provision::Provisioner;
use crate::remote::Remotes;
use crate::transfer::{TransferEngine, TransferOutcome};

/// Flags for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub dry_run: bool,
    pub skip_existing: bool,
    /// Stop after the token diagnostics.
    pub check_token_only: bool,
    /// Mirror only this repository.
    pub repository: Option<String>,
}

/// The configuration values a run consumes.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub source_organization: String,
    pub mirror_organization: String,
    pub work_dir: PathBuf,
    pub request_delay: Duration,
    pub retry: RetryPolicy,
}

impl RunSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            source_organization: config.source.organization.clone(),
            mirror_organization: config.mirror.organization.clone(),
            work_dir: config.transfer.work_directory.clone(),
            request_delay: config.transfer.request_delay(),
            retry: config.transfer.retry_policy(),
        }
    }
}

/// External collaborators of a run.
pub struct Services<'a> {
    pub source: &'a dyn SourceHost,
    pub mirror: &'a dyn MirrorHost,
    pub git: &'a dyn GitRunner,
    pub sleeper: &'a dyn Sleeper,
    pub remotes: &'a Remotes,
}

/// Aggregate counts for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunResult {
    pub succeeded: usize,
    pub failed: usize,
    /// Dropped before processing by `skip_existing`.
    pub skipped_existing: usize,
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Process exit status: 0 when every repository succeeded, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Run one mirror pass.
///
/// Inventory and filter problems abort with `Err`. Failures of individual
/// repositories are counted in the result and never stop the run.
pub fn run(
    services: &Services<'_>,
    settings: &RunSettings,
    options: &RunOptions,
) -> Result<RunResult, SyncError> {
    report_diagnostics(services.source, &settings.source_organization);
    if options.check_token_only {
        info!("Token check complete");
        return Ok(RunResult::default());
    }

    fs::create_dir_all(&settings.work_dir).map_err(|e| io_err(&settings.work_dir, e))?;

    let mut repos = fetch_source_inventory(services.source, &settings.source_organization)
        .map_err(SyncError::SourceInventory)?;

    if let Some(name) = options.repository.as_deref() {
        repos = select_repository(repos, name, &settings.source_organization)?;
    }

    let inventory = fetch_mirror_inventory(
        services.mirror,
        &settings.mirror_organization,
        &settings.retry,
        services.sleeper,
        settings.request_delay,
    )
    .map_err(SyncError::MirrorInventory)?;

    let mut result = RunResult::default();
    if options.skip_existing {
        result.skipped_existing = retain_missing(&mut repos, &inventory);
        info!(
            "Skipping {} existing repos, {} remaining",
            result.skipped_existing,
            repos.len()
        );
    }

    let reconcile = ReconcileOptions {
        dry_run: options.dry_run,
        skip_existing: options.skip_existing,
    };
    let planned = plan_all(&repos, &inventory, reconcile);

    let provisioner = Provisioner::new(
        services.mirror,
        &settings.mirror_organization,
        settings.retry,
        services.sleeper,
    );
    let engine = TransferEngine::new(
        services.git,
        services.sleeper,
        &settings.work_dir,
        settings.retry,
        services.remotes,
    );

    let total = planned.len();
    for (index, item) in planned.iter().enumerate() {
        info!(
            "[{}/{}] Processing: {} (private={})",
            index + 1,
            total,
            item.repository.name,
            item.repository.private
        );
        if index > 0 {
            services.sleeper.sleep(settings.request_delay);
        }

        let mirrored = provision(&provisioner, item, options.dry_run, services.sleeper, settings)
            && transfer(&engine, item, options.dry_run);
        if mirrored {
            result.succeeded += 1;
        } else {
            result.failed += 1;
        }
    }

    info!(
        "Mirroring complete: {} successful, {} failed",
        result.succeeded, result.failed
    );
    Ok(result)
}

/// Carry out the reconciler's decision. `false` means the repository must
/// not be transferred.
fn provision(
    provisioner: &Provisioner<'_>,
    item: &PlannedRepository,
    dry_run: bool,
    sleeper: &dyn Sleeper,
    settings: &RunSettings,
) -> bool {
    let repo = &item.repository;
    match item.action {
        Action::Create if dry_run => {
            info!(
                "[dry-run] Would create {} on mirror (private={})",
                repo.name, repo.private
            );
        }
        Action::Create => {
            info!(repo = %repo.name, "Creating {} on mirror", repo.name);
            let created =
                provisioner.create(&repo.name.0, repo.private, repo.description.as_deref());
            if let Err(err) = created {
                error!(repo = %repo.name, error = %err, "Failed to create repository on mirror");
                return false;
            }
            sleeper.sleep(settings.request_delay);
        }
        Action::UpdateVisibility => {
            provisioner.update_visibility(&repo.name.0, repo.private);
            sleeper.sleep(settings.request_delay);
        }
        Action::Skip(SkipReason::DryRun) => {
            debug!(repo = %repo.name, "exists on mirror, visibility left unchanged in dry run");
        }
        Action::Skip(SkipReason::ExistsOnMirror) => {
            debug!(repo = %repo.name, "exists on mirror, skipped");
        }
    }
    true
}

fn transfer(engine: &TransferEngine<'_>, item: &PlannedRepository, dry_run: bool) -> bool {
    let repo = &item.repository;
    match engine.transfer(repo, dry_run) {
        Ok(TransferOutcome::Pushed { refs, excluded }) => {
            info!(repo = %repo.name, refs, excluded, "Mirrored {}", repo.name);
            true
        }
        Ok(_) => true,
        Err(err) => {
            error!(repo = %repo.name, error = %err, "Failed to mirror {}", repo.name);
            false
        }
    }
}

/// Log who the source token authenticates as and what it can see. Never
/// fails the run.
fn report_diagnostics(source: &dyn SourceHost, organization: &str) {
    match source.check_token() {
        Ok(report) if report.is_valid() => {
            info!(
                login = report.login.as_deref().unwrap_or_default(),
                scopes = report.scopes.as_deref().unwrap_or(""),
                rate_limit_remaining = report.rate_limit_remaining.as_deref().unwrap_or("unknown"),
                "Source token authenticated"
            );
        }
        Ok(report) => {
            warn!(status = report.status, "Source token validation failed");
        }
        Err(err) => warn!(error = %err, "Could not check source token"),
    }

    match source.org_summary(organization) {
        Ok(summary) => {
            info!(
                organization = %summary.login,
                public_repos = summary.public_repos,
                total_private_repos = ?summary.total_private_repos,
                owned_private_repos = ?summary.owned_private_repos,
                "Source organization visible"
            );
            if summary.total_private_repos.is_none() {
                warn!("Private repository counts are hidden; the token may lack organization admin access");
            }
        }
        Err(err) => warn!(organization, error = %err, "Could not read source organization"),
    }
}
