//! Complete repository listings for both sides of the mirror.

use std::time::Duration;

use orgmirror_core::{
    pagination::collect_pages, InventorySummary, MirrorInventory, RepositoryDescriptor,
    RetryPolicy, Sleeper,
};
use orgmirror_forge::{ForgeError, MirrorHost, SourceHost};
use tracing::{debug, info};

/// Page size requested from the source host.
pub const SOURCE_PAGE_SIZE: usize = 100;

/// Page size requested from the mirror host.
pub const MIRROR_PAGE_SIZE: usize = 50;

/// Every repository in the source organization, in listing order.
///
/// Not retried: the first failed page fails the whole listing.
pub fn fetch_source_inventory(
    host: &dyn SourceHost,
    organization: &str,
) -> Result<Vec<RepositoryDescriptor>, ForgeError> {
    info!(organization, "fetching source repositories");
    let repos = collect_pages(
        SOURCE_PAGE_SIZE,
        |page| host.list_repository_page(organization, page, SOURCE_PAGE_SIZE),
        || {},
    )?;

    let summary = InventorySummary::of(&repos);
    info!(
        "Found {} repos: {} public, {} private",
        summary.total, summary.public, summary.private
    );
    for repo in &repos {
        debug!(repo = %repo.name, visibility = %repo.visibility(), "source repository");
    }
    Ok(repos)
}

/// Names of every repository in the mirror organization.
///
/// Sleeps `page_delay` between pages. Connection failures restart the
/// listing from the first page under `policy`.
pub fn fetch_mirror_inventory(
    host: &dyn MirrorHost,
    organization: &str,
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    page_delay: Duration,
) -> Result<MirrorInventory, ForgeError> {
    info!(organization, "fetching mirror repositories");
    let names = policy.run_retryable(sleeper, "list mirror repositories", |_| {
        collect_pages(
            MIRROR_PAGE_SIZE,
            |page| host.list_repository_page(organization, page, MIRROR_PAGE_SIZE),
            || sleeper.sleep(page_delay),
        )
    })?;

    let inventory: MirrorInventory = names.into_iter().collect();
    info!("Found {} existing repos on mirror", inventory.len());
    Ok(inventory)
}
