//! orgmirror-sync: moves repositories from the source organization to the
//! mirror.
//!
//! - [`inventory`]: complete listings of both organizations
//! - [`provision`]: create mirror repositories and fix their visibility
//! - [`git`] / [`remote`]: the git subprocess and authenticated URLs
//! - [`transfer`]: clone, update and force-push one repository
//! - [`pipeline`]: the whole run

pub mod error;
pub mod git;
pub mod inventory;
pub mod pipeline;
pub mod provision;
pub mod remote;
pub mod transfer;

pub use error::{SyncError, TransferError};
pub use git::{git_available, CommandGit, GitOutput, GitRunner};
pub use inventory::{fetch_mirror_inventory, fetch_source_inventory};
pub use pipeline::{run, RunOptions, RunResult, RunSettings, Services};
pub use provision::{Provisioner, VisibilityOutcome};
pub use remote::Remotes;
pub use transfer::{
    classify_push, partition_refs, PushOutcome, RefPartition, TransferEngine, TransferOutcome,
};
