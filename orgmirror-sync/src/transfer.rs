//! Replicates one repository's branches and tags onto the mirror.
//!
//! Per repository: clone (or update) a bare mirror under the work directory,
//! enumerate its refs, then force-push heads and tags. A push that cannot
//! reach the mirror restarts the whole sequence under the retry policy; any
//! other failure ends the repository's transfer for this run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use orgmirror_core::{RepositoryDescriptor, RetryPolicy, Sleeper};
use tracing::{debug, info, warn};

use crate::error::{transfer_io_err, TransferError};
use crate::git::{GitOutput, GitRunner};
use crate::remote::Remotes;

/// Refs the source host synthesises for pull requests. Never pushed.
pub const PULL_REQUEST_REF_PREFIX: &str = "refs/pull/";

/// Branches and tags, mapped one-to-one.
pub const PUSH_REFSPECS: [&str; 2] = ["refs/heads/*:refs/heads/*", "refs/tags/*:refs/tags/*"];

const UP_TO_DATE: &str = "Everything up-to-date";
const CONNECTIVITY_MARKERS: [&str; 2] = ["Could not connect", "Connection refused"];
/// Repository names are limited to `[A-Za-z0-9._-]`, so no clone can collide
/// with a staging directory.
const STAGING_SUFFIX: &str = "~partial";

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Local refs split by whether they are pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefPartition {
    pub to_push: Vec<String>,
    pub excluded: Vec<String>,
}

/// Split `for-each-ref --format=%(refname)` output. Blank lines are ignored.
pub fn partition_refs(listing: &str) -> RefPartition {
    let mut partition = RefPartition::default();
    for line in listing.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with(PULL_REQUEST_REF_PREFIX) {
            partition.excluded.push(line.to_string());
        } else {
            partition.to_push.push(line.to_string());
        }
    }
    partition
}

/// How a finished `git push` should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed,
    /// Non-zero exit, but the mirror already had everything.
    UpToDate,
    /// The mirror could not be reached.
    Retryable,
    Rejected,
}

pub fn classify_push(success: bool, stderr: &str) -> PushOutcome {
    if success {
        PushOutcome::Pushed
    } else if stderr.contains(UP_TO_DATE) {
        PushOutcome::UpToDate
    } else if CONNECTIVITY_MARKERS.iter().any(|m| stderr.contains(m)) {
        PushOutcome::Retryable
    } else {
        PushOutcome::Rejected
    }
}

/// A bare clone has a `HEAD` file and an `objects/` directory at its root.
pub fn is_bare_repository(path: &Path) -> bool {
    path.join("HEAD").is_file() && path.join("objects").is_dir()
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Successful end states of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    Pushed { refs: usize, excluded: usize },
    UpToDate,
    /// The clone holds no pushable refs; nothing was sent.
    NothingToPush,
    DryRun,
}

pub struct TransferEngine<'a> {
    git: &'a dyn GitRunner,
    sleeper: &'a dyn Sleeper,
    work_dir: PathBuf,
    policy: RetryPolicy,
    remotes: &'a Remotes,
}

impl<'a> TransferEngine<'a> {
    pub fn new(
        git: &'a dyn GitRunner,
        sleeper: &'a dyn Sleeper,
        work_dir: impl Into<PathBuf>,
        policy: RetryPolicy,
        remotes: &'a Remotes,
    ) -> Self {
        Self {
            git,
            sleeper,
            work_dir: work_dir.into(),
            policy,
            remotes,
        }
    }

    /// Local bare clone for `name`.
    pub fn clone_dir(&self, name: &str) -> PathBuf {
        self.work_dir.join(name)
    }

    pub fn transfer(
        &self,
        repo: &RepositoryDescriptor,
        dry_run: bool,
    ) -> Result<TransferOutcome, TransferError> {
        if dry_run {
            info!(
                "[dry-run] Would mirror {} (private={})",
                repo.name, repo.private
            );
            return Ok(TransferOutcome::DryRun);
        }

        let label = format!("mirror {}", repo.name);
        self.policy
            .run_retryable(self.sleeper, &label, |_| self.attempt(repo))
    }

    /// One clone-or-update, enumerate, push pass.
    fn attempt(&self, repo: &RepositoryDescriptor) -> Result<TransferOutcome, TransferError> {
        let name = repo.name.0.as_str();
        let dir = self.clone_dir(name);
        self.prepare_clone(repo, &dir)?;

        info!(repo = %name, "Pushing {} to mirror", name);
        let listing = self.git_in(&["for-each-ref", "--format=%(refname)"], &dir)?;
        if !listing.success {
            return Err(TransferError::ListRefs(self.stderr_of(&listing)));
        }

        let refs = partition_refs(&listing.stdout);
        debug!(
            repo = %name,
            "Pushing {} refs (excluded {} pull request refs)",
            refs.to_push.len(),
            refs.excluded.len()
        );
        if refs.to_push.is_empty() {
            info!("{}: No refs to push", name);
            return Ok(TransferOutcome::NothingToPush);
        }

        let url = self.remotes.mirror_url(name)?;
        let mut args = vec!["push", "--force", url.as_str()];
        args.extend(PUSH_REFSPECS);
        let push = self.git_in(&args, &dir)?;

        match classify_push(push.success, &push.stderr) {
            PushOutcome::Pushed => {
                if !push.stderr.trim().is_empty() {
                    debug!(repo = %name, "Push output: {}", self.stderr_of(&push));
                }
                Ok(TransferOutcome::Pushed {
                    refs: refs.to_push.len(),
                    excluded: refs.excluded.len(),
                })
            }
            PushOutcome::UpToDate => {
                info!("{}: Already up-to-date", name);
                Ok(TransferOutcome::UpToDate)
            }
            PushOutcome::Retryable => Err(TransferError::Connectivity(self.stderr_of(&push))),
            PushOutcome::Rejected => Err(TransferError::PushRejected(self.stderr_of(&push))),
        }
    }

    /// Make sure `dir` holds an up-to-date bare clone of `repo`.
    fn prepare_clone(&self, repo: &RepositoryDescriptor, dir: &Path) -> Result<(), TransferError> {
        if dir.exists() {
            if is_bare_repository(dir) {
                info!(repo = %repo.name, "Updating mirror for {}", repo.name);
                let update = self.git_in(&["remote", "update", "--prune"], dir)?;
                if !update.success {
                    warn!(repo = %repo.name, "Remote update failed: {}", self.stderr_of(&update));
                }
                return Ok(());
            }
            warn!(
                repo = %repo.name,
                path = %dir.display(),
                "existing clone is not a bare repository, re-cloning"
            );
            fs::remove_dir_all(dir).map_err(|e| transfer_io_err(dir, e))?;
        }
        self.clone_fresh(repo, dir)
    }

    /// Clone into a staging directory and move it into place, so a failed
    /// clone never leaves `dir` behind.
    fn clone_fresh(&self, repo: &RepositoryDescriptor, dir: &Path) -> Result<(), TransferError> {
        info!(repo = %repo.name, "Cloning {} as bare mirror", repo.name);
        let staging = staging_path(dir);
        remove_if_present(&staging)?;

        let url = self.remotes.source_url(&repo.clone_url)?;
        let staging_arg = staging.to_string_lossy().into_owned();
        let clone = self
            .git
            .run(
                &["clone", "--bare", "--mirror", url.as_str(), staging_arg.as_str()],
                None,
            )
            .map_err(|e| transfer_io_err(&staging, e))?;

        if !clone.success {
            remove_if_present(&staging)?;
            return Err(TransferError::Clone(self.stderr_of(&clone)));
        }
        fs::rename(&staging, dir).map_err(|e| transfer_io_err(dir, e))
    }

    fn git_in(&self, args: &[&str], dir: &Path) -> Result<GitOutput, TransferError> {
        self.git
            .run(args, Some(dir))
            .map_err(|e| transfer_io_err(dir, e))
    }

    fn stderr_of(&self, output: &GitOutput) -> String {
        self.remotes.redact(output.stderr.trim())
    }
}

fn staging_path(dir: &Path) -> PathBuf {
    let mut name = dir.file_name().unwrap_or_default().to_os_string();
    name.push(STAGING_SUFFIX);
    dir.with_file_name(name)
}

fn remove_if_present(path: &Path) -> Result<(), TransferError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(transfer_io_err(path, e)),
    }
}
