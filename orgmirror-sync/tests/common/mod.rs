#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use orgmirror_core::{RepoName, RepositoryDescriptor, RetryPolicy, SecretString};
use orgmirror_forge::{
    CreateOutcome, CreateRepository, ForgeError, MirrorHost, OrgSummary, SourceHost, TokenReport,
    TransportKind,
};
use orgmirror_sync::{GitOutput, GitRunner, Remotes, RunSettings};

pub const SOURCE_TOKEN: &str = "ghp_sourcesecret";
pub const MIRROR_TOKEN: &str = "cb_mirrorsecret";
pub const DELAY: Duration = Duration::from_secs(1);
pub const BASE_DELAY: Duration = Duration::from_secs(5);

pub fn descriptor(name: &str, private: bool) -> RepositoryDescriptor {
    RepositoryDescriptor {
        name: RepoName::from(name),
        clone_url: format!("https://github.com/acme/{name}.git"),
        ssh_url: format!("git@github.com:acme/{name}.git"),
        private,
        description: Some(format!("{name} description")),
        default_branch: "main".into(),
    }
}

pub fn remotes() -> Remotes {
    Remotes {
        source_token: SecretString::new(SOURCE_TOKEN),
        mirror_token: SecretString::new(MIRROR_TOKEN),
        mirror_git_url: "https://codeberg.org".into(),
        mirror_organization: "acme-mirror".into(),
    }
}

pub fn settings(work_dir: &Path) -> RunSettings {
    RunSettings {
        source_organization: "acme".into(),
        mirror_organization: "acme-mirror".into(),
        work_dir: work_dir.to_path_buf(),
        request_delay: DELAY,
        retry: RetryPolicy::new(5, BASE_DELAY),
    }
}

pub fn connection_refused() -> ForgeError {
    ForgeError::Transport {
        url: "https://codeberg.org/api/v1".into(),
        kind: TransportKind::ConnectionFailed,
        message: "Connection refused".into(),
    }
}

pub fn status(code: u16) -> ForgeError {
    ForgeError::Status {
        url: "https://codeberg.org/api/v1".into(),
        status: code,
        body: String::new(),
    }
}

// ---------------------------------------------------------------------------
// Source host
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeSource {
    pub repos: Vec<RepositoryDescriptor>,
    pub listing_status: Option<u16>,
}

impl FakeSource {
    pub fn with(repos: Vec<RepositoryDescriptor>) -> Self {
        Self {
            repos,
            listing_status: None,
        }
    }
}

impl SourceHost for FakeSource {
    fn list_repository_page(
        &self,
        _organization: &str,
        page: u32,
        per_page: usize,
    ) -> Result<Vec<RepositoryDescriptor>, ForgeError> {
        if let Some(code) = self.listing_status {
            return Err(status(code));
        }
        Ok(self
            .repos
            .iter()
            .skip((page as usize - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect())
    }

    fn check_token(&self) -> Result<TokenReport, ForgeError> {
        Ok(TokenReport {
            status: 200,
            login: Some("mirror-bot".into()),
            scopes: Some("repo, read:org".into()),
            rate_limit_remaining: Some("4999".into()),
        })
    }

    fn org_summary(&self, organization: &str) -> Result<OrgSummary, ForgeError> {
        Ok(OrgSummary {
            login: organization.to_string(),
            public_repos: self.repos.iter().filter(|r| !r.private).count() as u64,
            total_private_repos: None,
            owned_private_repos: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Mirror host
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorCall {
    List { page: u32 },
    Create { name: String, private: bool },
    UpdateVisibility { name: String, private: bool },
}

/// In-memory mirror organization. Unscripted creates behave like the real
/// host: 201 the first time, 409 afterwards.
#[derive(Default)]
pub struct FakeMirror {
    pub existing: RefCell<HashSet<String>>,
    pub calls: RefCell<Vec<MirrorCall>>,
    pub create_script: RefCell<VecDeque<Result<CreateOutcome, ForgeError>>>,
    pub visibility_script: RefCell<VecDeque<Result<(), ForgeError>>>,
}

impl FakeMirror {
    pub fn with(existing: &[&str]) -> Self {
        let mirror = Self::default();
        mirror
            .existing
            .borrow_mut()
            .extend(existing.iter().map(|s| s.to_string()));
        mirror
    }

    pub fn script_create(&self, result: Result<CreateOutcome, ForgeError>) {
        self.create_script.borrow_mut().push_back(result);
    }

    pub fn script_visibility(&self, result: Result<(), ForgeError>) {
        self.visibility_script.borrow_mut().push_back(result);
    }

    pub fn calls(&self) -> Vec<MirrorCall> {
        self.calls.borrow().clone()
    }

    /// Calls other than listing, in order.
    pub fn mutations(&self) -> Vec<MirrorCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, MirrorCall::List { .. }))
            .collect()
    }
}

impl MirrorHost for FakeMirror {
    fn list_repository_page(
        &self,
        _organization: &str,
        page: u32,
        limit: usize,
    ) -> Result<Vec<RepoName>, ForgeError> {
        self.calls.borrow_mut().push(MirrorCall::List { page });
        let mut names: Vec<String> = self.existing.borrow().iter().cloned().collect();
        names.sort();
        Ok(names
            .into_iter()
            .skip((page as usize - 1) * limit)
            .take(limit)
            .map(RepoName::from)
            .collect())
    }

    fn create_repository(
        &self,
        _organization: &str,
        request: &CreateRepository,
    ) -> Result<CreateOutcome, ForgeError> {
        self.calls.borrow_mut().push(MirrorCall::Create {
            name: request.name.clone(),
            private: request.private,
        });
        if let Some(scripted) = self.create_script.borrow_mut().pop_front() {
            return scripted;
        }
        if self.existing.borrow_mut().insert(request.name.clone()) {
            Ok(CreateOutcome::Created)
        } else {
            Ok(CreateOutcome::AlreadyExists)
        }
    }

    fn update_visibility(
        &self,
        _organization: &str,
        name: &str,
        private: bool,
    ) -> Result<(), ForgeError> {
        self.calls.borrow_mut().push(MirrorCall::UpdateVisibility {
            name: name.to_string(),
            private,
        });
        self.visibility_script
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

// ---------------------------------------------------------------------------
// Git
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCall {
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl GitCall {
    pub fn subcommand(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }
}

pub const DEFAULT_REFS: &str = "refs/heads/main\nrefs/tags/v1.0\nrefs/pull/1/head\nrefs/pull/1/merge\n";

/// Stand-in for the git binary. Each subcommand answers from its script
/// queue, falling back to success. A successful clone lays down a minimal
/// bare repository at its target path.
#[derive(Default)]
pub struct ScriptedGit {
    pub calls: RefCell<Vec<GitCall>>,
    scripts: RefCell<HashMap<String, VecDeque<GitOutput>>>,
}

impl ScriptedGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, subcommand: &str, output: GitOutput) -> &Self {
        self.scripts
            .borrow_mut()
            .entry(subcommand.to_string())
            .or_default()
            .push_back(output);
        self
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, subcommand: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.subcommand() == subcommand)
            .count()
    }
}

impl GitRunner for ScriptedGit {
    fn run(&self, args: &[&str], cwd: Option<&Path>) -> io::Result<GitOutput> {
        let call = GitCall {
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.map(Path::to_path_buf),
        };
        let subcommand = call.subcommand().to_string();
        self.calls.borrow_mut().push(call);

        let scripted = self
            .scripts
            .borrow_mut()
            .get_mut(&subcommand)
            .and_then(VecDeque::pop_front);
        let output = scripted.unwrap_or_else(|| match subcommand.as_str() {
            "for-each-ref" => GitOutput::ok(DEFAULT_REFS),
            _ => GitOutput::ok(""),
        });

        if subcommand == "clone" && output.success {
            if let Some(target) = args.last() {
                let target = Path::new(target);
                fs::create_dir_all(target.join("objects"))?;
                fs::write(target.join("HEAD"), "ref: refs/heads/main\n")?;
            }
        }
        Ok(output)
    }
}
