//! The mirror run behind the `orgmirror` flags.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use orgmirror_core::{config, ThreadSleeper};
use orgmirror_forge::{GitHubClient, GiteaClient};
use orgmirror_sync::{pipeline, CommandGit, Remotes, RunOptions, RunSettings, Services};

#[derive(Args, Debug)]
pub struct MirrorArgs {
    /// Config file [default: ~/.config/orgmirror/config.yaml].
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report what would happen without creating, updating or pushing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Mirror only this repository.
    #[arg(long, value_name = "NAME")]
    pub repo: Option<String>,

    /// Verbose logging.
    #[arg(long)]
    pub debug: bool,

    /// Check the source token and organization access, then exit.
    #[arg(long)]
    pub check_token: bool,

    /// Leave repositories that already exist on the mirror untouched.
    #[arg(long)]
    pub skip_existing: bool,
}

impl MirrorArgs {
    pub fn run(self) -> Result<ExitCode> {
        let path = match self.config.clone() {
            Some(path) => path,
            None => config::default_path().context("could not locate the default config file")?,
        };
        let config = config::load(&path)?;

        let source = GitHubClient::new(config.source.api_url.clone(), config.source.token.clone());
        let mirror = GiteaClient::new(config.mirror.api_url.clone(), config.mirror.token.clone());
        let remotes = Remotes::from_config(&config);
        let services = Services {
            source: &source,
            mirror: &mirror,
            git: &CommandGit,
            sleeper: &ThreadSleeper,
            remotes: &remotes,
        };

        let options = RunOptions {
            dry_run: self.dry_run,
            skip_existing: self.skip_existing,
            check_token_only: self.check_token,
            repository: self.repo,
        };
        let result = pipeline::run(&services, &RunSettings::from_config(&config), &options)
            .context("mirror run aborted")?;

        Ok(ExitCode::from(result.exit_code()))
    }
}
