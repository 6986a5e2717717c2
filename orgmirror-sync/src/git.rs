//! The git subprocess boundary.
//!
//! Callers hand over an argument vector and an optional working directory and
//! get back the exit status with both captured streams. Nothing here parses
//! git output.

use std::io;
use std::path::Path;
use std::process::Command;

use tracing::debug;

/// Captured result of one git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub success: bool,
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

pub trait GitRunner {
    /// Run `git <args>` in `cwd` (or the current directory) and wait for it.
    ///
    /// `Err` means the process could not be started at all; a non-zero exit
    /// is reported through [`GitOutput::success`].
    fn run(&self, args: &[&str], cwd: Option<&Path>) -> io::Result<GitOutput>;
}

/// Runs the `git` binary found on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandGit;

impl GitRunner for CommandGit {
    fn run(&self, args: &[&str], cwd: Option<&Path>) -> io::Result<GitOutput> {
        let mut command = Command::new("git");
        command.args(args);
        // Never block on a credential prompt.
        command.env("GIT_TERMINAL_PROMPT", "0");
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output()?;
        debug!(
            subcommand = args.first().copied().unwrap_or_default(),
            code = ?output.status.code(),
            "git finished"
        );
        Ok(GitOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Whether a `git` binary can be started.
pub fn git_available() -> bool {
    CommandGit
        .run(&["--version"], None)
        .map(|out| out.success)
        .unwrap_or(false)
}
