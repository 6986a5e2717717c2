//! orgmirror: mirror every repository of a GitHub organization to a
//! Gitea-compatible host such as Codeberg.
//!
//! # Usage
//!
//! ```text
//! orgmirror [--config PATH] [--dry-run] [--repo NAME] [--debug] [--check-token] [--skip-existing]
//! ```

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use commands::mirror::MirrorArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "orgmirror",
    version,
    about = "Mirror a GitHub organization's repositories to Codeberg",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    mirror: MirrorArgs,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.mirror.debug);
    cli.mirror.run()
}

/// Log to stderr. `RUST_LOG` takes precedence over `--debug`.
fn init_tracing(debug: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
