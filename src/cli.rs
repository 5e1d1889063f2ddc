//! Command-line interface: argument parsing and command execution.

use crate::config::MergeConfig;
use crate::error::MergeError;
use crate::merge::{MergeOutcome, MergeRequest, Merger};
use crate::staleness;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "xmlfuse",
    about = "Incremental XML include merge engine",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Shortcut for --log-level debug
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format: text or json
    #[arg(long, global = true)]
    pub log_format: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge a source document into a destination, expanding imports
    Merge {
        source: PathBuf,
        destination: PathBuf,

        /// Directory import paths resolve against (default: the source's
        /// containing directory)
        #[arg(long)]
        base_dir: Option<PathBuf>,

        /// Merge even when the destination looks up to date
        #[arg(long)]
        force: bool,
    },
    /// Report whether a destination is stale, without merging
    Check {
        source: PathBuf,
        destination: PathBuf,

        #[arg(long)]
        base_dir: Option<PathBuf>,
    },
}

/// Exit code the `check` subcommand uses to signal a stale destination.
pub const EXIT_STALE: i32 = 1;

/// Execute a parsed command. Returns the text to print and the process
/// exit code.
pub fn execute(command: &Command, config: &MergeConfig) -> Result<(String, i32), MergeError> {
    match command {
        Command::Merge {
            source,
            destination,
            base_dir,
            force,
        } => {
            let request = build_request(source, destination, base_dir.as_deref());
            let merger = Merger::with_config(request, config.clone());
            let outcome = if *force {
                merger.rebuild()?
            } else {
                merger.process()?
            };
            let message = match outcome {
                MergeOutcome::UpToDate => format!("{} is up to date", destination.display()),
                MergeOutcome::Merged { imported_files } => format!(
                    "merged {} into {} ({} imported files)",
                    source.display(),
                    destination.display(),
                    imported_files
                ),
            };
            Ok((message, 0))
        }
        Command::Check {
            source,
            destination,
            base_dir,
        } => {
            let request = build_request(source, destination, base_dir.as_deref());
            if !request.source().exists() {
                return Err(MergeError::MissingSource(request.source().to_path_buf()));
            }
            if staleness::is_stale(&request, config)? {
                Ok((format!("{} is stale", destination.display()), EXIT_STALE))
            } else {
                Ok((format!("{} is up to date", destination.display()), 0))
            }
        }
    }
}

fn build_request(source: &Path, destination: &Path, base_dir: Option<&Path>) -> MergeRequest {
    match base_dir {
        Some(base) => MergeRequest::with_base_dir(source, destination, base),
        None => MergeRequest::new(source, destination),
    }
}
