//! CLI command definitions and execution
//!
//! Each subcommand lives in its own module with an `Args` struct and an
//! `execute` function returning an [`ExitCode`].

use std::future::Future;

use clap::{Parser, Subcommand};
use s3kit_core::{Error, ProfileManager};
use s3kit_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod basename;
mod get;
mod get_dir;
mod profile;
mod put;
mod put_dir;
mod resolve;
mod rm;
mod workdir;

/// s3kit - S3 transfer helpers
///
/// Downloads and uploads objects with predictable local names, and manages
/// scratch working directories for batch jobs.
#[derive(Parser, Debug)]
#[command(name = "s3kit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    /// Profile to connect with (defaults to the configured default, then the AWS environment)
    #[arg(long, global = true, env = "S3KIT_PROFILE")]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the local file names a batch of URIs would download to
    Resolve(resolve::ResolveArgs),

    /// Print the final path segment, optionally stripping an extension
    Basename(basename::BasenameArgs),

    /// Download one or more objects into a directory
    Get(get::GetArgs),

    /// Download every object under a prefix, optionally filtered
    GetDir(get_dir::GetDirArgs),

    /// Upload a file
    Put(put::PutArgs),

    /// Upload a directory recursively
    PutDir(put_dir::PutDirArgs),

    /// Remove named objects under a prefix
    Rm(rm::RmArgs),

    /// Create or delete scratch working directories
    #[command(subcommand)]
    Workdir(workdir::WorkdirCommands),

    /// Manage connection profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Resolve(args) => resolve::execute(args, output_config),
        Commands::Basename(args) => basename::execute(args, output_config),
        Commands::Get(args) => get::execute(args, profile, output_config).await,
        Commands::GetDir(args) => get_dir::execute(args, profile, output_config).await,
        Commands::Put(args) => put::execute(args, profile, output_config).await,
        Commands::PutDir(args) => put_dir::execute(args, profile, output_config).await,
        Commands::Rm(args) => rm::execute(args, profile, output_config).await,
        Commands::Workdir(cmd) => workdir::execute(cmd, output_config),
        Commands::Profile(cmd) => profile::execute(cmd, output_config),
    }
}

/// Execute the CLI command, stopping early on Ctrl+C
///
/// An interrupted run exits with [`ExitCode::Interrupted`]. Dropping the
/// in-flight transfer removes any partially written download.
pub async fn run(cli: Cli) -> ExitCode {
    until_interrupted(execute(cli), interrupt_signal()).await
}

async fn until_interrupted<W, S>(work: W, signal: S) -> ExitCode
where
    W: Future<Output = ExitCode>,
    S: Future<Output = ()>,
{
    tokio::select! {
        code = work => code,
        () = signal => {
            tracing::warn!("interrupted");
            ExitCode::Interrupted
        }
    }
}

/// Resolves on Ctrl+C; never resolves if the handler can't be installed
async fn interrupt_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

/// Build an S3 client for the selected profile
async fn connect(profile: Option<&str>, formatter: &Formatter) -> Result<S3Client, ExitCode> {
    let resolved = ProfileManager::new()
        .and_then(|manager| manager.resolve(profile))
        .map_err(|e| fail(formatter, "Failed to load profile", &e))?;

    S3Client::new(&resolved)
        .await
        .map_err(|e| fail(formatter, "Failed to create S3 client", &e))
}

/// Report an error and map it to an exit code
fn fail(formatter: &Formatter, context: &str, error: &Error) -> ExitCode {
    formatter.error(&format!("{context}: {error}"));
    ExitCode::from_error(error)
}
