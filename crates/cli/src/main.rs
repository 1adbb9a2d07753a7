//! s3kit - S3 transfer helpers
//!
//! Downloads and uploads objects with predictable local names and manages
//! scratch working directories for batch jobs.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use s3kit::commands::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; --debug only changes the fallback level
    let fallback = if cli.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::run(cli).await;

    std::process::exit(exit_code.as_i32());
}
