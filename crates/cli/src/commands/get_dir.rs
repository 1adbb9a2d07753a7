//! get-dir command - Download a prefix
//!
//! Downloads every object under a prefix, keeping paths relative to it. With
//! `--include`, only matching keys are fetched; `--exclude` narrows the set of
//! keys the include pattern has to rescue (it defaults to `*`).

use std::path::PathBuf;

use clap::Args;
use s3kit_core::{KeyFilter, ObjectPath, Transfer, TransferOptions};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Download every object under a prefix, optionally filtered
#[derive(Args, Debug)]
pub struct GetDirArgs {
    /// Prefix URI (s3://bucket/prefix)
    pub uri: String,

    /// Directory to download into
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Glob pattern of keys (relative to the prefix) to download
    #[arg(long)]
    pub include: Option<String>,

    /// Glob pattern of keys to skip unless they match --include
    #[arg(long, requires = "include")]
    pub exclude: Option<String>,

    /// Only show what would be downloaded
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct GetDirOutput {
    status: &'static str,
    source: String,
    dir: String,
    dry_run: bool,
}

/// Execute the get-dir command
pub async fn execute(
    args: GetDirArgs,
    profile: Option<&str>,
    output_config: OutputConfig,
) -> ExitCode {
    let formatter = Formatter::new(output_config);

    if let Err(e) = ObjectPath::parse(&args.uri) {
        return super::fail(&formatter, "Invalid source", &e);
    }
    if let Some(include) = &args.include {
        if let Err(e) = KeyFilter::new(include, args.exclude.as_deref()) {
            return super::fail(&formatter, "Invalid filter", &e);
        }
    }

    let client = match super::connect(profile, &formatter).await {
        Ok(c) => c,
        Err(code) => return code,
    };
    let transfer = Transfer::new(
        &client,
        TransferOptions {
            dry_run: args.dry_run,
        },
    );

    let result = match &args.include {
        Some(include) => {
            transfer
                .download_pattern(&args.uri, &args.dir, include, args.exclude.as_deref())
                .await
        }
        None => transfer.download_folder(&args.uri, &args.dir).await,
    };

    match result {
        Ok(dir) => {
            if formatter.is_json() {
                formatter.json(&GetDirOutput {
                    status: "success",
                    source: args.uri,
                    dir: dir.display().to_string(),
                    dry_run: args.dry_run,
                });
            } else if args.dry_run {
                formatter.println(&format!(
                    "Would download: {} -> {}",
                    args.uri,
                    dir.display()
                ));
            } else {
                formatter.success(&format!("Downloaded {} -> {}", args.uri, dir.display()));
            }
            ExitCode::Success
        }
        Err(e) => super::fail(&formatter, &format!("Failed to download {}", args.uri), &e),
    }
}
