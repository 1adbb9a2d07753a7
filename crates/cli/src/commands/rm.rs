//! rm command - Remove named objects under a prefix

use clap::Args;
use s3kit_core::{ObjectPath, Transfer, TransferOptions};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Remove named objects under a prefix
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Prefix URI the file names are relative to
    pub uri: String,

    /// Object names to remove
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Only show what would be deleted
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    status: &'static str,
    deleted: Vec<String>,
    total: usize,
}

/// Execute the rm command
pub async fn execute(args: RmArgs, profile: Option<&str>, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    if let Err(e) = ObjectPath::parse(&args.uri) {
        return super::fail(&formatter, "Invalid path", &e);
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

    match transfer.rm_files(&args.uri, &args.files).await {
        Ok(deleted) => {
            if formatter.is_json() {
                formatter.json(&RmOutput {
                    status: if args.dry_run { "dry-run" } else { "success" },
                    total: deleted.len(),
                    deleted,
                });
            } else if args.dry_run {
                for uri in &deleted {
                    formatter.println(&format!("Would remove: {uri}"));
                }
            } else {
                for uri in &deleted {
                    formatter.println(&format!("Removed: {uri}"));
                }
                formatter.success(&format!("Removed {} object(s).", deleted.len()));
            }
            ExitCode::Success
        }
        Err(e) => super::fail(&formatter, "Failed to remove objects", &e),
    }
}
