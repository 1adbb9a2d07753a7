//! put-dir command - Upload a directory recursively
//!
//! Every file below the local directory is uploaded under the destination
//! key, keeping its relative path.

use std::path::PathBuf;

use clap::Args;
use s3kit_core::{ObjectPath, Transfer, TransferOptions};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Upload a directory recursively
#[derive(Args, Debug)]
pub struct PutDirArgs {
    /// Local directory
    pub local_dir: PathBuf,

    /// Destination prefix URI
    pub uri: String,

    /// Only show what would be uploaded
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct PutDirOutput {
    status: &'static str,
    source: String,
    target: String,
    files: usize,
}

/// Execute the put-dir command
pub async fn execute(
    args: PutDirArgs,
    profile: Option<&str>,
    output_config: OutputConfig,
) -> ExitCode {
    let formatter = Formatter::new(output_config);

    if let Err(e) = ObjectPath::parse(&args.uri) {
        return super::fail(&formatter, "Invalid target", &e);
    }
    if !args.local_dir.is_dir() {
        formatter.error(&format!(
            "Source is not a directory: {}",
            args.local_dir.display()
        ));
        return ExitCode::NotFound;
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

    let source = args.local_dir.display().to_string();
    match transfer.upload_folder(&args.uri, &args.local_dir).await {
        Ok(files) => {
            if formatter.is_json() {
                formatter.json(&PutDirOutput {
                    status: if args.dry_run { "dry-run" } else { "success" },
                    source,
                    target: args.uri,
                    files,
                });
            } else if args.dry_run {
                formatter.println(&format!(
                    "Would upload {files} file(s): {source} -> {}",
                    args.uri
                ));
            } else {
                formatter.success(&format!("Uploaded {files} file(s)."));
            }
            ExitCode::Success
        }
        Err(e) => super::fail(&formatter, &format!("Failed to upload {source}"), &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_local_dir_is_not_found() {
        let args = PutDirArgs {
            local_dir: PathBuf::from("/nonexistent/results"),
            uri: "s3://bkt/results/".into(),
            dry_run: true,
        };
        let config = OutputConfig {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(execute(args, None, config).await, ExitCode::NotFound);
    }
}
