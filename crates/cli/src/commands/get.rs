//! get command - Download objects
//!
//! A single URI is saved under the final segment of its key. Several URIs are
//! saved side by side in the target directory; repeated names get a numeric
//! prefix (`1_name`, `2_name`, ...) from a counter shared by the whole batch.

use std::path::{Path, PathBuf};

use clap::Args;
use s3kit_core::{resolve_batch_names, Transfer, TransferOptions};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar};

/// Download one or more objects into a directory
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Object URIs (s3://bucket/key)
    #[arg(required = true)]
    pub uris: Vec<String>,

    /// Directory to download into
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Only show what would be downloaded
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct DownloadedFile {
    uri: String,
    local_path: String,
}

#[derive(Debug, Serialize)]
struct GetOutput {
    dry_run: bool,
    files: Vec<DownloadedFile>,
}

/// Execute the get command
pub async fn execute(args: GetArgs, profile: Option<&str>, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    // Validate every URI before connecting
    let names = match resolve_batch_names(&args.uris) {
        Ok(names) => names,
        Err(e) => return super::fail(&formatter, "Invalid source", &e),
    };

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

    let progress = ProgressBar::new(formatter.config(), names.len() as u64);
    let mut files = Vec::with_capacity(names.len());

    for name in &names {
        progress.set_message(&name.local_name);
        let result = if names.len() == 1 {
            transfer.download_file(&name.uri, &args.dir).await
        } else {
            transfer
                .download_file_as(&name.uri, &args.dir, &name.local_name)
                .await
        };

        match result {
            Ok(local) => {
                progress.inc();
                report(&formatter, &name.uri, &local, args.dry_run);
                files.push(DownloadedFile {
                    uri: name.uri.clone(),
                    local_path: local.display().to_string(),
                });
            }
            Err(e) => {
                progress.finish_and_clear();
                return super::fail(&formatter, &format!("Failed to download {}", name.uri), &e);
            }
        }
    }
    progress.finish_and_clear();

    if formatter.is_json() {
        formatter.json(&GetOutput {
            dry_run: args.dry_run,
            files,
        });
    } else if !args.dry_run && files.len() > 1 {
        formatter.success(&format!("Downloaded {} file(s).", files.len()));
    }
    ExitCode::Success
}

fn report(formatter: &Formatter, uri: &str, local: &Path, dry_run: bool) {
    if formatter.is_json() {
        return;
    }
    if dry_run {
        formatter.println(&format!("Would download: {uri} -> {}", local.display()));
    } else {
        formatter.println(&format!("{uri} -> {}", local.display()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: GetArgs,
    }

    #[test]
    fn test_get_args_default_dir() {
        let cli = TestCli::try_parse_from(["get", "s3://bkt/a.txt", "s3://bkt/b.txt"]).unwrap();
        assert_eq!(cli.args.uris.len(), 2);
        assert_eq!(cli.args.dir, PathBuf::from("."));
        assert!(!cli.args.dry_run);
    }

    #[test]
    fn test_get_args_requires_uri() {
        assert!(TestCli::try_parse_from(["get", "--dir", "/tmp"]).is_err());
    }

    #[tokio::test]
    async fn test_get_malformed_uri_fails_before_connecting() {
        let args = GetArgs {
            uris: vec!["s3://onlybucket".into()],
            dir: PathBuf::from("."),
            dry_run: true,
        };
        let config = OutputConfig {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(execute(args, None, config).await, ExitCode::UsageError);
    }
}
