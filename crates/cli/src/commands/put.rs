//! put command - Upload a file

use std::path::PathBuf;

use clap::Args;
use s3kit_core::{ObjectPath, Transfer, TransferOptions};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Upload a file
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local file
    pub local: PathBuf,

    /// Destination URI; a trailing `/` keeps the local file name
    pub uri: String,

    /// Only show what would be uploaded
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct PutOutput {
    status: &'static str,
    source: String,
    target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_human: Option<String>,
}

/// Execute the put command
pub async fn execute(args: PutArgs, profile: Option<&str>, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    if let Err(e) = ObjectPath::parse(&args.uri) {
        return super::fail(&formatter, "Invalid target", &e);
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

    let source = args.local.display().to_string();
    match transfer.upload_file(&args.local, &args.uri).await {
        Ok(info) => {
            if formatter.is_json() {
                formatter.json(&PutOutput {
                    status: if info.is_some() { "success" } else { "dry-run" },
                    source,
                    target: args.uri,
                    size_bytes: info.as_ref().map(|i| i.size_bytes),
                    size_human: info.map(|i| i.size_human),
                });
            } else {
                match info {
                    Some(info) => formatter.println(&format!(
                        "{source} -> {} ({})",
                        args.uri, info.size_human
                    )),
                    None => formatter.println(&format!("Would upload: {source} -> {}", args.uri)),
                }
            }
            ExitCode::Success
        }
        Err(e) => super::fail(&formatter, &format!("Failed to upload {source}"), &e),
    }
}
