//! basename command - Final path segment of a path or URI

use clap::Args;
use s3kit_core::base_name;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Print the final path segment, optionally stripping an extension
#[derive(Args, Debug)]
pub struct BasenameArgs {
    /// Path or object URI
    pub path: String,

    /// Extension to strip; the first listed one that matches is removed
    #[arg(short = 'x', long = "extension")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct BasenameOutput {
    path: String,
    name: String,
}

/// Execute the basename command
pub fn execute(args: BasenameArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let name = base_name(&args.path, &args.extensions);

    if formatter.is_json() {
        formatter.json(&BasenameOutput {
            path: args.path,
            name,
        });
    } else {
        formatter.println(&name);
    }
    ExitCode::Success
}
