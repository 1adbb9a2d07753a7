//! resolve command - Show local names for a batch download
//!
//! Prints the file name each URI would be written to by `get`, including the
//! numeric prefixes given to colliding names.

use clap::Args;
use s3kit_core::{resolve_batch_names, ResolvedName};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Show the local file names a batch of URIs would download to
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Object URIs (s3://bucket/key)
    #[arg(required = true)]
    pub uris: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ResolveOutput {
    names: Vec<ResolvedName>,
}

/// Execute the resolve command
pub fn execute(args: ResolveArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let names = match resolve_batch_names(&args.uris) {
        Ok(names) => names,
        Err(e) => return super::fail(&formatter, "Cannot resolve names", &e),
    };

    if formatter.is_json() {
        formatter.json(&ResolveOutput { names });
    } else {
        let width = names.iter().map(|n| n.uri.len()).max().unwrap_or(0);
        for name in &names {
            formatter.println(&format!("{:<width$}  {}", name.uri, name.local_name));
        }
    }
    ExitCode::Success
}
