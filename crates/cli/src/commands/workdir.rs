//! workdir commands - Scratch working directories

use std::path::PathBuf;

use clap::Subcommand;
use s3kit_core::{delete_working_dir, generate_working_dir};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Working directory subcommands
#[derive(Subcommand, Debug)]
pub enum WorkdirCommands {
    /// Create a uniquely named directory under BASE and print its path
    Create {
        /// Base scratch directory (e.g. /scratch)
        base: PathBuf,
    },

    /// Delete a working directory and its contents
    Delete {
        /// Directory to delete
        dir: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct WorkdirOutput {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted: Option<bool>,
}

/// Execute a workdir subcommand
pub fn execute(cmd: WorkdirCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    match cmd {
        WorkdirCommands::Create { base } => {
            let dir = generate_working_dir(&base);
            if dir == base {
                formatter.warning(&format!(
                    "Could not create a subdirectory of {}; using it directly",
                    base.display()
                ));
            }
            emit(&formatter, dir.display().to_string(), None);
            ExitCode::Success
        }
        WorkdirCommands::Delete { dir } => {
            let deleted = delete_working_dir(&dir);
            if !deleted {
                formatter.warning(&format!("Can't delete {}", dir.display()));
            }
            emit(&formatter, dir.display().to_string(), Some(deleted));
            ExitCode::Success
        }
    }
}

fn emit(formatter: &Formatter, path: String, deleted: Option<bool>) {
    if formatter.is_json() {
        formatter.json(&WorkdirOutput { path, deleted });
    } else if deleted.is_none() {
        formatter.println(&path);
    } else if deleted == Some(true) {
        formatter.success(&format!("Deleted {path}"));
    }
}
