//! Scratch working directories
//!
//! Several containers may share one scratch volume, so each run works in its
//! own uniquely named subdirectory.

use std::path::{Path, PathBuf};

/// Create a uniquely named subdirectory of `base`
///
/// If the subdirectory cannot be created, `base` itself is returned.
pub fn generate_working_dir(base: &Path) -> PathBuf {
    let working_dir = base.join(uuid::Uuid::new_v4().to_string());
    match std::fs::create_dir(&working_dir) {
        Ok(()) => {
            tracing::debug!(dir = %working_dir.display(), "created working directory");
            working_dir
        }
        Err(e) => {
            tracing::warn!(
                dir = %working_dir.display(),
                error = %e,
                "could not create working directory, using base"
            );
            base.to_path_buf()
        }
    }
}

/// Remove a working directory and everything in it
///
/// Failures are logged and otherwise ignored. Returns whether the directory
/// was removed.
pub fn delete_working_dir(dir: &Path) -> bool {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => {
            tracing::debug!(dir = %dir.display(), "deleted working directory");
            true
        }
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "can't delete working directory");
            false
        }
    }
}
