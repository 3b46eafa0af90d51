//! Shared helpers for command implementations.

use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::error::{CliError, Result, ResultExt};

/// Resolve `path` against `cwd` unless it is already absolute.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path).clean()
    }
}

/// The directory holding package.json: `--cwd` resolved against the process
/// directory, or the process directory itself.
pub fn project_root(cwd: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir().context("Failed to get current directory")?;

    let root = match cwd {
        Some(dir) => resolve_path(dir, &current),
        None => current,
    };

    if !root.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Project directory does not exist: {}",
            root.display()
        )));
    }
    Ok(root)
}
