//! Post-processing for `bin` entries.

use std::path::Path;

use crate::error::{Error, Result};

pub const NODE_HASHBANG: &str = "#!/usr/bin/env node\n";

/// Prepends the node hashbang to `path` and marks it executable.
///
/// Files that already start with `#!` keep their first line.
pub async fn patch_executable(path: &Path) -> Result<()> {
    let wrap = |source| Error::Executable {
        path: path.to_path_buf(),
        source,
    };

    let contents = tokio::fs::read(path).await.map_err(wrap)?;
    if !contents.starts_with(b"#!") {
        let mut patched = Vec::with_capacity(NODE_HASHBANG.len() + contents.len());
        patched.extend_from_slice(NODE_HASHBANG.as_bytes());
        patched.extend_from_slice(&contents);
        tokio::fs::write(path, patched).await.map_err(wrap)?;
    }

    set_executable(path).await.map_err(wrap)?;
    tracing::debug!(path = %path.display(), "patched executable");
    Ok(())
}

#[cfg(unix)]
async fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await
}

#[cfg(not(unix))]
async fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
