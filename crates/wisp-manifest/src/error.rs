//! Error types for manifest loading and export resolution.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("package.json not found in {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("failed to parse {}: {source}", .path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An export map node that is neither a path, a condition map nor a fallback list.
    #[error("unsupported export type for {provenance}")]
    UnsupportedExportNode { provenance: String },

    /// `output_path` is the literal manifest value; the message renders it JSON-quoted.
    #[error("could not find matching source file for export path {}", quoted(.output_path))]
    SourceNotFound { output_path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn quoted(path: &str) -> String {
    serde_json::to_string(path).unwrap_or_else(|_| format!("\"{}\"", path))
}
