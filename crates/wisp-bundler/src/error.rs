use std::path::PathBuf;

/// Error types for wisp-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Manifest could not be read or its export map could not be flattened.
    #[error(transparent)]
    Manifest(#[from] wisp_manifest::Error),

    /// An entry's output path has no source file behind it.
    #[error("{output_path} ({provenance}): {source}")]
    Source {
        output_path: String,
        provenance: String,
        #[source]
        source: wisp_manifest::Error,
    },

    /// The bundling engine rejected an entry.
    #[error("build failed for {output_path} ({provenance}): {}", format_diagnostics(.diagnostics))]
    EngineBuildFailed {
        output_path: String,
        provenance: String,
        diagnostics: Vec<String>,
    },

    /// The declaration emitter exited unsuccessfully.
    #[error("declaration emit failed: {0}")]
    DeclarationEmitFailed(String),

    /// Executable patching failed for an entry.
    #[error("failed to mark {} as executable: {source}", .path.display())]
    Executable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dist directory is not safe to delete.
    #[error("refusing to clean {}: {reason}", .path.display())]
    UnsafeClean { path: PathBuf, reason: String },

    /// The change source could not watch the requested directory.
    #[error("failed to watch {}: {reason}", .root.display())]
    ChangeSubscriptionFailed { root: PathBuf, reason: String },

    /// I/O error with context message.
    #[error("{message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for wisp-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Error::IoError {
            message: message.into(),
            source,
        }
    }
}

fn format_diagnostics(diagnostics: &[String]) -> String {
    match diagnostics {
        [] => "unknown bundler error".to_string(),
        [single] => single.clone(),
        many => format!("{} errors: {}", many.len(), many.join("; ")),
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Manifest(wisp_manifest::Error::ManifestNotFound(_)) => "MANIFEST_NOT_FOUND",
            Error::Manifest(wisp_manifest::Error::ManifestParse { .. }) => "MANIFEST_PARSE_ERROR",
            Error::Manifest(wisp_manifest::Error::UnsupportedExportNode { .. }) => {
                "UNSUPPORTED_EXPORT_NODE"
            }
            Error::Manifest(_) => "MANIFEST_ERROR",
            Error::Source { .. } => "SOURCE_NOT_FOUND",
            Error::EngineBuildFailed { .. } => "ENGINE_BUILD_FAILED",
            Error::DeclarationEmitFailed(_) => "DECLARATION_EMIT_FAILED",
            Error::Executable { .. } => "EXECUTABLE_PATCH_FAILED",
            Error::UnsafeClean { .. } => "UNSAFE_CLEAN",
            Error::ChangeSubscriptionFailed { .. } => "CHANGE_SUBSCRIPTION_FAILED",
            Error::IoError { .. } => "IO_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Manifest(wisp_manifest::Error::ManifestNotFound(_)) => Some(Box::new(
                "Run wisp from a package directory or pass --cwd <dir>.",
            )),
            Error::Manifest(wisp_manifest::Error::UnsupportedExportNode { .. }) => Some(Box::new(
                "Export map values must be a \"./\" path, a condition object or an array.",
            )),
            Error::Source { .. } => Some(Box::new(
                "Check --src and --dist: the output path minus the dist directory must exist under the source directory.",
            )),
            Error::DeclarationEmitFailed(_) => Some(Box::new(
                "Make sure typescript is installed, or pass --no-dts to skip declarations.",
            )),
            Error::UnsafeClean { .. } => Some(Box::new(
                "--clean-dist only removes a directory inside the project that is not the project itself.",
            )),
            _ => None,
        }
    }
}
