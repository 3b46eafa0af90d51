//! The seam between the orchestrator and the bundling engine.
//!
//! The orchestrator opens one [`EngineContext`] per export entry and keeps it for the
//! lifetime of the session; later passes call [`EngineContext::rebuild`] on the retained
//! context. [`RolldownEngine`] is the production implementation.

mod rolldown_engine;

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;

pub use rolldown_engine::RolldownEngine;

/// Output module format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Esm,
    Cjs,
}

/// How source maps are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMapMode {
    #[default]
    None,
    Inline,
    /// Separate `.map` file referenced from the output.
    Linked,
}

/// Everything the engine needs to build one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRequest {
    /// Absolute path of the source file.
    pub entry: PathBuf,
    /// Absolute path of the file to write.
    pub outfile: PathBuf,
    pub format: Format,
    pub targets: Vec<String>,
    /// Bare specifiers left as imports in the output.
    pub externals: Vec<String>,
    /// Compile-time replacements, expression → JSON literal.
    pub defines: Vec<(String, String)>,
    pub sourcemap: SourceMapMode,
    pub minify: bool,
    pub conditions: Vec<String>,
    pub platform: Option<String>,
    pub cwd: PathBuf,
}

/// Files written by one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    pub files: Vec<PathBuf>,
}

/// Diagnostics reported by a failed build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineFailure {
    pub diagnostics: Vec<String>,
}

impl EngineFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            diagnostics: vec![message.into()],
        }
    }
}

impl fmt::Display for EngineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagnostics.join("; "))
    }
}

impl std::error::Error for EngineFailure {}

#[async_trait]
pub trait Engine: Send + Sync {
    /// Prepares a context for `request`. Does not build; call [`EngineContext::rebuild`].
    async fn open(&self, request: EngineRequest) -> Result<Box<dyn EngineContext>, EngineFailure>;
}

#[async_trait]
pub trait EngineContext: Send {
    /// Builds the entry and writes its output files.
    async fn rebuild(&mut self) -> Result<EngineOutput, EngineFailure>;
}
