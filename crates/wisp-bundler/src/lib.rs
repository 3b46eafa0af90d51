//! # wisp-bundler
//!
//! Builds every output a `package.json` declares, using rolldown for the code entries and
//! `tsc` for declarations.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use wisp_bundler::{BuildOptions, Orchestrator, RolldownEngine};
//! use wisp_manifest::Manifest;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cwd = std::env::current_dir()?;
//! let manifest = Manifest::read(&cwd)?;
//! let mut orchestrator =
//!     Orchestrator::new(manifest, BuildOptions::new(cwd), Arc::new(RolldownEngine::new()));
//!
//! let report = orchestrator.bundle().await?;
//! for entry in &report.built {
//!     println!("{} <- {}", entry.output_path, entry.source.display());
//! }
//! # Ok(()) }
//! ```

pub mod dts;
pub mod engine;
pub mod error;
pub mod executable;
pub mod orchestrator;
pub mod plugins;
pub mod watch;

pub use dts::{DeclarationEmitter, DeclarationRequest, TscEmitter};
pub use engine::{
    Engine, EngineContext, EngineFailure, EngineOutput, EngineRequest, Format, RolldownEngine,
    SourceMapMode,
};
pub use error::{Error, Result};
pub use orchestrator::{BuildOptions, BuiltEntry, BundleReport, Orchestrator, clean_dist};
pub use watch::{
    ChangeEvent, ChangeKind, ChangeResult, ChangeSource, ChangeSourceError, DEFAULT_DEBOUNCE,
    NotifySource, Rebuild, WatchCoordinator, WatchState, WatchSummary,
};

pub use tokio_util::sync::CancellationToken;
