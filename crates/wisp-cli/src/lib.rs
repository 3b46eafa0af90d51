//! wisp CLI - builds every output a `package.json` declares.
//!
//! The CLI reads the package manifest, layers configuration from defaults,
//! `wisp.config.json`, `WISP_*` environment variables and command-line flags,
//! and hands the result to [`wisp_bundler::Orchestrator`]. With `--watch` it keeps
//! rebuilding on source changes until Ctrl-C.
//!
//! # Architecture
//!
//! - [`cli`] - clap argument definitions
//! - [`config`] - layered configuration loading and validation
//! - [`commands`] - `build` (the default) and `version`
//! - [`error`] - CLI error hierarchy and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status lines for the terminal

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, ConfigError, Result, ResultExt};
