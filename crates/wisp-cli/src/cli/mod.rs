//! Command-line interface definition for wisp.
//!
//! `wisp [OPTIONS]` builds the package in the current (or `--cwd`) directory;
//! `wisp version` prints the version.

mod commands;
pub mod enums;
mod validation;

use clap::Parser;

pub use commands::{BuildArgs, Command};
pub use enums::*;
pub(crate) use validation::is_env_key;
pub use validation::{parse_env_pair, parse_sourcemap};

/// wisp - build a package from the outputs its package.json declares
#[derive(Parser, Debug)]
#[command(
    name = "wisp",
    version,
    about = "Build a package from the outputs its package.json declares",
    long_about = "wisp reads package.json, flattens main, module, types, bin and the exports map\n\
                  into output files, finds the source file behind each one and bundles it with\n\
                  rolldown. Declarations are emitted with tsc.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Subcommand to execute; building is the default
    #[command(subcommand)]
    pub command: Option<Command>,
}
