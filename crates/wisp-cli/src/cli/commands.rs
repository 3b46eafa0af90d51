use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::SourcemapSetting;
use crate::cli::validation::{parse_env_pair, parse_sourcemap};

/// Subcommands besides the default build
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the wisp version
    Version,
}

/// Arguments for building (and watching) a package
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct BuildArgs {
    /// Source directory, relative to the project root
    ///
    /// Output paths are mapped back into this directory to find their sources.
    /// Defaults to ./src.
    #[arg(long, value_name = "DIR")]
    pub src: Option<PathBuf>,

    /// Output directory, relative to the project root
    ///
    /// The prefix stripped from manifest output paths. Defaults to ./dist.
    #[arg(long, value_name = "DIR")]
    pub dist: Option<PathBuf>,

    /// Minify the output
    #[arg(short = 'm', long)]
    pub minify: bool,

    /// Keep running and rebuild when files under the source directory change
    #[arg(short = 'w', long)]
    pub watch: bool,

    /// Compilation targets (es2022, node18, ...)
    ///
    /// Repeat the flag or separate with commas. Defaults to es2022.
    #[arg(long = "target", value_name = "TARGET", value_delimiter = ',')]
    pub targets: Vec<String>,

    /// tsconfig used for declaration emit
    #[arg(long, value_name = "PATH")]
    pub tsconfig: Option<PathBuf>,

    /// Replace process.env.KEY with a string literal
    ///
    /// Examples:
    ///   wisp --env NODE_ENV=production
    ///   wisp --env API_URL=https://example.com --env DEBUG=
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,

    /// Extra export conditions used when resolving imports
    #[arg(long = "export-condition", value_name = "CONDITION")]
    pub export_conditions: Vec<String>,

    /// Source maps: inline, linked or none
    ///
    /// A bare --sourcemap, or any value other than inline and none, means linked.
    #[arg(
        long,
        value_name = "MODE",
        num_args = 0..=1,
        default_missing_value = "linked",
        value_parser = parse_sourcemap
    )]
    pub sourcemap: Option<SourcemapSetting>,

    /// Remove the output directory before the first build
    #[arg(long)]
    pub clean_dist: bool,

    /// Skip TypeScript declaration emit
    #[arg(long)]
    pub no_dts: bool,

    /// Quiet period after the last change before a rebuild, in milliseconds
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Project root containing package.json
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Path to a config file (default: <cwd>/wisp.config.json)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
