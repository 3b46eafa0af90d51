//! wisp CLI entry point: argument parsing, logging setup and command dispatch.

use clap::Parser;
use miette::Result;
use wisp_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        Some(cli::Command::Version) => commands::version_execute(),
        None => commands::build_execute(args.build).await,
    };

    // Convert CLI errors to miette diagnostics for error reporting
    result.map_err(error::cli_error_to_miette)
}
