//! Conversion from CLI errors to miette reports.

use miette::Report;

use crate::error::CliError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        // Bundler errors carry diagnostic codes and help text
        CliError::Bundle(e) => Report::new(e),
        CliError::Manifest(e) => Report::new(wisp_bundler::Error::from(e)),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}
