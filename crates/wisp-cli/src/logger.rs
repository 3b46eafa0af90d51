//! Logging setup for the wisp CLI.
//!
//! Library crates emit `tracing` events; this module installs the subscriber that
//! prints them.
//!
//! # Example
//!
//! ```rust,no_run
//! use wisp_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("Starting build");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "wisp=debug,wisp_bundler=debug,wisp_manifest=debug,wisp_cli=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "wisp=info,wisp_bundler=info,wisp_manifest=info,wisp_cli=info";

/// Initialize the tracing subscriber with the specified options.
///
/// Should be called once at the start of the program, before any logging occurs.
///
/// # Verbosity Levels
///
/// The logging level is determined in this order:
/// 1. `--verbose` flag: DEBUG for wisp crates
/// 2. `--quiet` flag: errors only
/// 3. `RUST_LOG` environment variable: custom filter
/// 4. Default: INFO for wisp crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize logger with a custom environment filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can only be installed once per process, so these
    // tests only exercise filter construction.

    #[test]
    fn test_verbose_filter_covers_every_crate() {
        let filter = filter_for(true, false).to_string();
        for krate in ["wisp_bundler", "wisp_manifest", "wisp_cli"] {
            assert!(filter.contains(&format!("{krate}=debug")));
        }
    }

    #[test]
    fn test_verbose_wins_over_quiet() {
        assert!(filter_for(true, true).to_string().contains("debug"));
    }

    #[test]
    fn test_quiet_filter_is_errors_only() {
        assert_eq!(filter_for(false, true).to_string(), "error");
    }
}
