//! Status message functions for terminal output.

use owo_colors::{OwoColorize, Style};

fn line(symbol: &str, style: Style, message: &str) {
    if super::colors_enabled() {
        eprintln!("{} {}", symbol.style(style), message);
    } else {
        eprintln!("{} {}", symbol, message);
    }
}

/// Print a success message to stderr.
///
/// ```no_run
/// wisp_cli::ui::success("Build completed");
/// ```
pub fn success(message: &str) {
    line("✓", Style::new().green().bold(), message);
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    line("ℹ", Style::new().blue().bold(), message);
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    line("⚠", Style::new().yellow().bold(), message);
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    line("✗", Style::new().red().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        success("Success message");
        info("Info message");
        warning("Warning message");
        error("Error message");
    }
}
