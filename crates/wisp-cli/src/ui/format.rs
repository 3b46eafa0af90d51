//! Formatting for durations, timestamps and build reports.

use std::path::Path;
use std::time::Duration;

use owo_colors::OwoColorize;
use wisp_bundler::BundleReport;

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use wisp_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Local wall-clock time as `HH:MM:SS`, used to prefix watch-mode lines.
pub fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Print one line per built entry (and per declaration output) to stderr.
///
/// Sources are shown relative to `root` when they live under it.
pub fn print_bundle_report(report: &BundleReport, root: &Path) {
    let colors = super::colors_enabled();

    for entry in &report.built {
        let source = entry.source.strip_prefix(root).unwrap_or(&entry.source);
        let origin = format!("← {} ({})", source.display(), entry.provenance);
        if colors {
            eprintln!("  {} {}", entry.output_path.bold(), origin.dimmed());
        } else {
            eprintln!("  {} {}", entry.output_path, origin);
        }
    }

    if report.declarations_emitted {
        for declaration in &report.declarations {
            let origin = "← tsc";
            if colors {
                eprintln!("  {} {}", declaration.bold(), origin.dimmed());
            } else {
                eprintln!("  {} {}", declaration, origin);
            }
        }
    }
}
