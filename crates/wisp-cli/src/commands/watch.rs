//! Watch mode: rebuild the whole package whenever a source file changes.
//!
//! Ctrl-C cancels the coordinator; a rebuild already running finishes first.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::signal;
use wisp_bundler::{
    CancellationToken, NotifySource, Orchestrator, Rebuild, WatchCoordinator, WatchSummary,
};

use crate::commands::build::count;
use crate::error::Result;
use crate::ui;

/// Watch `source_root` and rebuild through `orchestrator` until Ctrl-C.
pub async fn execute(
    orchestrator: Orchestrator,
    source_root: &Path,
    debounce: Duration,
) -> Result<()> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    ui::info(&format!(
        "Watching {} for changes (Ctrl+C to stop)",
        source_root.display()
    ));

    let mut coordinator =
        WatchCoordinator::new(NotifySource::new(), source_root).with_debounce(debounce);
    let mut target = ReportingRebuild { orchestrator };
    let summary = coordinator.watch(&mut target, cancel).await?;

    ui::success(&stopped_message(summary));
    Ok(())
}

/// Prints a timestamped status line around every rebuild.
struct ReportingRebuild {
    orchestrator: Orchestrator,
}

#[async_trait]
impl Rebuild for ReportingRebuild {
    async fn rebuild(&mut self) -> wisp_bundler::Result<()> {
        match self.orchestrator.bundle().await {
            Ok(report) => {
                ui::success(&format!(
                    "[{}] Rebuilt {} in {}",
                    ui::timestamp(),
                    count(report.built.len() + report.declarations.len(), "output"),
                    ui::format_duration(report.duration)
                ));
                Ok(())
            }
            Err(err) => {
                ui::error(&format!("[{}] Rebuild failed: {}", ui::timestamp(), err));
                Err(err)
            }
        }
    }
}

fn stopped_message(summary: WatchSummary) -> String {
    let mut message = format!(
        "Stopped watching after {}",
        count(summary.rebuilds as usize, "rebuild")
    );
    if summary.failures > 0 {
        message.push_str(&format!(" ({} failed)", summary.failures));
    }
    message
}
