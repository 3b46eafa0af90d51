use std::path::PathBuf;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use super::{ChangeKind, ChangeSource, Rebuild};
use crate::error::Result;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Debouncing,
    Rebuilding,
    ShuttingDown,
    Terminated,
}

/// Counts reported when the coordinator terminates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    /// Rebuilds started, failed ones included.
    pub rebuilds: u64,
    pub failures: u64,
}

pub struct WatchCoordinator<S> {
    source: S,
    root: PathBuf,
    debounce: Duration,
    state: WatchState,
}

impl<S: ChangeSource> WatchCoordinator<S> {
    pub fn new(source: S, root: impl Into<PathBuf>) -> Self {
        Self {
            source,
            root: root.into(),
            debounce: DEFAULT_DEBOUNCE,
            state: WatchState::Idle,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Watches until `cancel` fires.
    ///
    /// Only a failed subscription is returned as an error; rebuild and change-source failures
    /// are logged and watching continues. A rebuild in progress always completes before the
    /// cancellation is observed.
    pub async fn watch<R: Rebuild + ?Sized>(
        &mut self,
        target: &mut R,
        cancel: CancellationToken,
    ) -> Result<WatchSummary> {
        let mut events = self.source.subscribe(&self.root)?;
        self.state = WatchState::Idle;
        tracing::info!(
            root = %self.root.display(),
            debounce_ms = self.debounce.as_millis() as u64,
            "watching for changes"
        );

        let mut summary = WatchSummary::default();
        let mut deadline: Option<Instant> = None;
        let mut stream_open = true;

        loop {
            let fire = tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                message = events.recv(), if stream_open => {
                    match message {
                        Some(Ok(event)) if event.kind == ChangeKind::Modify => {
                            tracing::debug!(path = %event.path.display(), "change detected");
                            deadline = Some(Instant::now() + self.debounce);
                            self.state = WatchState::Debouncing;
                        }
                        Some(Ok(event)) => {
                            tracing::trace!(
                                path = %event.path.display(),
                                kind = ?event.kind,
                                "ignored change"
                            );
                        }
                        Some(Err(err)) => {
                            tracing::warn!(error = %err, "change source error");
                        }
                        None => {
                            tracing::warn!("change stream closed, waiting for shutdown");
                            stream_open = false;
                        }
                    }
                    false
                }

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    true
                }
            };

            if fire {
                deadline = None;
                self.run_rebuild(target, &mut summary).await;
            }
        }

        self.state = WatchState::ShuttingDown;
        self.source.unsubscribe();
        self.state = WatchState::Terminated;
        tracing::info!(
            rebuilds = summary.rebuilds,
            failures = summary.failures,
            "watcher stopped"
        );
        Ok(summary)
    }

    async fn run_rebuild<R: Rebuild + ?Sized>(
        &mut self,
        target: &mut R,
        summary: &mut WatchSummary,
    ) {
        self.state = WatchState::Rebuilding;
        tracing::info!("Detected changes, rebuilding...");

        summary.rebuilds += 1;
        if let Err(err) = target.rebuild().await {
            summary.failures += 1;
            tracing::error!(error = %err, "rebuild failed");
        }

        self.state = WatchState::Idle;
    }
}
