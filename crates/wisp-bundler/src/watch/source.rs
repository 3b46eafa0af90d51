use std::path::Path;

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::{ChangeEvent, ChangeKind, ChangeResult, ChangeSource, ChangeSourceError};
use crate::error::{Error, Result};

const CHANNEL_CAPACITY: usize = 256;

/// [`ChangeSource`] backed by the platform's recommended `notify` watcher.
#[derive(Default)]
pub struct NotifySource {
    watcher: Option<RecommendedWatcher>,
}

impl NotifySource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChangeSource for NotifySource {
    fn subscribe(&mut self, root: &Path) -> Result<mpsc::Receiver<ChangeResult>> {
        let subscription_failed = |reason: String| Error::ChangeSubscriptionFailed {
            root: root.to_path_buf(),
            reason,
        };

        if !root.is_dir() {
            return Err(subscription_failed("not a directory".to_string()));
        }

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    let kind = change_kind(&event.kind);
                    for path in event.paths {
                        // Receiver gone: the coordinator has shut down.
                        if tx.blocking_send(Ok(ChangeEvent { path, kind })).is_err() {
                            return;
                        }
                    }
                }
                Err(err) => {
                    let _ = tx.blocking_send(Err(ChangeSourceError(err.to_string())));
                }
            }
        })
        .map_err(|e| subscription_failed(e.to_string()))?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| subscription_failed(e.to_string()))?;

        tracing::debug!(root = %root.display(), "subscribed to changes");
        self.watcher = Some(watcher);
        Ok(rx)
    }

    fn unsubscribe(&mut self) {
        if self.watcher.take().is_some() {
            tracing::debug!("unsubscribed from changes");
        }
    }
}

fn change_kind(kind: &EventKind) -> ChangeKind {
    match kind {
        EventKind::Create(_) => ChangeKind::Create,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any) => ChangeKind::Modify,
        EventKind::Remove(_) => ChangeKind::Remove,
        _ => ChangeKind::Other,
    }
}
