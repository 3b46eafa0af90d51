//! Debounced rebuilds driven by filesystem changes.
//!
//! A [`ChangeSource`] turns a directory into a stream of [`ChangeEvent`]s, and the
//! [`WatchCoordinator`] coalesces bursts of content modifications into single calls to a
//! [`Rebuild`] target until its cancellation token fires.

mod coordinator;
mod source;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::orchestrator::Orchestrator;

pub use coordinator::{DEFAULT_DEBOUNCE, WatchCoordinator, WatchState, WatchSummary};
pub use source::NotifySource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    /// File contents changed. The only kind that triggers a rebuild.
    Modify,
    Remove,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// A failure reported by the change source while watching. Not fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ChangeSourceError(pub String);

pub type ChangeResult = std::result::Result<ChangeEvent, ChangeSourceError>;

pub trait ChangeSource: Send {
    /// Starts watching `root` recursively.
    ///
    /// Fails with [`crate::Error::ChangeSubscriptionFailed`] when the directory cannot be watched.
    fn subscribe(&mut self, root: &Path) -> Result<mpsc::Receiver<ChangeResult>>;

    /// Stops watching. The receiver returned by `subscribe` closes once buffered events drain.
    fn unsubscribe(&mut self);
}

/// What the coordinator calls when the debounce timer fires.
#[async_trait]
pub trait Rebuild: Send {
    async fn rebuild(&mut self) -> Result<()>;
}

#[async_trait]
impl Rebuild for Orchestrator {
    async fn rebuild(&mut self) -> Result<()> {
        self.bundle().await.map(|_| ())
    }
}
