use std::sync::Arc;

use reading_core::model::{Progress, ProgressKey};
use storage::repository::{ProgressRepository, StorageError};

/// An edit recorded while the stored mapping could not be read.
#[derive(Debug, Clone)]
enum Change {
    Toggle(ProgressKey),
    Clear,
}

impl Change {
    fn apply(&self, progress: &mut Progress) {
        match self {
            Self::Toggle(key) => {
                progress.toggle(key);
            }
            Self::Clear => progress.clear(),
        }
    }
}

/// Session-owned progress with a persist-after-every-mutation policy.
///
/// Loading never fails. Missing or malformed data starts an empty mapping
/// that later saves may overwrite. When storage cannot be reached at all the
/// session also starts empty, but nothing is written until the stored
/// mapping has been read back; the session's edits are then replayed on top
/// of it. Saving is best-effort: failures are logged and the in-memory state
/// stays authoritative for the rest of the session.
pub struct ProgressStore {
    repo: Arc<dyn ProgressRepository>,
    key: String,
    progress: Progress,
    /// `Some` until the stored mapping is known; holds edits to replay.
    unsynced: Option<Vec<Change>>,
}

impl ProgressStore {
    /// Load the mapping stored under `key`.
    pub async fn load(repo: Arc<dyn ProgressRepository>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (progress, unsynced) = match repo.load_progress(&key).await {
            Ok(Some(progress)) => (progress, None),
            Ok(None) => {
                tracing::debug!(key = %key, "no stored progress, starting empty");
                (Progress::new(), None)
            }
            Err(StorageError::Serialization(reason)) => {
                tracing::warn!(key = %key, error = %reason, "discarding unreadable progress");
                (Progress::new(), None)
            }
            Err(err) => {
                tracing::warn!(
                    key = %key,
                    error = %err,
                    "stored progress unavailable, holding writes until it can be read"
                );
                (Progress::new(), Some(Vec::new()))
            }
        };
        Self {
            repo,
            key,
            progress,
            unsynced,
        }
    }

    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// `false` while the stored mapping has not been read yet.
    #[must_use]
    pub fn is_synced(&self) -> bool {
        self.unsynced.is_none()
    }

    /// Persist the current mapping. Failures are logged, not returned.
    pub async fn save(&mut self) {
        if !self.resync().await {
            return;
        }
        if let Err(err) = self.repo.save_progress(&self.key, &self.progress).await {
            tracing::warn!(key = %self.key, error = %err, "failed to persist progress");
        }
    }

    /// Retry reading the stored mapping and replay pending edits on top of it.
    /// Returns `false` while storage is still unreachable.
    async fn resync(&mut self) -> bool {
        let Some(pending) = self.unsynced.as_ref() else {
            return true;
        };
        let mut progress = match self.repo.load_progress(&self.key).await {
            Ok(stored) => stored.unwrap_or_else(Progress::new),
            Err(StorageError::Serialization(reason)) => {
                tracing::warn!(
                    key = %self.key,
                    error = %reason,
                    "discarding unreadable progress"
                );
                Progress::new()
            }
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    error = %err,
                    pending = pending.len(),
                    "stored progress still unavailable, not saving"
                );
                return false;
            }
        };
        for change in pending {
            change.apply(&mut progress);
        }
        tracing::info!(key = %self.key, replayed = pending.len(), "recovered stored progress");
        self.progress = progress;
        self.unsynced = None;
        true
    }

    fn record(&mut self, change: Change) {
        if let Some(pending) = self.unsynced.as_mut() {
            pending.push(change);
        }
    }

    /// Flip one entry, persist, and return its new value.
    pub async fn toggle(&mut self, key: &ProgressKey) -> bool {
        self.progress.toggle(key);
        self.record(Change::Toggle(key.clone()));
        self.save().await;
        let read = self.progress.is_read(key);
        tracing::debug!(entry = %key, read, "toggled entry");
        read
    }

    /// Clear all progress if `confirm` agrees, then persist.
    ///
    /// Returns `true` when progress was cleared.
    pub async fn reset(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            return false;
        }
        self.progress.clear();
        self.record(Change::Clear);
        tracing::info!(key = %self.key, "progress reset");
        self.save().await;
        true
    }
}
