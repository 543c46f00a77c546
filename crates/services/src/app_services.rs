use std::sync::Arc;

use reading_core::model::Plan;
use storage::repository::Storage;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::{TrackerConfig, prepare_sqlite_file};
use crate::error::AppServicesError;
use crate::plan_loader::load_plan_file;
use crate::progress_store::ProgressStore;
use crate::tracker::ReadingTracker;

/// Assembles the plan and storage, and opens tracker sessions over them.
///
/// Clones share one session lock: a tracker keeps it until dropped, so the
/// stored mapping has a single writer.
#[derive(Clone)]
pub struct AppServices {
    plan: Arc<Plan>,
    storage: Storage,
    storage_key: String,
    session: Arc<Mutex<()>>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and a plan file.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be prepared or
    /// migrated, or the plan cannot be loaded.
    pub async fn new_sqlite(config: &TrackerConfig) -> Result<Self, AppServicesError> {
        prepare_sqlite_file(&config.db_url)?;
        let storage = Storage::sqlite(&config.db_url).await?;
        let plan = load_plan_file(&config.plan_path)?;
        Ok(Self::new(storage, plan, config.storage_key.clone()))
    }

    /// Wire an already-built plan and storage together.
    #[must_use]
    pub fn new(storage: Storage, plan: Plan, storage_key: impl Into<String>) -> Self {
        for (month, days) in plan.chapter_count_gaps() {
            tracing::warn!(
                month = %month,
                days = ?days,
                "chapter-count table does not match readings; missing days count 1 chapter"
            );
        }
        Self {
            plan: Arc::new(plan),
            storage,
            storage_key: storage_key.into(),
            session: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn plan(&self) -> Arc<Plan> {
        Arc::clone(&self.plan)
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Start a session with progress loaded from storage, waiting for the
    /// previous session to be dropped first.
    pub async fn open_tracker(&self) -> ReadingTracker {
        let guard = Arc::clone(&self.session).lock_owned().await;
        self.start_session(guard).await
    }

    /// Like [`AppServices::open_tracker`], without waiting.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::SessionInUse` while another tracker is open.
    pub async fn try_open_tracker(&self) -> Result<ReadingTracker, AppServicesError> {
        let guard = Arc::clone(&self.session)
            .try_lock_owned()
            .map_err(|_| AppServicesError::SessionInUse)?;
        Ok(self.start_session(guard).await)
    }

    async fn start_session(&self, guard: OwnedMutexGuard<()>) -> ReadingTracker {
        let repo = Arc::clone(&self.storage.progress);
        let store = ProgressStore::load(repo, self.storage_key.clone()).await;
        tracing::debug!(key = %self.storage_key, "opened reading session");
        ReadingTracker::new(self.plan(), store).with_session(guard)
    }
}
