use std::sync::Arc;

use tokio::sync::OwnedMutexGuard;

use reading_core::model::{Month, MonthId, Plan, Progress, ProgressKey};
use reading_core::stats::{self, ReadingStats};

use crate::error::TrackerError;
use crate::progress_store::ProgressStore;

/// Per-month line of the overview, useful for UI tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSummary {
    pub id: MonthId,
    pub name: String,
    pub stats: ReadingStats,
}

/// One cell of a month's reading grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry {
    pub day: u32,
    pub passage: String,
    pub chapters: u32,
    pub is_read: bool,
}

/// A user's reading session: the shared plan plus their progress.
///
/// Sessions opened through [`crate::AppServices`] hold its session lock until
/// dropped, so at most one of them writes the stored mapping at a time.
pub struct ReadingTracker {
    plan: Arc<Plan>,
    store: ProgressStore,
    _session: Option<OwnedMutexGuard<()>>,
}

impl ReadingTracker {
    #[must_use]
    pub fn new(plan: Arc<Plan>, store: ProgressStore) -> Self {
        Self {
            plan,
            store,
            _session: None,
        }
    }

    pub(crate) fn with_session(mut self, guard: OwnedMutexGuard<()>) -> Self {
        self._session = Some(guard);
        self
    }

    #[must_use]
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    #[must_use]
    pub fn progress(&self) -> &Progress {
        self.store.progress()
    }

    #[must_use]
    pub fn global_stats(&self) -> ReadingStats {
        stats::global_stats(&self.plan, self.store.progress())
    }

    /// Zeroed for months that are not in the plan.
    #[must_use]
    pub fn month_stats(&self, month: &MonthId) -> ReadingStats {
        stats::month_stats(&self.plan, self.store.progress(), month)
    }

    #[must_use]
    pub fn month_overview(&self) -> Vec<MonthSummary> {
        stats::month_overview(&self.plan, self.store.progress())
            .into_iter()
            .map(|(month, stats)| MonthSummary {
                id: month.id().clone(),
                name: month.name().to_owned(),
                stats,
            })
            .collect()
    }

    /// Month at `index`, clamped to the plan bounds. `None` for an empty plan.
    #[must_use]
    pub fn month_at(&self, index: usize) -> Option<&Month> {
        let last = self.plan.len().checked_sub(1)?;
        self.plan.month_at(index.min(last))
    }

    /// Readings of one month in day order; empty for unknown months.
    #[must_use]
    pub fn day_entries(&self, month: &MonthId) -> Vec<DayEntry> {
        let Some(month) = self.plan.month(month) else {
            return Vec::new();
        };
        let progress = self.store.progress();
        month
            .readings()
            .map(|(day, passage)| DayEntry {
                day,
                passage: passage.to_owned(),
                chapters: month.chapters_for(day).unwrap_or(1),
                is_read: progress.is_day_read(month.id(), day),
            })
            .collect()
    }

    /// Flip the read flag of one plan entry and persist it.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if the month or day is not part of the plan.
    pub async fn toggle_day(&mut self, month: &MonthId, day: u32) -> Result<bool, TrackerError> {
        let entry = self
            .plan
            .month(month)
            .ok_or_else(|| TrackerError::UnknownMonth(month.clone()))?;
        if !entry.has_day(day) {
            return Err(TrackerError::UnknownDay {
                month: month.clone(),
                day,
            });
        }
        let key = ProgressKey::new(month.clone(), day);
        Ok(self.store.toggle(&key).await)
    }

    /// Clear all progress once `confirm` returns `true`.
    pub async fn reset_progress(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        self.store.reset(confirm).await
    }
}
