use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::MonthId;
use crate::passage::count_chapters;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlanError {
    #[error("month id cannot be empty")]
    EmptyMonthId,

    #[error("month {0} has an empty name")]
    EmptyMonthName(MonthId),

    #[error("month id {0} appears more than once")]
    DuplicateMonthId(MonthId),

    #[error("month {0} has a reading for day 0")]
    ZeroDay(MonthId),
}

//
// ─── MONTH ─────────────────────────────────────────────────────────────────────
//

/// One month of the reading plan.
///
/// `readings` maps day → passage text. `chapter_counts`, when present, is the
/// hand-maintained chapter count per day and always wins over the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Month {
    id: MonthId,
    name: String,
    readings: BTreeMap<u32, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chapter_counts: Option<BTreeMap<u32, u32>>,
}

impl Month {
    #[must_use]
    pub fn new(
        id: MonthId,
        name: impl Into<String>,
        readings: impl IntoIterator<Item = (u32, String)>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            readings: readings.into_iter().collect(),
            chapter_counts: None,
        }
    }

    /// Attach an explicit day → chapter-count table.
    #[must_use]
    pub fn with_chapter_counts(mut self, counts: impl IntoIterator<Item = (u32, u32)>) -> Self {
        self.chapter_counts = Some(counts.into_iter().collect());
        self
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &MonthId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn chapter_counts(&self) -> Option<&BTreeMap<u32, u32>> {
        self.chapter_counts.as_ref()
    }

    /// Readings in day order.
    pub fn readings(&self) -> impl Iterator<Item = (u32, &str)> {
        self.readings.iter().map(|(day, text)| (*day, text.as_str()))
    }

    #[must_use]
    pub fn passage(&self, day: u32) -> Option<&str> {
        self.readings.get(&day).map(String::as_str)
    }

    #[must_use]
    pub fn has_day(&self, day: u32) -> bool {
        self.readings.contains_key(&day)
    }

    #[must_use]
    pub fn day_count(&self) -> usize {
        self.readings.len()
    }

    /// Chapters for one day: the explicit table when the month has one
    /// (missing days count 1), otherwise the parsed passage.
    ///
    /// Returns `None` if the month has no reading for `day`.
    #[must_use]
    pub fn chapters_for(&self, day: u32) -> Option<u32> {
        let passage = self.readings.get(&day)?;
        Some(match &self.chapter_counts {
            Some(table) => table.get(&day).copied().unwrap_or(1),
            None => count_chapters(passage),
        })
    }

    /// Days whose explicit chapter count is missing, plus table days that have
    /// no reading. Empty when the month has no table or the keys agree.
    #[must_use]
    pub fn chapter_count_gaps(&self) -> Vec<u32> {
        let Some(table) = &self.chapter_counts else {
            return Vec::new();
        };
        let missing = self.readings.keys().filter(|day| !table.contains_key(*day));
        let extra = table.keys().filter(|day| !self.readings.contains_key(*day));
        let mut gaps: Vec<u32> = missing.chain(extra).copied().collect();
        gaps.sort_unstable();
        gaps
    }

    fn validate(&self) -> Result<(), PlanError> {
        if self.id.as_str().trim().is_empty() {
            return Err(PlanError::EmptyMonthId);
        }
        if self.name.trim().is_empty() {
            return Err(PlanError::EmptyMonthName(self.id.clone()));
        }
        if self.readings.contains_key(&0) {
            return Err(PlanError::ZeroDay(self.id.clone()));
        }
        Ok(())
    }
}

//
// ─── PLAN ──────────────────────────────────────────────────────────────────────
//

/// The yearly reading plan: months in navigation order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plan {
    months: Vec<Month>,
}

impl Plan {
    /// Creates a plan from months in display order.
    ///
    /// # Errors
    ///
    /// Returns `PlanError` if a month id or name is blank, a month id repeats,
    /// or a month has a reading for day 0.
    pub fn new(months: Vec<Month>) -> Result<Self, PlanError> {
        let mut seen = HashSet::with_capacity(months.len());
        for month in &months {
            month.validate()?;
            if !seen.insert(month.id()) {
                return Err(PlanError::DuplicateMonthId(month.id().clone()));
            }
        }
        Ok(Self { months })
    }

    #[must_use]
    pub fn months(&self) -> &[Month] {
        &self.months
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.months.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    #[must_use]
    pub fn month(&self, id: &MonthId) -> Option<&Month> {
        self.months.iter().find(|m| m.id() == id)
    }

    #[must_use]
    pub fn month_at(&self, index: usize) -> Option<&Month> {
        self.months.get(index)
    }

    #[must_use]
    pub fn position(&self, id: &MonthId) -> Option<usize> {
        self.months.iter().position(|m| m.id() == id)
    }

    /// Months whose chapter-count table disagrees with their readings.
    #[must_use]
    pub fn chapter_count_gaps(&self) -> Vec<(&MonthId, Vec<u32>)> {
        self.months
            .iter()
            .map(|m| (m.id(), m.chapter_count_gaps()))
            .filter(|(_, gaps)| !gaps.is_empty())
            .collect()
    }
}

/// Serialized shape of a plan: `{"months": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDocument {
    pub months: Vec<Month>,
}

impl PlanDocument {
    /// Validate the document into a `Plan`.
    ///
    /// # Errors
    ///
    /// Returns `PlanError` under the same rules as [`Plan::new`].
    pub fn into_plan(self) -> Result<Plan, PlanError> {
        Plan::new(self.months)
    }
}

impl From<&Plan> for PlanDocument {
    fn from(plan: &Plan) -> Self {
        Self {
            months: plan.months.clone(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
