//! Read/total aggregation over a plan and its progress.
//!
//! Everything here is recomputed from `Plan` + `Progress` on demand and never
//! stored, so a plan revision cannot leave stale totals behind.

use crate::model::{Month, MonthId, Plan, Progress};

/// Unit used to weight progress percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressWeighting {
    /// Each entry counts its chapters (explicit table or parsed passage).
    #[default]
    Chapters,
    /// Each entry counts one day, regardless of length.
    Days,
}

/// Aggregated read/total counts for one month or the whole plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadingStats {
    pub read_days: u32,
    pub total_days: u32,
    pub read_chapters: u32,
    pub total_chapters: u32,
}

impl ReadingStats {
    /// Chapters read.
    #[must_use]
    pub fn read(&self) -> u32 {
        self.read_chapters
    }

    /// Chapters in scope.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total_chapters
    }

    /// Chapters left to read.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.total_chapters.saturating_sub(self.read_chapters)
    }

    /// Chapter-weighted completion, rounded to the nearest percent.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage_by(ProgressWeighting::Chapters)
    }

    #[must_use]
    pub fn percentage_by(&self, weighting: ProgressWeighting) -> u32 {
        match weighting {
            ProgressWeighting::Chapters => percentage(self.read_chapters, self.total_chapters),
            ProgressWeighting::Days => percentage(self.read_days, self.total_days),
        }
    }

    fn record(&mut self, chapters: u32, read: bool) {
        self.total_days = self.total_days.saturating_add(1);
        self.total_chapters = self.total_chapters.saturating_add(chapters);
        if read {
            self.read_days = self.read_days.saturating_add(1);
            self.read_chapters = self.read_chapters.saturating_add(chapters);
        }
    }
}

impl std::ops::Add for ReadingStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            read_days: self.read_days.saturating_add(rhs.read_days),
            total_days: self.total_days.saturating_add(rhs.total_days),
            read_chapters: self.read_chapters.saturating_add(rhs.read_chapters),
            total_chapters: self.total_chapters.saturating_add(rhs.total_chapters),
        }
    }
}

impl std::iter::Sum for ReadingStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, stats| acc + stats)
    }
}

/// `round(100 * read / total)` with halves rounded up; 0 when `total` is 0.
#[must_use]
pub fn percentage(read: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (read, total) = (u64::from(read), u64::from(total));
    u32::try_from((read * 200 + total) / (total * 2)).unwrap_or(u32::MAX)
}

/// Stats for one month of the plan.
#[must_use]
pub fn tally_month(month: &Month, progress: &Progress) -> ReadingStats {
    let mut stats = ReadingStats::default();
    for (day, _) in month.readings() {
        let chapters = month.chapters_for(day).unwrap_or(1);
        stats.record(chapters, progress.is_day_read(month.id(), day));
    }
    stats
}

/// Stats for the month with `month_id`; zeroed when the plan has no such month.
#[must_use]
pub fn month_stats(plan: &Plan, progress: &Progress, month_id: &MonthId) -> ReadingStats {
    plan.month(month_id)
        .map(|month| tally_month(month, progress))
        .unwrap_or_default()
}

/// Stats over every entry of every month.
#[must_use]
pub fn global_stats(plan: &Plan, progress: &Progress) -> ReadingStats {
    plan.months()
        .iter()
        .map(|month| tally_month(month, progress))
        .sum()
}

/// Per-month stats in plan order.
#[must_use]
pub fn month_overview<'a>(plan: &'a Plan, progress: &Progress) -> Vec<(&'a Month, ReadingStats)> {
    plan.months()
        .iter()
        .map(|month| (month, tally_month(month, progress)))
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProgressKey;

    fn month(id: &str, readings: &[(u32, &str)]) -> Month {
        Month::new(
            MonthId::new(id),
            id,
            readings.iter().map(|(d, p)| (*d, (*p).to_string())),
        )
    }

    fn sample_plan() -> Plan {
        let jan = month("jan", &[(1, "Gn 1-3"), (2, "Gn 4-6"), (3, "Ag 1-2; Zc 1-2")]);
        let fev = month("fev", &[(1, "Jn"), (2, "Sl 119")]);
        Plan::new(vec![jan, fev]).unwrap()
    }

    fn read(progress: &mut Progress, month: &str, day: u32) {
        progress.toggle(&ProgressKey::new(MonthId::new(month), day));
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn percentage_of_empty_total_is_zero() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(ReadingStats::default().percentage(), 0);
    }

    #[test]
    fn month_stats_counts_chapters_and_days() {
        let plan = sample_plan();
        let mut progress = Progress::new();
        read(&mut progress, "jan", 1);
        read(&mut progress, "jan", 3);

        let stats = month_stats(&plan, &progress, &MonthId::new("jan"));
        assert_eq!(stats.total_chapters, 10);
        assert_eq!(stats.read_chapters, 7);
        assert_eq!(stats.total_days, 3);
        assert_eq!(stats.read_days, 2);
        assert_eq!(stats.percentage(), 70);
        assert_eq!(stats.percentage_by(ProgressWeighting::Days), 67);
        assert_eq!(stats.remaining(), 3);
    }

    #[test]
    fn unknown_month_is_zeroed() {
        let plan = sample_plan();
        let mut progress = Progress::new();
        read(&mut progress, "gone", 1);

        let stats = month_stats(&plan, &progress, &MonthId::new("gone"));
        assert_eq!(stats, ReadingStats::default());
        assert_eq!((stats.read(), stats.total(), stats.percentage()), (0, 0, 0));
    }

    #[test]
    fn global_total_is_sum_of_months() {
        let plan = sample_plan();
        let mut progress = Progress::new();
        read(&mut progress, "fev", 1);

        let global = global_stats(&plan, &progress);
        let summed: u32 = plan
            .months()
            .iter()
            .map(|m| month_stats(&plan, &progress, m.id()).total())
            .sum();
        assert_eq!(global.total(), summed);
        assert_eq!(global.total(), 15);
        assert_eq!(global.read(), 4);
        assert_eq!(global.percentage(), 27);
    }

    #[test]
    fn stale_and_false_keys_are_ignored() {
        let plan = sample_plan();
        let progress: Progress = [
            ("old-1".to_string(), true),
            ("jan-2".to_string(), false),
            ("jan-99".to_string(), true),
        ]
        .into_iter()
        .collect();

        assert_eq!(global_stats(&plan, &progress).read(), 0);
    }

    #[test]
    fn explicit_table_beats_parser() {
        let jan =
            month("jan", &[(1, "Gn 1-3"), (2, "Gn 4-6")]).with_chapter_counts([(1, 1), (2, 1)]);
        let plan = Plan::new(vec![jan]).unwrap();
        let progress = Progress::new();

        let stats = month_stats(&plan, &progress, &MonthId::new("jan"));
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn overview_follows_plan_order() {
        let plan = sample_plan();
        let progress = Progress::new();
        let ids: Vec<&str> = month_overview(&plan, &progress)
            .iter()
            .map(|(m, _)| m.id().as_str())
            .collect();
        assert_eq!(ids, vec!["jan", "fev"]);
    }

    #[test]
    fn cleared_progress_reads_nothing() {
        let plan = sample_plan();
        let mut progress = Progress::new();
        read(&mut progress, "jan", 1);
        read(&mut progress, "fev", 2);
        progress.clear();

        assert_eq!(global_stats(&plan, &progress).read(), 0);
    }
}
