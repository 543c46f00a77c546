use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::{MonthId, ProgressKey};

/// Read flags per day-entry, keyed by `"{month}-{day}"`.
///
/// Keys are kept verbatim, including ones whose month has left the plan and
/// ones toggled back to `false`, so the mapping serializes exactly as it was
/// loaded. A missing key reads as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress {
    entries: BTreeMap<String, bool>,
}

impl Progress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_read(&self, key: &ProgressKey) -> bool {
        self.is_read_raw(&key.to_string())
    }

    #[must_use]
    pub fn is_day_read(&self, month: &MonthId, day: u32) -> bool {
        self.is_read(&ProgressKey::new(month.clone(), day))
    }

    #[must_use]
    pub fn is_read_raw(&self, key: &str) -> bool {
        self.entries.get(key).copied().unwrap_or(false)
    }

    /// Flip one key (absent counts as `false`) and return the new value.
    pub fn toggle(&mut self, key: &ProgressKey) -> bool {
        self.toggle_raw(&key.to_string())
    }

    pub fn toggle_raw(&mut self, key: &str) -> bool {
        let flag = self.entries.entry(key.to_owned()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of keys currently marked read.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.entries.values().filter(|read| **read).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, bool)> for Progress {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(month: &str, day: u32) -> ProgressKey {
        ProgressKey::new(MonthId::new(month), day)
    }

    #[test]
    fn absent_key_is_unread() {
        let progress = Progress::new();
        assert!(!progress.is_read(&key("jan", 1)));
    }

    #[test]
    fn first_toggle_marks_read() {
        let mut progress = Progress::new();
        assert!(progress.toggle(&key("jan", 1)));
        assert!(progress.is_read_raw("jan-1"));
        assert!(progress.is_day_read(&MonthId::new("jan"), 1));
    }

    #[test]
    fn double_toggle_restores_value() {
        let mut progress: Progress = [("jan-2".to_string(), true)].into_iter().collect();
        let before = progress.is_read(&key("jan", 2));

        progress.toggle(&key("jan", 2));
        progress.toggle(&key("jan", 2));

        assert_eq!(progress.is_read(&key("jan", 2)), before);
    }

    #[test]
    fn clear_drops_everything() {
        let mut progress = Progress::new();
        progress.toggle(&key("jan", 1));
        progress.toggle(&key("fev", 3));
        assert_eq!(progress.read_count(), 2);

        progress.clear();
        assert!(progress.is_empty());
        assert_eq!(progress.read_count(), 0);
    }

    #[test]
    fn serializes_as_flat_mapping() {
        let mut progress = Progress::new();
        progress.toggle(&key("jan", 1));
        progress.toggle_raw("old-month-4");
        progress.toggle_raw("old-month-4");

        let json = serde_json::to_string(&progress).unwrap();
        assert_eq!(json, r#"{"jan-1":true,"old-month-4":false}"#);

        let back: Progress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, progress);
    }
}
