use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a month in the reading plan (e.g. `"jan"`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthId(String);

impl MonthId {
    /// Creates a new `MonthId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Composite progress key for one day-entry of the plan.
///
/// Formats as `"{month}-{day}"`, the shape used by the persisted progress
/// mapping.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgressKey {
    month: MonthId,
    day: u32,
}

impl ProgressKey {
    #[must_use]
    pub fn new(month: MonthId, day: u32) -> Self {
        Self { month, day }
    }

    #[must_use]
    pub fn month(&self) -> &MonthId {
        &self.month
    }

    #[must_use]
    pub fn day(&self) -> u32 {
        self.day
    }
}

impl fmt::Debug for MonthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MonthId({:?})", self.0)
    }
}

impl fmt::Debug for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProgressKey({self})")
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for MonthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.month, self.day)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing a `ProgressKey` from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyError {
    raw: String,
}

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse progress key from {:?}", self.raw)
    }
}

impl std::error::Error for ParseKeyError {}

impl FromStr for ProgressKey {
    type Err = ParseKeyError;

    /// Splits on the last hyphen so month ids may themselves contain hyphens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseKeyError { raw: s.to_owned() };
        let (month, day) = s.rsplit_once('-').ok_or_else(err)?;
        if month.is_empty() {
            return Err(err());
        }
        let day = day.parse::<u32>().map_err(|_| err())?;
        Ok(Self::new(MonthId::new(month), day))
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
