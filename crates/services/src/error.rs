//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use reading_core::model::{MonthId, PlanError};
use storage::sqlite::SqliteInitError;

/// Errors emitted while reading a plan document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlanLoadError {
    #[error("failed to read plan file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("plan document is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Errors emitted by `ReadingTracker` for entries outside the plan.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TrackerError {
    #[error("month {0} is not in the plan")]
    UnknownMonth(MonthId),
    #[error("month {month} has no reading for day {day}")]
    UnknownDay { month: MonthId, day: u32 },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error("invalid database url: {raw}")]
    InvalidDbUrl { raw: String },
    #[error("another reading session is still open")]
    SessionInUse,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    PlanLoad(#[from] PlanLoadError),
}
