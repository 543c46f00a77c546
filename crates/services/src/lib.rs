#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod plan_loader;
pub mod progress_store;
pub mod tracker;

pub use app_services::AppServices;
pub use config::TrackerConfig;
pub use error::{AppServicesError, PlanLoadError, TrackerError};
pub use plan_loader::{load_plan_file, parse_plan};
pub use progress_store::ProgressStore;
pub use tracker::{DayEntry, MonthSummary, ReadingTracker};
