//! Runtime configuration for the tracker, resolved from the environment.

use std::path::{Path, PathBuf};

use storage::repository::DEFAULT_PROGRESS_KEY;

use crate::error::AppServicesError;

pub const DB_URL_ENV: &str = "READING_DB_URL";
pub const PLAN_PATH_ENV: &str = "READING_PLAN_PATH";
pub const STORAGE_KEY_ENV: &str = "READING_STORAGE_KEY";

const DEFAULT_DB_PATH: &str = "reading.sqlite3";
const DEFAULT_PLAN_PATH: &str = "plan.json";

/// Where the tracker keeps its state and finds its plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub db_url: String,
    pub plan_path: PathBuf,
    pub storage_key: String,
}

impl TrackerConfig {
    #[must_use]
    pub fn new(db_url: impl Into<String>, plan_path: impl Into<PathBuf>) -> Self {
        Self {
            db_url: normalize_sqlite_url(&db_url.into()),
            plan_path: plan_path.into(),
            storage_key: DEFAULT_PROGRESS_KEY.to_string(),
        }
    }

    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Defaults overridden by `READING_DB_URL`, `READING_PLAN_PATH` and
    /// `READING_STORAGE_KEY`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`TrackerConfig::from_env`] with an injectable variable source.
    /// Blank values fall back to the defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let db_url = var(DB_URL_ENV).unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let plan_path = var(PLAN_PATH_ENV).unwrap_or_else(|| DEFAULT_PLAN_PATH.to_string());
        let config = Self::new(db_url, plan_path);
        match var(STORAGE_KEY_ENV) {
            Some(key) => config.with_storage_key(key.trim()),
            None => config,
        }
    }
}

fn is_memory_url(url: &str) -> bool {
    url == "sqlite::memory:" || url.contains("mode=memory")
}

/// Turn a bare path or `sqlite:` URL into an absolute `sqlite://` URL.
///
/// In-memory URLs and URLs already in `sqlite://` form are returned as-is.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_memory_url(trimmed) || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Make sure the database file and its parent directory exist.
pub(crate) fn prepare_sqlite_file(db_url: &str) -> Result<(), AppServicesError> {
    if is_memory_url(db_url) {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| AppServicesError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(AppServicesError::InvalidDbUrl {
            raw: db_url.to_string(),
        });
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        tracing::info!(path = %path.display(), "created database file");
    }

    Ok(())
}
