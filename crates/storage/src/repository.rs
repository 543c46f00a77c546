use async_trait::async_trait;
use reading_core::model::Progress;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::mapping::{decode_progress, encode_progress};

/// Storage key the progress mapping lives under unless configured otherwise.
pub const DEFAULT_PROGRESS_KEY: &str = "bible_reading_progress_v1";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the persisted progress mapping.
///
/// The whole mapping is stored as one serialized value under a single key.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the mapping stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored value is not a
    /// progress mapping, or other storage errors.
    async fn load_progress(&self, key: &str) -> Result<Option<Progress>, StorageError>;

    /// Replace the mapping stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the mapping cannot be stored.
    async fn save_progress(&self, key: &str, progress: &Progress) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Values are kept in their serialized form so corrupt payloads can be
/// planted with [`InMemoryRepository::insert_raw`].
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store a raw serialized value, bypassing encoding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_raw(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.into());
        Ok(())
    }

    /// Raw serialized value under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self, key: &str) -> Result<Option<Progress>, StorageError> {
        self.raw(key)?.as_deref().map(decode_progress).transpose()
    }

    async fn save_progress(&self, key: &str, progress: &Progress) -> Result<(), StorageError> {
        let encoded = encode_progress(progress)?;
        self.insert_raw(key, encoded)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}
