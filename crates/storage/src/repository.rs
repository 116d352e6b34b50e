use async_trait::async_trait;
use melody_core::model::{AppSettings, ProgressDocument};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("stored progress is corrupt: {0}")]
    Corrupt(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Encode the full document as the JSON text kept in storage.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_document(doc: &ProgressDocument) -> Result<String, StorageError> {
    serde_json::to_string(doc).map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Decode stored JSON text into a document.
///
/// # Errors
///
/// Returns `StorageError::Corrupt` if the text is not a valid document.
pub fn decode_document(raw: &str) -> Result<ProgressDocument, StorageError> {
    serde_json::from_str(raw).map_err(|err| {
        tracing::warn!(error = %err, "stored progress document failed to parse");
        StorageError::Corrupt(err.to_string())
    })
}

/// Repository contract for the single progress document.
///
/// Every write replaces the whole document; readers never observe a
/// partially written value.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the stored document, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` if the stored value cannot be parsed,
    /// or other storage errors.
    async fn load_document(&self) -> Result<Option<ProgressDocument>, StorageError>;

    /// Persist the full document, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be stored.
    async fn save_document(&self, doc: &ProgressDocument) -> Result<(), StorageError>;

    /// Delete the stored document entirely.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be removed.
    async fn clear_document(&self) -> Result<(), StorageError>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetch persisted settings, if any were saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError>;

    /// Persist settings, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the settings cannot be stored.
    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// The document is kept in its serialized form so reads go through the same
/// decoding path as durable backends.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    document: Arc<Mutex<Option<String>>>,
    settings: Arc<Mutex<Option<AppSettings>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with raw stored text, bypassing validation.
    #[must_use]
    pub fn with_raw_document(raw: impl Into<String>) -> Self {
        Self {
            document: Arc::new(Mutex::new(Some(raw.into()))),
            settings: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the raw stored text, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw_document(&self) -> Result<Option<String>, StorageError> {
        let guard = self
            .document
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_document(&self) -> Result<Option<ProgressDocument>, StorageError> {
        let guard = self
            .document
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.as_deref().map(decode_document).transpose()
    }

    async fn save_document(&self, doc: &ProgressDocument) -> Result<(), StorageError> {
        let encoded = encode_document(doc)?;
        let mut guard = self
            .document
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(encoded);
        Ok(())
    }

    async fn clear_document(&self) -> Result<(), StorageError> {
        let mut guard = self
            .document
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for InMemoryRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(*settings);
        Ok(())
    }
}

/// Aggregates progress and settings repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    /// Wrap an existing in-memory repository, keeping a handle for inspection.
    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let settings: Arc<dyn SettingsRepository> = Arc::new(repo);
        Self { progress, settings }
    }
}
