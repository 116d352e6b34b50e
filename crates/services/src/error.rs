//! Shared error types for the services crate.

use thiserror::Error;

use melody_core::model::{NoteError, QuizError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("invalid quiz: {0}")]
    InvalidQuiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ProgressError {
    /// True when the stored document could not be parsed or failed validation.
    #[must_use]
    pub fn is_storage_corrupt(&self) -> bool {
        matches!(self, ProgressError::Storage(StorageError::Corrupt(_)))
    }
}

/// Errors emitted by `AppSettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppSettingsServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SoundService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SoundError {
    #[error("invalid note: {0}")]
    InvalidNote(#[from] NoteError),
    #[error(transparent)]
    Settings(#[from] AppSettingsServiceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}
