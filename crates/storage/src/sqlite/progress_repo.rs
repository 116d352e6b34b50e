use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{ProgressRepository, StorageError, decode_document, encode_document};
use melody_core::model::ProgressDocument;

use super::SqliteRepository;

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_document(&self) -> Result<Option<ProgressDocument>, StorageError> {
        let row = sqlx::query("SELECT body FROM progress_document WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let body: String = row
            .try_get("body")
            .map_err(|err| StorageError::Corrupt(err.to_string()))?;
        decode_document(&body).map(Some)
    }

    async fn save_document(&self, doc: &ProgressDocument) -> Result<(), StorageError> {
        let body = encode_document(doc)?;
        sqlx::query(
            r"
            INSERT INTO progress_document (id, body, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            ",
        )
        .bind(1_i64)
        .bind(&body)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        tracing::debug!(bytes = body.len(), "saved progress document");
        Ok(())
    }

    async fn clear_document(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM progress_document WHERE id = 1")
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
