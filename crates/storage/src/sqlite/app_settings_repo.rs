use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{SettingsRepository, StorageError};
use melody_core::model::AppSettings;

use super::SqliteRepository;

#[async_trait]
impl SettingsRepository for SqliteRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT sound_enabled
            FROM app_settings
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let sound_enabled: bool = row
            .try_get("sound_enabled")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        Ok(Some(AppSettings::new(sound_enabled)))
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO app_settings (id, sound_enabled)
            VALUES (?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                sound_enabled = excluded.sound_enabled
            ",
        )
        .bind(1_i64)
        .bind(settings.sound_enabled())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
