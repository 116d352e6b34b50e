use std::sync::Arc;

use melody_core::model::AppSettings;
use storage::repository::SettingsRepository;

use crate::error::AppSettingsServiceError;
use crate::sinks::NotificationSink;

#[derive(Clone)]
pub struct AppSettingsService {
    repo: Arc<dyn SettingsRepository>,
    notifier: Arc<dyn NotificationSink>,
}

impl AppSettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn SettingsRepository>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { repo, notifier }
    }

    /// Load persisted settings (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` on storage failures.
    pub async fn load(&self) -> Result<AppSettings, AppSettingsServiceError> {
        let settings = self.repo.get_settings().await?;
        Ok(settings.unwrap_or_default())
    }

    /// Persist new settings.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` if persistence fails.
    pub async fn save(&self, settings: AppSettings) -> Result<AppSettings, AppSettingsServiceError> {
        self.repo.save_settings(&settings).await?;
        Ok(settings)
    }

    /// Flip the sound flag, persist it and tell the learner.
    ///
    /// Returns the new value of the flag.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` if loading or saving fails.
    pub async fn toggle_sound(&self) -> Result<bool, AppSettingsServiceError> {
        let settings = self.load().await?.with_sound_toggled();
        self.save(settings).await?;

        let enabled = settings.sound_enabled();
        tracing::info!(enabled, "sound toggled");
        self.notifier
            .notify(if enabled { "Sound On" } else { "Sound Off" });
        Ok(enabled)
    }
}
