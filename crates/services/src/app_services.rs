use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::app_settings_service::AppSettingsService;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;
use crate::sinks::{NotificationSink, SoundSink};
use crate::sound_service::SoundService;

/// Assembles app-facing services and makes sure a progress document exists.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressService>,
    app_settings: Arc<AppSettingsService>,
    sounds: Arc<SoundService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the stored
    /// progress document is corrupt.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        notifier: Arc<dyn NotificationSink>,
        sound_sink: Arc<dyn SoundSink>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage, clock, notifier, sound_sink).await
    }

    /// Build services over an existing storage aggregate.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Progress` if the default document cannot be
    /// written or the stored one is corrupt.
    pub async fn from_storage(
        storage: Storage,
        clock: Clock,
        notifier: Arc<dyn NotificationSink>,
        sound_sink: Arc<dyn SoundSink>,
    ) -> Result<Self, AppServicesError> {
        let app_settings = Arc::new(AppSettingsService::new(
            Arc::clone(&storage.settings),
            Arc::clone(&notifier),
        ));
        let sounds = Arc::new(SoundService::new(sound_sink, Arc::clone(&app_settings)));
        let progress = Arc::new(ProgressService::new(
            clock,
            Arc::clone(&storage.progress),
            notifier,
            Arc::clone(&sounds),
        ));

        progress.initialize_if_absent().await?;

        Ok(Self {
            progress,
            app_settings,
            sounds,
        })
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn app_settings(&self) -> Arc<AppSettingsService> {
        Arc::clone(&self.app_settings)
    }

    #[must_use]
    pub fn sounds(&self) -> Arc<SoundService> {
        Arc::clone(&self.sounds)
    }
}
