use std::sync::Arc;

use melody_core::model::{Cue, PianoNote};

use crate::app_settings_service::AppSettingsService;
use crate::error::SoundError;
use crate::sinks::SoundSink;

/// Routes audio cues to the sound sink, honouring the sound setting.
#[derive(Clone)]
pub struct SoundService {
    sink: Arc<dyn SoundSink>,
    settings: Arc<AppSettingsService>,
}

impl SoundService {
    #[must_use]
    pub fn new(sink: Arc<dyn SoundSink>, settings: Arc<AppSettingsService>) -> Self {
        Self { sink, settings }
    }

    /// Play `cue` if sound is enabled. Returns whether it was played.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::Settings` if the sound setting cannot be read.
    pub async fn play(&self, cue: &Cue) -> Result<bool, SoundError> {
        if !self.settings.load().await?.sound_enabled() {
            return Ok(false);
        }
        self.sink.play(&cue.clip());
        Ok(true)
    }

    /// Play the UI click cue.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::Settings` if the sound setting cannot be read.
    pub async fn play_click(&self) -> Result<bool, SoundError> {
        self.play(&Cue::Click).await
    }

    /// Play a piano note by name, e.g. `C4`.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::InvalidNote` for malformed names and
    /// `SoundError::Settings` if the sound setting cannot be read.
    pub async fn play_note(&self, name: &str) -> Result<bool, SoundError> {
        let note = PianoNote::new(name)?;
        self.play(&Cue::Note(note)).await
    }

    /// Play `cue` without surfacing failures to the caller.
    pub(crate) async fn play_quietly(&self, cue: &Cue) {
        if let Err(err) = self.play(cue).await {
            tracing::warn!(error = %err, clip = %cue.clip(), "skipping sound cue");
        }
    }
}
