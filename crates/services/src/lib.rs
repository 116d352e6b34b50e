#![forbid(unsafe_code)]

pub mod app_services;
pub mod app_settings_service;
pub mod error;
pub mod progress_service;
pub mod sinks;
pub mod sound_service;

pub use melody_core::Clock;

pub use app_services::AppServices;
pub use app_settings_service::AppSettingsService;
pub use error::{AppServicesError, AppSettingsServiceError, ProgressError, SoundError};
pub use progress_service::ProgressService;
pub use sinks::{LogNotifier, NotificationSink, SilentSoundSink, SoundSink};
pub use sound_service::SoundService;
