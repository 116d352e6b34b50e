//! Narrow interfaces to the outside world: user-visible messages and audio.

/// Surfaces messages to the learner.
pub trait NotificationSink: Send + Sync {
    /// Show a fire-and-forget message.
    fn notify(&self, message: &str);

    /// Ask a yes/no question and block until it is answered.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Plays a named audio clip. Fire-and-forget; must not fail.
pub trait SoundSink: Send + Sync {
    fn play(&self, clip: &str);
}

/// Notification sink that only writes to the log and declines every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::info!(text = message, "notification");
    }

    fn confirm(&self, prompt: &str) -> bool {
        tracing::info!(prompt, "confirmation declined (non-interactive)");
        false
    }
}

/// Sound sink that drops every clip.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSoundSink;

impl SoundSink for SilentSoundSink {
    fn play(&self, clip: &str) {
        tracing::trace!(clip, "sound dropped");
    }
}
