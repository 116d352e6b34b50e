use serde::{Deserialize, Serialize};

/// Per-device preferences that live outside the progress document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    sound_enabled: bool,
}

impl AppSettings {
    #[must_use]
    pub fn new(sound_enabled: bool) -> Self {
        Self { sound_enabled }
    }

    #[must_use]
    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Returns a copy with the sound flag flipped.
    #[must_use]
    pub fn with_sound_toggled(self) -> Self {
        Self {
            sound_enabled: !self.sound_enabled,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sound_is_on_by_default() {
        assert!(AppSettings::default().sound_enabled());
    }

    #[test]
    fn toggling_twice_restores_setting() {
        let settings = AppSettings::default();
        let toggled = settings.with_sound_toggled();
        assert!(!toggled.sound_enabled());
        assert_eq!(toggled.with_sound_toggled(), settings);
    }
}
