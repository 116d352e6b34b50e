use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NoteError {
    #[error("note name cannot be empty")]
    Empty,

    #[error("invalid character {found:?} in note name")]
    InvalidCharacter { found: char },
}

/// Name of a piano note clip, e.g. `C4` or `F#3`.
///
/// Restricted to ASCII letters, digits, `#` and `-` so the clip path always
/// stays inside the sounds directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PianoNote(String);

impl PianoNote {
    /// Validate a note name.
    ///
    /// # Errors
    ///
    /// Returns `NoteError` if the name is blank or has a disallowed character.
    pub fn new(name: impl Into<String>) -> Result<Self, NoteError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(NoteError::Empty);
        }
        if let Some(found) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '#' || *c == '-'))
        {
            return Err(NoteError::InvalidCharacter { found });
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PianoNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Audio feedback the app can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    Click,
    Complete,
    Note(PianoNote),
}

impl Cue {
    /// Relative path of the clip played for this cue.
    #[must_use]
    pub fn clip(&self) -> String {
        match self {
            Cue::Click => "assets/sounds/ui/click.mp3".to_owned(),
            Cue::Complete => "assets/sounds/ui/complete.mp3".to_owned(),
            Cue::Note(note) => format!("assets/sounds/{note}.mp3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_cues_map_to_ui_clips() {
        assert_eq!(Cue::Click.clip(), "assets/sounds/ui/click.mp3");
        assert_eq!(Cue::Complete.clip(), "assets/sounds/ui/complete.mp3");
    }

    #[test]
    fn note_cue_maps_to_note_clip() {
        let note = PianoNote::new("C#4").unwrap();
        assert_eq!(Cue::Note(note).clip(), "assets/sounds/C#4.mp3");
    }

    #[test]
    fn note_name_is_trimmed() {
        assert_eq!(PianoNote::new("  A3 ").unwrap().as_str(), "A3");
    }

    #[test]
    fn rejects_blank_note() {
        assert_eq!(PianoNote::new("  "), Err(NoteError::Empty));
    }

    #[test]
    fn rejects_path_like_note() {
        assert_eq!(
            PianoNote::new("../secret"),
            Err(NoteError::InvalidCharacter { found: '.' })
        );
    }
}
