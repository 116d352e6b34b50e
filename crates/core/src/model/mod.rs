mod app_settings;
mod badge;
mod ids;
mod progress;
mod quiz;
mod sound;
mod streak;

pub use app_settings::AppSettings;
pub use badge::{BADGE_RULES, BadgeId, BadgeRecord, BadgeRule};
pub use ids::{LessonId, TopicId};
pub use progress::{LessonOutcome, ProgressDocument};
pub use quiz::{QuizError, QuizResult};
pub use sound::{Cue, NoteError, PianoNote};
pub use streak::{StreakError, StreakState};
