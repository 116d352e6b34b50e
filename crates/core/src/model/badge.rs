use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of badges a learner can earn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeId {
    FirstLesson,
    Starter,
    Dedicated,
    MusicMaster,
}

impl BadgeId {
    /// Stable storage key of the badge.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeId::FirstLesson => "first_lesson",
            BadgeId::Starter => "starter",
            BadgeId::Dedicated => "dedicated",
            BadgeId::MusicMaster => "music_master",
        }
    }
}

impl fmt::Display for BadgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An earned badge. Never modified after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRecord {
    title: String,
    description: String,
    #[serde(rename = "date")]
    earned_date: String,
}

impl BadgeRecord {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        earned_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            earned_date: earned_date.into(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Local calendar day the badge was earned, as `YYYY-M-D`.
    #[must_use]
    pub fn earned_date(&self) -> &str {
        &self.earned_date
    }
}

/// Unlock rule: a badge granted once `min_lessons` lessons are complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeRule {
    pub id: BadgeId,
    pub min_lessons: usize,
    pub title: &'static str,
    pub description: &'static str,
}

impl BadgeRule {
    #[must_use]
    pub fn is_met(&self, completed_lessons: usize) -> bool {
        completed_lessons >= self.min_lessons
    }

    /// Builds the record stored when this rule unlocks on `earned_date`.
    #[must_use]
    pub fn record(&self, earned_date: impl Into<String>) -> BadgeRecord {
        BadgeRecord::new(self.title, self.description, earned_date)
    }
}

/// Badge rules in ascending threshold order.
pub const BADGE_RULES: [BadgeRule; 4] = [
    BadgeRule {
        id: BadgeId::FirstLesson,
        min_lessons: 1,
        title: "First Note",
        description: "Completed your first lesson",
    },
    BadgeRule {
        id: BadgeId::Starter,
        min_lessons: 3,
        title: "Music Starter",
        description: "Completed one full topic",
    },
    BadgeRule {
        id: BadgeId::Dedicated,
        min_lessons: 9,
        title: "Dedicated Learner",
        description: "Completed three topics",
    },
    BadgeRule {
        id: BadgeId::MusicMaster,
        min_lessons: 27,
        title: "Music Master",
        description: "Completed all lessons",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_are_in_ascending_threshold_order() {
        let thresholds: Vec<usize> = BADGE_RULES.iter().map(|r| r.min_lessons).collect();
        assert_eq!(thresholds, vec![1, 3, 9, 27]);
    }

    #[test]
    fn badge_ids_use_snake_case_keys() {
        assert_eq!(
            serde_json::to_string(&BadgeId::MusicMaster).unwrap(),
            "\"music_master\""
        );
        assert_eq!(BadgeId::FirstLesson.to_string(), "first_lesson");
    }

    #[test]
    fn record_serializes_earned_date_as_date() {
        let record = BADGE_RULES[0].record("2024-1-2");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["title"], "First Note");
        assert_eq!(json["description"], "Completed your first lesson");
        assert_eq!(json["date"], "2024-1-2");
    }
}
