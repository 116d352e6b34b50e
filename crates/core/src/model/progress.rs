use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::badge::{BadgeId, BadgeRecord, BadgeRule};
use crate::model::ids::{LessonId, TopicId};
use crate::model::quiz::QuizResult;
use crate::model::streak::StreakState;

/// Result of asking to complete a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonOutcome {
    /// The lesson was newly marked complete.
    Completed,
    /// The lesson had been completed before; nothing changed.
    AlreadyDone,
}

/// The single persisted root holding all learner progress.
///
/// Serialized layout:
///
/// ```text
/// {
///   "lessons": { "<lesson>": true },
///   "quizzes": { "<topic>": { "score": 8, "total": 10, "percent": 80 } },
///   "badges":  { "<badge>": { "title": "..", "description": "..", "date": "2024-1-2" } },
///   "streak":  { "current": 1, "best": 1, "lastDate": "2024-1-2" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressDocument {
    #[serde(deserialize_with = "deserialize_completed_lessons")]
    lessons: BTreeMap<LessonId, bool>,
    quizzes: BTreeMap<TopicId, QuizResult>,
    badges: BTreeMap<BadgeId, BadgeRecord>,
    streak: StreakState,
}

/// Completion is permanent, so every stored lesson entry must be `true`.
fn deserialize_completed_lessons<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<LessonId, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let lessons = BTreeMap::<LessonId, bool>::deserialize(deserializer)?;
    if let Some((id, _)) = lessons.iter().find(|(_, done)| !**done) {
        return Err(serde::de::Error::custom(format!(
            "lesson {id} is stored as not completed"
        )));
    }
    Ok(lessons)
}

impl ProgressDocument {
    /// Empty document used on first run and after a reset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_lesson_completed(&self, id: &LessonId) -> bool {
        self.lessons.contains_key(id)
    }

    /// Marks a lesson complete. Completion is permanent.
    pub fn complete_lesson(&mut self, id: LessonId) -> LessonOutcome {
        if self.lessons.contains_key(&id) {
            return LessonOutcome::AlreadyDone;
        }
        self.lessons.insert(id, true);
        LessonOutcome::Completed
    }

    #[must_use]
    pub fn completed_lesson_count(&self) -> usize {
        self.lessons.len()
    }

    pub fn completed_lessons(&self) -> impl Iterator<Item = &LessonId> {
        self.lessons.keys()
    }

    /// Stores a quiz result, replacing any earlier result for the topic.
    pub fn record_quiz(&mut self, topic: TopicId, result: QuizResult) {
        self.quizzes.insert(topic, result);
    }

    #[must_use]
    pub fn quiz(&self, topic: &TopicId) -> Option<&QuizResult> {
        self.quizzes.get(topic)
    }

    #[must_use]
    pub fn quizzes(&self) -> &BTreeMap<TopicId, QuizResult> {
        &self.quizzes
    }

    #[must_use]
    pub fn has_badge(&self, id: BadgeId) -> bool {
        self.badges.contains_key(&id)
    }

    #[must_use]
    pub fn badge(&self, id: BadgeId) -> Option<&BadgeRecord> {
        self.badges.get(&id)
    }

    #[must_use]
    pub fn badges(&self) -> &BTreeMap<BadgeId, BadgeRecord> {
        &self.badges
    }

    /// Grants the badge for `rule` unless it was already earned.
    ///
    /// Returns `true` if the badge was inserted. Existing records are left
    /// untouched.
    pub fn earn_badge(&mut self, rule: &BadgeRule, earned_date: &str) -> bool {
        if self.badges.contains_key(&rule.id) {
            return false;
        }
        self.badges.insert(rule.id, rule.record(earned_date));
        true
    }

    #[must_use]
    pub fn streak(&self) -> &StreakState {
        &self.streak
    }

    pub fn streak_mut(&mut self) -> &mut StreakState {
        &mut self.streak
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::badge::BADGE_RULES;

    #[test]
    fn completing_twice_is_already_done() {
        let mut doc = ProgressDocument::new();
        assert_eq!(doc.complete_lesson("l1".into()), LessonOutcome::Completed);
        let snapshot = doc.clone();
        assert_eq!(doc.complete_lesson("l1".into()), LessonOutcome::AlreadyDone);
        assert_eq!(doc, snapshot);
        assert!(doc.is_lesson_completed(&"l1".into()));
        assert_eq!(doc.completed_lesson_count(), 1);
    }

    #[test]
    fn quiz_results_overwrite_per_topic() {
        let mut doc = ProgressDocument::new();
        doc.record_quiz("theory".into(), QuizResult::new(3, 10).unwrap());
        doc.record_quiz("theory".into(), QuizResult::new(8, 10).unwrap());
        let stored = doc.quiz(&"theory".into()).unwrap();
        assert_eq!(stored.percent(), 80);
        assert_eq!(doc.quizzes().len(), 1);
    }

    #[test]
    fn earned_badge_is_never_replaced() {
        let mut doc = ProgressDocument::new();
        assert!(doc.earn_badge(&BADGE_RULES[0], "2024-1-1"));
        assert!(!doc.earn_badge(&BADGE_RULES[0], "2024-6-6"));
        let record = doc.badge(BadgeId::FirstLesson).unwrap();
        assert_eq!(record.earned_date(), "2024-1-1");
    }

    #[test]
    fn default_document_matches_legacy_layout() {
        let json = serde_json::to_value(ProgressDocument::new()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "lessons": {},
                "quizzes": {},
                "badges": {},
                "streak": { "current": 0, "best": 0, "lastDate": null }
            })
        );
    }

    #[test]
    fn parses_legacy_document() {
        let raw = r#"{
            "lessons": { "rhythm-1": true, "pitch-2": true },
            "quizzes": { "theory": { "score": 8, "total": 10, "percent": 80 } },
            "badges": {
                "first_lesson": {
                    "title": "First Note",
                    "description": "Completed your first lesson",
                    "date": "2024-5-1"
                }
            },
            "streak": { "current": 2, "best": 4, "lastDate": "2024-5-2" }
        }"#;
        let doc: ProgressDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.completed_lesson_count(), 2);
        assert!(doc.is_lesson_completed(&"pitch-2".into()));
        assert_eq!(doc.quiz(&"theory".into()).unwrap().score(), 8);
        assert!(doc.has_badge(BadgeId::FirstLesson));
        assert_eq!(doc.streak().best(), 4);
        assert_eq!(doc.streak().last_date(), Some("2024-5-2"));
    }

    #[test]
    fn rejects_unknown_badge_ids() {
        let raw = r#"{
            "lessons": {},
            "quizzes": {},
            "badges": { "speedrunner": { "title": "x", "description": "y", "date": "z" } },
            "streak": { "current": 0, "best": 0, "lastDate": null }
        }"#;
        assert!(serde_json::from_str::<ProgressDocument>(raw).is_err());
    }

    #[test]
    fn rejects_lesson_stored_as_not_completed() {
        let raw = r#"{
            "lessons": { "l1": false },
            "quizzes": {},
            "badges": {},
            "streak": { "current": 0, "best": 0, "lastDate": null }
        }"#;
        let err = serde_json::from_str::<ProgressDocument>(raw).unwrap_err();
        assert!(err.to_string().contains("lesson l1 is stored as not completed"));
    }
}
