//! Threshold-based badge unlocking.

use crate::model::{BADGE_RULES, BadgeRule, ProgressDocument};

/// Rules whose threshold is met by `doc` but whose badge is not yet earned.
///
/// Returned in ascending threshold order. Several rules can be pending at
/// once, e.g. when a document crosses multiple thresholds between checks.
#[must_use]
pub fn pending_unlocks(doc: &ProgressDocument) -> Vec<&'static BadgeRule> {
    let completed = doc.completed_lesson_count();
    BADGE_RULES
        .iter()
        .filter(|rule| rule.is_met(completed) && !doc.has_badge(rule.id))
        .collect()
}
