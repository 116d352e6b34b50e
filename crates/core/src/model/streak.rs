use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StreakError {
    #[error("streak best {best} is below current {current}")]
    BestBelowCurrent { current: u32, best: u32 },
}

/// Daily engagement counter.
///
/// `current` grows by one on every new calendar day with a qualifying
/// activity. It is never reset when a day is skipped; `best` tracks the
/// highest value `current` has reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredStreak")]
pub struct StreakState {
    current: u32,
    best: u32,
    last_date: Option<String>,
}

impl StreakState {
    #[must_use]
    pub fn current(&self) -> u32 {
        self.current
    }

    #[must_use]
    pub fn best(&self) -> u32 {
        self.best
    }

    #[must_use]
    pub fn last_date(&self) -> Option<&str> {
        self.last_date.as_deref()
    }

    /// Records activity on `today` (a `YYYY-M-D` day string).
    ///
    /// Returns `true` if the streak changed, `false` when activity was
    /// already recorded for that day.
    pub fn touch(&mut self, today: &str) -> bool {
        if self.last_date.as_deref() == Some(today) {
            return false;
        }

        self.current = self.current.saturating_add(1);
        if self.current > self.best {
            self.best = self.current;
        }
        self.last_date = Some(today.to_owned());
        true
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredStreak {
    current: u32,
    best: u32,
    last_date: Option<String>,
}

impl TryFrom<StoredStreak> for StreakState {
    type Error = StreakError;

    fn try_from(stored: StoredStreak) -> Result<Self, Self::Error> {
        if stored.best < stored.current {
            return Err(StreakError::BestBelowCurrent {
                current: stored.current,
                best: stored.best,
            });
        }
        Ok(Self {
            current: stored.current,
            best: stored.best,
            last_date: stored.last_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_streak_is_empty() {
        let streak = StreakState::default();
        assert_eq!(streak.current(), 0);
        assert_eq!(streak.best(), 0);
        assert_eq!(streak.last_date(), None);
    }

    #[test]
    fn first_touch_starts_streak() {
        let mut streak = StreakState::default();
        assert!(streak.touch("2024-1-1"));
        assert_eq!(streak.current(), 1);
        assert_eq!(streak.best(), 1);
        assert_eq!(streak.last_date(), Some("2024-1-1"));
    }

    #[test]
    fn same_day_touch_counts_once() {
        let mut streak = StreakState::default();
        assert!(streak.touch("2024-1-1"));
        assert!(!streak.touch("2024-1-1"));
        assert_eq!(streak.current(), 1);
    }

    #[test]
    fn skipped_day_still_increments() {
        let mut streak = StreakState::default();
        streak.touch("2024-1-1");
        streak.touch("2024-1-5");
        assert_eq!(streak.current(), 2);
        assert_eq!(streak.best(), 2);
        assert_eq!(streak.last_date(), Some("2024-1-5"));
    }

    #[test]
    fn best_never_drops_below_current() {
        let mut streak = StreakState::default();
        for day in 1..=10 {
            streak.touch(&format!("2024-2-{day}"));
            streak.touch(&format!("2024-2-{day}"));
            assert!(streak.best() >= streak.current());
        }
        assert_eq!(streak.best(), 10);
    }

    #[test]
    fn serializes_with_camel_case_last_date() {
        let json = serde_json::to_value(StreakState::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"current": 0, "best": 0, "lastDate": null})
        );
    }

    #[test]
    fn deserializes_stored_streak() {
        let streak: StreakState =
            serde_json::from_str(r#"{"current":2,"best":4,"lastDate":"2024-1-5"}"#).unwrap();
        assert_eq!(streak.current(), 2);
        assert_eq!(streak.best(), 4);
        assert_eq!(streak.last_date(), Some("2024-1-5"));
    }

    #[test]
    fn deserialize_rejects_best_below_current() {
        let err = serde_json::from_str::<StreakState>(r#"{"current":5,"best":1,"lastDate":null}"#)
            .unwrap_err();
        assert!(err.to_string().contains("best 1 is below current 5"));
    }
}
