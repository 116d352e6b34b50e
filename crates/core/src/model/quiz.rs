use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz total must be > 0")]
    ZeroTotal,

    #[error("quiz score {score} exceeds total {total}")]
    ScoreAboveTotal { score: u32, total: u32 },

    #[error("stored quiz percent {stored} does not match expected {expected}")]
    PercentMismatch { stored: u8, expected: u8 },
}

/// Best-known result of a quiz on one topic.
///
/// Deserializing re-validates score and total and checks the stored percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredQuizResult")]
pub struct QuizResult {
    score: u32,
    total: u32,
    percent: u8,
}

impl QuizResult {
    /// Builds a result and derives its percentage.
    ///
    /// The percentage is `round(100 * score / total)`, with halves rounded up.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::ZeroTotal` when `total` is zero and
    /// `QuizError::ScoreAboveTotal` when `score > total`.
    pub fn new(score: u32, total: u32) -> Result<Self, QuizError> {
        if total == 0 {
            return Err(QuizError::ZeroTotal);
        }
        if score > total {
            return Err(QuizError::ScoreAboveTotal { score, total });
        }

        let score_wide = u64::from(score);
        let total_wide = u64::from(total);
        let rounded = (200 * score_wide + total_wide) / (2 * total_wide);
        let percent = u8::try_from(rounded).unwrap_or(100);

        Ok(Self {
            score,
            total,
            percent,
        })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn percent(&self) -> u8 {
        self.percent
    }
}

#[derive(Deserialize)]
struct StoredQuizResult {
    score: u32,
    total: u32,
    percent: u8,
}

impl TryFrom<StoredQuizResult> for QuizResult {
    type Error = QuizError;

    fn try_from(stored: StoredQuizResult) -> Result<Self, Self::Error> {
        let result = QuizResult::new(stored.score, stored.total)?;
        if result.percent != stored.percent {
            return Err(QuizError::PercentMismatch {
                stored: stored.percent,
                expected: result.percent,
            });
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_percent() {
        let result = QuizResult::new(8, 10).unwrap();
        assert_eq!(result.score(), 8);
        assert_eq!(result.total(), 10);
        assert_eq!(result.percent(), 80);
    }

    #[test]
    fn rounds_half_up() {
        // 1/8 = 12.5%
        assert_eq!(QuizResult::new(1, 8).unwrap().percent(), 13);
        // 2/3 = 66.67%
        assert_eq!(QuizResult::new(2, 3).unwrap().percent(), 67);
        // 1/3 = 33.33%
        assert_eq!(QuizResult::new(1, 3).unwrap().percent(), 33);
    }

    #[test]
    fn allows_zero_and_perfect_scores() {
        assert_eq!(QuizResult::new(0, 5).unwrap().percent(), 0);
        assert_eq!(QuizResult::new(5, 5).unwrap().percent(), 100);
    }

    #[test]
    fn rejects_zero_total() {
        assert_eq!(QuizResult::new(1, 0), Err(QuizError::ZeroTotal));
        assert_eq!(QuizResult::new(0, 0), Err(QuizError::ZeroTotal));
    }

    #[test]
    fn rejects_score_above_total() {
        assert_eq!(
            QuizResult::new(11, 10),
            Err(QuizError::ScoreAboveTotal {
                score: 11,
                total: 10
            })
        );
    }

    #[test]
    fn handles_large_totals_without_overflow() {
        let result = QuizResult::new(u32::MAX, u32::MAX).unwrap();
        assert_eq!(result.percent(), 100);
    }

    #[test]
    fn deserializes_consistent_result() {
        let result: QuizResult =
            serde_json::from_str(r#"{"score":2,"total":3,"percent":67}"#).unwrap();
        assert_eq!(result, QuizResult::new(2, 3).unwrap());
    }

    #[test]
    fn deserialize_rejects_zero_total() {
        let err = serde_json::from_str::<QuizResult>(r#"{"score":9,"total":0,"percent":250}"#)
            .unwrap_err();
        assert!(err.to_string().contains("total must be > 0"));
    }

    #[test]
    fn deserialize_rejects_score_above_total() {
        assert!(
            serde_json::from_str::<QuizResult>(r#"{"score":6,"total":5,"percent":100}"#).is_err()
        );
    }

    #[test]
    fn deserialize_rejects_mismatched_percent() {
        let err = serde_json::from_str::<QuizResult>(r#"{"score":1,"total":2,"percent":90}"#)
            .unwrap_err();
        assert!(err.to_string().contains("stored quiz percent 90"));
    }
}
