use std::sync::Arc;

use melody_core::badges::pending_unlocks;
use melody_core::model::{
    BadgeId, Cue, LessonId, LessonOutcome, ProgressDocument, QuizResult, TopicId,
};
use storage::repository::ProgressRepository;

use crate::Clock;
use crate::error::ProgressError;
use crate::sinks::NotificationSink;
use crate::sound_service::SoundService;

const RESET_PROMPT: &str = "Are you sure you want to reset all progress?";

/// Orchestrates lesson completion, quiz results, streak and badges over the
/// single persisted progress document.
///
/// Each operation loads the document, mutates it and saves it in full before
/// any follow-up step runs.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    repo: Arc<dyn ProgressRepository>,
    notifier: Arc<dyn NotificationSink>,
    sounds: Arc<SoundService>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        repo: Arc<dyn ProgressRepository>,
        notifier: Arc<dyn NotificationSink>,
        sounds: Arc<SoundService>,
    ) -> Self {
        Self {
            clock,
            repo,
            notifier,
            sounds,
        }
    }

    /// Write the default document if none is stored yet.
    ///
    /// Returns `true` if a document was created.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the stored document is corrupt or
    /// storage fails.
    pub async fn initialize_if_absent(&self) -> Result<bool, ProgressError> {
        if self.repo.load_document().await?.is_some() {
            return Ok(false);
        }
        self.repo.save_document(&ProgressDocument::new()).await?;
        tracing::info!("initialized empty progress document");
        Ok(true)
    }

    /// Current document, created with defaults if missing.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the stored document is corrupt or
    /// storage fails.
    pub async fn load(&self) -> Result<ProgressDocument, ProgressError> {
        if let Some(doc) = self.repo.load_document().await? {
            return Ok(doc);
        }
        let doc = ProgressDocument::new();
        self.repo.save_document(&doc).await?;
        tracing::info!("initialized empty progress document");
        Ok(doc)
    }

    /// Read-only: a missing document reports `false` and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on storage failures.
    pub async fn is_lesson_completed(&self, id: &LessonId) -> Result<bool, ProgressError> {
        Ok(self
            .repo
            .load_document()
            .await?
            .is_some_and(|doc| doc.is_lesson_completed(id)))
    }

    /// Mark a lesson complete.
    ///
    /// A first completion persists the lesson, advances the streak, unlocks
    /// any newly reached badges and plays the completion cue. Repeating a
    /// completed lesson changes nothing and returns `AlreadyDone`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on storage failures.
    pub async fn complete_lesson(&self, id: LessonId) -> Result<LessonOutcome, ProgressError> {
        let mut doc = self.load().await?;

        if doc.complete_lesson(id.clone()) == LessonOutcome::AlreadyDone {
            tracing::debug!(lesson = %id, "lesson already completed");
            self.notifier.notify("You already completed this lesson.");
            return Ok(LessonOutcome::AlreadyDone);
        }
        self.repo.save_document(&doc).await?;
        tracing::info!(
            lesson = %id,
            completed = doc.completed_lesson_count(),
            "lesson completed"
        );

        self.touch_streak_in(&mut doc).await?;
        self.evaluate_badges_in(&mut doc).await?;
        self.sounds.play_quietly(&Cue::Complete).await;
        self.notifier.notify("Lesson completed!");

        Ok(LessonOutcome::Completed)
    }

    /// Store a quiz result for `topic`, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::InvalidQuiz` if `total` is zero or `score`
    /// exceeds it; nothing is written in that case. Returns
    /// `ProgressError::Storage` on storage failures.
    pub async fn record_quiz_score(
        &self,
        topic: TopicId,
        score: u32,
        total: u32,
    ) -> Result<QuizResult, ProgressError> {
        let result = QuizResult::new(score, total)?;

        let mut doc = self.load().await?;
        doc.record_quiz(topic.clone(), result);
        self.repo.save_document(&doc).await?;
        tracing::info!(
            topic = %topic,
            score,
            total,
            percent = result.percent(),
            "quiz score recorded"
        );

        self.evaluate_badges_in(&mut doc).await?;
        Ok(result)
    }

    /// Count today as an active day.
    ///
    /// Returns `true` if the streak advanced.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on storage failures.
    pub async fn touch_streak(&self) -> Result<bool, ProgressError> {
        let mut doc = self.load().await?;
        self.touch_streak_in(&mut doc).await
    }

    /// Unlock every badge whose threshold is met and that is not yet earned.
    ///
    /// Returns the newly unlocked badges in threshold order.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on storage failures.
    pub async fn evaluate_badges(&self) -> Result<Vec<BadgeId>, ProgressError> {
        let mut doc = self.load().await?;
        self.evaluate_badges_in(&mut doc).await
    }

    /// Delete all progress. The next read starts from an empty document.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on storage failures.
    pub async fn reset_all(&self) -> Result<(), ProgressError> {
        self.repo.clear_document().await?;
        tracing::info!("progress reset");
        Ok(())
    }

    /// Ask the learner to confirm, then reset. Returns whether a reset happened.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` on storage failures.
    pub async fn reset_with_confirmation(&self) -> Result<bool, ProgressError> {
        if !self.notifier.confirm(RESET_PROMPT) {
            tracing::debug!("progress reset declined");
            return Ok(false);
        }
        self.reset_all().await?;
        Ok(true)
    }

    async fn touch_streak_in(&self, doc: &mut ProgressDocument) -> Result<bool, ProgressError> {
        let today = self.clock.today();
        if !doc.streak_mut().touch(&today) {
            return Ok(false);
        }
        self.repo.save_document(doc).await?;
        tracing::debug!(
            current = doc.streak().current(),
            best = doc.streak().best(),
            day = %today,
            "streak advanced"
        );
        Ok(true)
    }

    async fn evaluate_badges_in(
        &self,
        doc: &mut ProgressDocument,
    ) -> Result<Vec<BadgeId>, ProgressError> {
        let today = self.clock.today();
        let mut unlocked = Vec::new();

        for rule in pending_unlocks(doc) {
            if !doc.earn_badge(rule, &today) {
                continue;
            }
            self.repo.save_document(doc).await?;
            tracing::info!(badge = %rule.id, "badge unlocked");
            self.notifier
                .notify(&format!("Badge Unlocked: {}", rule.title));
            unlocked.push(rule.id);
        }

        Ok(unlocked)
    }
}
