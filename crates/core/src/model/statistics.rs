use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::grading::score_percent;
use crate::model::ids::ChapterKey;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatisticsError {
    #[error("correct answers ({correct}) exceed questions ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },
}

/// Attempt counters for a single chapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChapterStats {
    pub attempted: u32,
    pub correct: u32,
}

impl ChapterStats {
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        score_percent(self.correct, self.attempted)
    }
}

/// Process-wide accuracy counters, global and per chapter.
///
/// Counters only grow. `correct_answers <= total_questions` and, per chapter,
/// `correct <= attempted` hold because every update is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticsState {
    total_questions: u32,
    correct_answers: u32,
    chapters: BTreeMap<ChapterKey, ChapterStats>,
}

impl StatisticsState {
    /// Creates empty statistics tracking the given chapters.
    #[must_use]
    pub fn with_chapters(chapters: impl IntoIterator<Item = ChapterKey>) -> Self {
        Self {
            total_questions: 0,
            correct_answers: 0,
            chapters: chapters
                .into_iter()
                .map(|key| (key, ChapterStats::default()))
                .collect(),
        }
    }

    /// Adds one graded submission.
    ///
    /// Returns `true` when a chapter was given and is tracked, i.e. when the
    /// chapter counters were updated too. Unknown chapters only update the
    /// global counters.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError::CorrectExceedsTotal` and leaves the state
    /// untouched if `correct > total`.
    pub fn record(
        &mut self,
        chapter: Option<&ChapterKey>,
        total: u32,
        correct: u32,
    ) -> Result<bool, StatisticsError> {
        if correct > total {
            return Err(StatisticsError::CorrectExceedsTotal { correct, total });
        }

        self.total_questions = self.total_questions.saturating_add(total);
        self.correct_answers = self.correct_answers.saturating_add(correct);

        let Some(stats) = chapter.and_then(|key| self.chapters.get_mut(key)) else {
            return Ok(false);
        };
        stats.attempted = stats.attempted.saturating_add(total);
        stats.correct = stats.correct.saturating_add(correct);
        Ok(true)
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn chapters(&self) -> &BTreeMap<ChapterKey, ChapterStats> {
        &self.chapters
    }

    #[must_use]
    pub fn chapter(&self, key: &ChapterKey) -> Option<ChapterStats> {
        self.chapters.get(key).copied()
    }

    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        score_percent(self.correct_answers, self.total_questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_chapters() -> StatisticsState {
        StatisticsState::with_chapters(["1", "2", "3", "4"].map(ChapterKey::new))
    }

    #[test]
    fn starts_empty_with_seeded_chapters() {
        let stats = four_chapters();
        assert_eq!(stats.total_questions(), 0);
        assert_eq!(stats.correct_answers(), 0);
        assert_eq!(stats.chapters().len(), 4);
        assert_eq!(stats.accuracy_percent(), 0);
    }

    #[test]
    fn known_chapter_updates_both_levels() {
        let mut stats = four_chapters();
        let applied = stats.record(Some(&ChapterKey::new("2")), 5, 3).unwrap();
        assert!(applied);
        assert_eq!(stats.total_questions(), 5);
        assert_eq!(stats.correct_answers(), 3);
        assert_eq!(
            stats.chapter(&ChapterKey::new("2")),
            Some(ChapterStats {
                attempted: 5,
                correct: 3
            })
        );
        assert_eq!(stats.accuracy_percent(), 60);
    }

    #[test]
    fn unknown_chapter_only_updates_global() {
        let mut stats = four_chapters();
        let applied = stats.record(Some(&ChapterKey::new("99")), 4, 4).unwrap();
        assert!(!applied);
        assert_eq!(stats.total_questions(), 4);
        assert!(stats.chapter(&ChapterKey::new("99")).is_none());
        assert!(stats.chapters().values().all(|c| c.attempted == 0));
    }

    #[test]
    fn no_chapter_only_updates_global() {
        let mut stats = four_chapters();
        assert!(!stats.record(None, 2, 1).unwrap());
        assert_eq!(stats.correct_answers(), 1);
    }

    #[test]
    fn rejects_more_correct_than_total() {
        let mut stats = four_chapters();
        let err = stats.record(None, 1, 2).unwrap_err();
        assert_eq!(err, StatisticsError::CorrectExceedsTotal { correct: 2, total: 1 });
        assert_eq!(stats, four_chapters());
    }

    #[test]
    fn chapter_accuracy_guards_zero() {
        assert_eq!(ChapterStats::default().accuracy_percent(), 0);
        let stats = ChapterStats {
            attempted: 3,
            correct: 2,
        };
        assert_eq!(stats.accuracy_percent(), 67);
    }
}
