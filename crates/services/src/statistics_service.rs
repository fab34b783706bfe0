use std::sync::Arc;

use quiz_core::model::{ChapterKey, StatisticsState};
use storage::repository::{StatisticsRepository, StorageError};

/// Facade over the accuracy counters.
#[derive(Clone)]
pub struct StatisticsService {
    statistics: Arc<dyn StatisticsRepository>,
}

impl StatisticsService {
    #[must_use]
    pub fn new(statistics: Arc<dyn StatisticsRepository>) -> Self {
        Self { statistics }
    }

    /// Add a graded submission. Unknown chapters only move the global counters.
    ///
    /// Returns whether the chapter counters were updated.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the counts are inconsistent or the store is
    /// unavailable.
    pub async fn record_submission(
        &self,
        chapter: Option<&ChapterKey>,
        total: u32,
        correct: u32,
    ) -> Result<bool, StorageError> {
        self.statistics
            .record_submission(chapter, total, correct)
            .await
    }

    /// Snapshot of the counters; later submissions do not affect it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store is unavailable.
    pub async fn current_statistics(&self) -> Result<StatisticsState, StorageError> {
        self.statistics.snapshot().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn snapshot_is_detached_from_later_updates() {
        let repo = InMemoryRepository::with_chapters([ChapterKey::new("1")]);
        let service = StatisticsService::new(Arc::new(repo));

        service
            .record_submission(Some(&ChapterKey::new("1")), 2, 1)
            .await
            .unwrap();
        let before = service.current_statistics().await.unwrap();

        service.record_submission(None, 3, 3).await.unwrap();
        let after = service.current_statistics().await.unwrap();

        assert_eq!(before.total_questions(), 2);
        assert_eq!(after.total_questions(), 5);
        assert_eq!(after.correct_answers(), 4);
        assert_eq!(after.chapter(&ChapterKey::new("1")).unwrap().attempted, 2);
    }

    #[tokio::test]
    async fn unknown_chapter_does_not_fail() {
        let repo = InMemoryRepository::with_chapters([ChapterKey::new("1")]);
        let service = StatisticsService::new(Arc::new(repo));

        let applied = service
            .record_submission(Some(&ChapterKey::new("7")), 1, 0)
            .await
            .unwrap();
        assert!(!applied);
        assert_eq!(service.current_statistics().await.unwrap().total_questions(), 1);
    }
}
