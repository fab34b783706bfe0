use async_trait::async_trait;
use quiz_core::model::{ChapterKey, SessionRecord, StatisticsError, StatisticsState};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Statistics(#[from] StatisticsError),
}

/// Repository contract for the accuracy counters.
#[async_trait]
pub trait StatisticsRepository: Send + Sync {
    /// Add one graded submission to the counters.
    ///
    /// Returns whether the chapter counters were updated as well.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Statistics` if the counts are inconsistent, or
    /// `StorageError::Connection` if the backing store is unavailable.
    async fn record_submission(
        &self,
        chapter: Option<&ChapterKey>,
        total: u32,
        correct: u32,
    ) -> Result<bool, StorageError>;

    /// Fetch a copy of the current counters.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backing store is unavailable.
    async fn snapshot(&self) -> Result<StatisticsState, StorageError>;
}

/// Repository contract for the append-only session log.
#[async_trait]
pub trait SessionLogRepository: Send + Sync {
    /// Append a completed session and return the log length afterwards.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backing store is unavailable.
    async fn append_session(&self, record: SessionRecord) -> Result<usize, StorageError>;

    /// The last `limit` sessions, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backing store is unavailable.
    async fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>, StorageError>;

    /// Number of sessions logged so far.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backing store is unavailable.
    async fn session_count(&self) -> Result<usize, StorageError>;
}

/// Process-memory repository. Everything is lost when the process exits.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    statistics: Arc<Mutex<StatisticsState>>,
    sessions: Arc<Mutex<Vec<SessionRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository whose statistics track the given chapters.
    #[must_use]
    pub fn with_chapters(chapters: impl IntoIterator<Item = ChapterKey>) -> Self {
        Self {
            statistics: Arc::new(Mutex::new(StatisticsState::with_chapters(chapters))),
            sessions: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl StatisticsRepository for InMemoryRepository {
    async fn record_submission(
        &self,
        chapter: Option<&ChapterKey>,
        total: u32,
        correct: u32,
    ) -> Result<bool, StorageError> {
        let mut guard = self
            .statistics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let applied = guard.record(chapter, total, correct)?;
        Ok(applied)
    }

    async fn snapshot(&self) -> Result<StatisticsState, StorageError> {
        let guard = self
            .statistics
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl SessionLogRepository for InMemoryRepository {
    async fn append_session(&self, record: SessionRecord) -> Result<usize, StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(record);
        Ok(guard.len())
    }

    async fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }

    async fn session_count(&self) -> Result<usize, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub statistics: Arc<dyn StatisticsRepository>,
    pub sessions: Arc<dyn SessionLogRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(chapters: impl IntoIterator<Item = ChapterKey>) -> Self {
        let repo = InMemoryRepository::with_chapters(chapters);
        let statistics: Arc<dyn StatisticsRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionLogRepository> = Arc::new(repo);
        Self {
            statistics,
            sessions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::{BankName, GradingResult, SessionId};
    use quiz_core::time::fixed_now;

    fn record(n: u32) -> SessionRecord {
        SessionRecord::from_grading(
            SessionId::new(format!("session_{n}")),
            fixed_now() + Duration::seconds(i64::from(n)),
            None,
            BankName::Easy,
            None,
            GradingResult {
                score_percent: 0,
                correct_count: 0,
                total_count: n,
                results: Vec::new(),
            },
        )
    }

    #[tokio::test]
    async fn recent_sessions_are_newest_first() {
        let repo = InMemoryRepository::new();
        for n in 1..=5 {
            repo.append_session(record(n)).await.unwrap();
        }

        let recent = repo.recent_sessions(2).await.unwrap();
        let ids: Vec<_> = recent.iter().map(|r| r.session_id().as_str()).collect();
        assert_eq!(ids, ["session_5", "session_4"]);
        assert_eq!(repo.session_count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn recent_sessions_with_large_limit_returns_all() {
        let repo = InMemoryRepository::new();
        repo.append_session(record(1)).await.unwrap();
        assert_eq!(repo.recent_sessions(50).await.unwrap().len(), 1);
        assert!(InMemoryRepository::new().recent_sessions(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn statistics_are_shared_between_clones() {
        let storage = Storage::in_memory([ChapterKey::new("1")]);
        let applied = storage
            .statistics
            .record_submission(Some(&ChapterKey::new("1")), 3, 2)
            .await
            .unwrap();
        assert!(applied);

        let snapshot = storage.statistics.snapshot().await.unwrap();
        assert_eq!(snapshot.total_questions(), 3);
        assert_eq!(snapshot.chapter(&ChapterKey::new("1")).unwrap().correct, 2);
    }

    #[tokio::test]
    async fn inconsistent_counts_surface_as_error() {
        let repo = InMemoryRepository::new();
        let err = repo.record_submission(None, 1, 5).await.unwrap_err();
        assert!(matches!(err, StorageError::Statistics(_)));
        assert_eq!(repo.snapshot().await.unwrap().total_questions(), 0);
    }
}
