use std::sync::Arc;

use quiz_core::model::SessionRecord;
use storage::repository::{SessionLogRepository, StorageError};

/// Number of sessions returned when the caller gives no usable limit.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Append-only history of graded sessions.
///
/// NOTE: the log is unbounded and lives in process memory.
#[derive(Clone)]
pub struct SessionLogService {
    sessions: Arc<dyn SessionLogRepository>,
}

impl SessionLogService {
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionLogRepository>) -> Self {
        Self { sessions }
    }

    /// Append a completed session. Returns the log length afterwards.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store is unavailable.
    pub async fn append(&self, record: SessionRecord) -> Result<usize, StorageError> {
        self.sessions.append_session(record).await
    }

    /// Most recent sessions first. `None` or `Some(0)` uses
    /// [`DEFAULT_RECENT_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store is unavailable.
    pub async fn recent(&self, limit: Option<usize>) -> Result<Vec<SessionRecord>, StorageError> {
        let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_RECENT_LIMIT);
        self.sessions.recent_sessions(limit).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store is unavailable.
    pub async fn len(&self) -> Result<usize, StorageError> {
        self.sessions.session_count().await
    }
}
