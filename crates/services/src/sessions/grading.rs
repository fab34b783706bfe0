use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::Mutex;

use quiz_core::model::{SessionId, SessionRecord, grade};

use crate::Clock;
use crate::bank_selector::BankSelector;
use crate::error::SubmissionError;
use crate::statistics_service::StatisticsService;

use super::history::SessionLogService;
use super::submission::Submission;

/// Grades submissions against the active bank and records the outcome.
///
/// Submissions are serialized: the session append and the statistics update
/// of one submission complete before the next submission starts, and both
/// are visible to readers before `submit` returns. A failed append leaves the
/// statistics untouched.
#[derive(Clone)]
pub struct GradingService {
    clock: Clock,
    selector: Arc<BankSelector>,
    statistics: Arc<StatisticsService>,
    sessions: Arc<SessionLogService>,
    gate: Arc<Mutex<()>>,
}

impl GradingService {
    #[must_use]
    pub fn new(
        clock: Clock,
        selector: Arc<BankSelector>,
        statistics: Arc<StatisticsService>,
        sessions: Arc<SessionLogService>,
    ) -> Self {
        Self {
            clock,
            selector,
            statistics,
            sessions,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Grade a submission, append the session and update the statistics.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Selector` if the active bank cannot be
    /// resolved, or `SubmissionError::Storage` if recording fails.
    pub async fn submit(&self, submission: Submission) -> Result<SessionRecord, SubmissionError> {
        let Submission {
            session_id,
            chapter,
            time_spent_secs,
            answers,
        } = submission;
        let session_id = session_id.unwrap_or_else(SessionId::generate);

        let _guard = self.gate.lock().await;

        let (bank_name, bank) = self.selector.active_bank()?;
        let result = grade(&bank, &answers);
        let unknown = result.not_found_count();

        let record = SessionRecord::from_grading(
            session_id,
            self.clock.now(),
            chapter,
            bank_name,
            time_spent_secs,
            result,
        );

        // The log append only fails on an unusable store; the counter update
        // can also reject inconsistent counts, so it runs last.
        self.sessions.append(record.clone()).await?;

        let chapter_applied = match self
            .statistics
            .record_submission(
                record.chapter(),
                record.total_questions(),
                record.correct_answers(),
            )
            .await
        {
            Ok(applied) => applied,
            Err(err) => {
                error!(
                    "session {} logged but statistics were not updated: {err}",
                    record.session_id()
                );
                return Err(err.into());
            }
        };

        info!(
            "session {} graded against {} bank: {}/{} ({}%){}",
            record.session_id(),
            bank_name,
            record.correct_answers(),
            record.total_questions(),
            record.score_percent(),
            if chapter_applied { ", chapter stats updated" } else { "" }
        );
        if unknown > 0 {
            warn!(
                "session {}: {unknown} answers named unknown questions",
                record.session_id()
            );
        }

        Ok(record)
    }
}
