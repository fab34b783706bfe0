use chrono::{DateTime, Utc};

use crate::model::bank::BankName;
use crate::model::grading::{GradedAnswer, GradingResult};
use crate::model::ids::{ChapterKey, SessionId};

/// A completed quiz attempt as kept in the session log.
///
/// Records are built once from a grading pass and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    session_id: SessionId,
    timestamp: DateTime<Utc>,
    chapter: Option<ChapterKey>,
    bank: BankName,
    time_spent_secs: Option<u32>,
    total_questions: u32,
    correct_answers: u32,
    score_percent: u32,
    results: Vec<GradedAnswer>,
}

impl SessionRecord {
    #[must_use]
    pub fn from_grading(
        session_id: SessionId,
        timestamp: DateTime<Utc>,
        chapter: Option<ChapterKey>,
        bank: BankName,
        time_spent_secs: Option<u32>,
        grading: GradingResult,
    ) -> Self {
        Self {
            session_id,
            timestamp,
            chapter,
            bank,
            time_spent_secs,
            total_questions: grading.total_count,
            correct_answers: grading.correct_count,
            score_percent: grading.score_percent,
            results: grading.results,
        }
    }

    // Accessors
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn chapter(&self) -> Option<&ChapterKey> {
        self.chapter.as_ref()
    }

    #[must_use]
    pub fn bank(&self) -> BankName {
        self.bank
    }

    #[must_use]
    pub fn time_spent_secs(&self) -> Option<u32> {
        self.time_spent_secs
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
    pub fn score_percent(&self) -> u32 {
        self.score_percent
    }

    #[must_use]
    pub fn results(&self) -> &[GradedAnswer] {
        &self.results
    }
}
