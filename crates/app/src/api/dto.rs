//! JSON request and response bodies.
//!
//! Field names are camelCase to match what browser clients send and read.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    BankName, ChapterKey, ChapterStats, GradedAnswer, QuestionId, SessionId, SessionRecord,
    StatisticsState, SubmittedAnswer,
};
use services::Submission;

use super::error::ApiError;

//
// ─── REQUESTS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub question_id: String,
    #[serde(alias = "chosenValue")]
    pub answer: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub answers: Vec<AnswerInput>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub chapter: Option<String>,
    #[serde(default, alias = "timeSpentSecs")]
    pub time_spent: Option<u32>,
}

impl SubmitQuizRequest {
    /// Convert into a service submission. Blank session ids and chapters are
    /// treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` if an answer has a blank question id.
    pub fn into_submission(self) -> Result<Submission, ApiError> {
        let answers = self
            .answers
            .into_iter()
            .map(|input| {
                let id: QuestionId = input
                    .question_id
                    .parse()
                    .map_err(|err| ApiError::InvalidInput(format!("questionId: {err}")))?;
                Ok(SubmittedAnswer::new(id, input.answer))
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        let mut submission = Submission::new(answers);
        if let Some(id) = self.session_id.as_deref().and_then(|raw| raw.parse::<SessionId>().ok()) {
            submission = submission.with_session_id(id);
        }
        if let Some(chapter) = parse_chapter(self.chapter.as_deref()) {
            submission = submission.with_chapter(chapter);
        }
        if let Some(secs) = self.time_spent {
            submission = submission.with_time_spent(secs);
        }
        Ok(submission)
    }
}

#[derive(Debug, Deserialize)]
pub struct SwitchDifficultyRequest {
    pub difficulty: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChapterQuery {
    pub chapter: Option<String>,
}

impl ChapterQuery {
    #[must_use]
    pub fn chapter_key(&self) -> Option<ChapterKey> {
        parse_chapter(self.chapter.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionsQuery {
    pub limit: Option<String>,
}

impl SessionsQuery {
    /// Requested limit; anything that is not a positive integer means default.
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|limit| *limit > 0)
    }
}

fn parse_chapter(raw: Option<&str>) -> Option<ChapterKey> {
    raw.and_then(|value| value.parse().ok())
}

//
// ─── RESPONSES ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedAnswerView {
    pub question_id: String,
    pub question: Option<String>,
    pub user_answer: String,
    pub correct_answer: Option<String>,
    pub is_correct: bool,
    pub explanation: Option<String>,
    pub verdict: &'static str,
}

impl From<&GradedAnswer> for GradedAnswerView {
    fn from(answer: &GradedAnswer) -> Self {
        Self {
            question_id: answer.question_id.to_string(),
            question: answer.prompt.clone(),
            user_answer: answer.chosen_value.clone(),
            correct_answer: answer.correct_value.clone(),
            is_correct: answer.is_correct(),
            explanation: answer.explanation.clone(),
            verdict: answer.verdict.as_str(),
        }
    }
}

/// Response to a quiz submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizResponse {
    pub success: bool,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub chapter: Option<String>,
    pub difficulty: BankName,
    pub time_spent: Option<u32>,
    pub score: u32,
    pub correct: u32,
    pub total: u32,
    pub results: Vec<GradedAnswerView>,
}

impl From<&SessionRecord> for SubmitQuizResponse {
    fn from(record: &SessionRecord) -> Self {
        Self {
            success: true,
            session_id: record.session_id().to_string(),
            timestamp: record.timestamp(),
            chapter: record.chapter().map(ToString::to_string),
            difficulty: record.bank(),
            time_spent: record.time_spent_secs(),
            score: record.score_percent(),
            correct: record.correct_answers(),
            total: record.total_questions(),
            results: record.results().iter().map(GradedAnswerView::from).collect(),
        }
    }
}

/// One entry of the recent-sessions list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub chapter: Option<String>,
    pub difficulty: BankName,
    pub time_spent: Option<u32>,
    pub score: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
}

impl From<&SessionRecord> for SessionView {
    fn from(record: &SessionRecord) -> Self {
        Self {
            session_id: record.session_id().to_string(),
            timestamp: record.timestamp(),
            chapter: record.chapter().map(ToString::to_string),
            difficulty: record.bank(),
            time_spent: record.time_spent_secs(),
            score: record.score_percent(),
            correct_answers: record.correct_answers(),
            total_questions: record.total_questions(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChapterStatsView {
    pub attempted: u32,
    pub correct: u32,
    pub accuracy: u32,
}

impl From<ChapterStats> for ChapterStatsView {
    fn from(stats: ChapterStats) -> Self {
        Self {
            attempted: stats.attempted,
            correct: stats.correct,
            accuracy: stats.accuracy_percent(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsView {
    pub total_questions: u32,
    pub correct_answers: u32,
    pub accuracy: u32,
    pub chapters: BTreeMap<String, ChapterStatsView>,
}

impl From<&StatisticsState> for StatisticsView {
    fn from(state: &StatisticsState) -> Self {
        Self {
            total_questions: state.total_questions(),
            correct_answers: state.correct_answers(),
            accuracy: state.accuracy_percent(),
            chapters: state
                .chapters()
                .iter()
                .map(|(key, stats)| (key.to_string(), ChapterStatsView::from(*stats)))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthView {
    pub status: &'static str,
    pub message: &'static str,
    pub question_count: usize,
    pub difficulty: BankName,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> SubmitQuizRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn submission_accepts_client_shape() {
        let submission = request(
            r#"{"answers":[{"questionId":"Q1","answer":"B"}],"sessionId":"session_x","chapter":null}"#,
        )
        .into_submission()
        .unwrap();
        assert_eq!(submission.answers.len(), 1);
        assert_eq!(submission.answers[0].chosen_value, "B");
        assert_eq!(submission.session_id, Some(SessionId::new("session_x")));
        assert_eq!(submission.chapter, None);
    }

    #[test]
    fn chosen_value_alias_and_blank_fields() {
        let submission = request(
            r#"{"answers":[{"questionId":"Q2","chosenValue":"True"}],"sessionId":"  ","chapter":"","timeSpent":30}"#,
        )
        .into_submission()
        .unwrap();
        assert_eq!(submission.answers[0].chosen_value, "True");
        assert_eq!(submission.session_id, None);
        assert_eq!(submission.chapter, None);
        assert_eq!(submission.time_spent_secs, Some(30));
    }

    #[test]
    fn blank_question_id_is_rejected() {
        let err = request(r#"{"answers":[{"questionId":" ","answer":"A"}]}"#)
            .into_submission()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn sessions_limit_parsing() {
        let query = |raw: Option<&str>| SessionsQuery {
            limit: raw.map(str::to_owned),
        };
        assert_eq!(query(Some("5")).limit(), Some(5));
        assert_eq!(query(Some("0")).limit(), None);
        assert_eq!(query(Some("-1")).limit(), None);
        assert_eq!(query(None).limit(), None);
    }
}
