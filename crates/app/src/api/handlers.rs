use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use quiz_core::model::{ChapterKey, Question};
use services::{AppServices, BankSummary, Flashcard, MatchingPair};
use storage::bank_file::{MetaRecord, QuestionRecord};

use super::dto::{
    ChapterQuery, HealthView, SessionView, SessionsQuery, StatisticsView, SubmitQuizRequest,
    SubmitQuizResponse, SwitchDifficultyRequest,
};
use super::error::ApiError;

type ApiResult<T> = Result<Json<T>, ApiError>;

fn records(questions: &[Question]) -> Json<Vec<QuestionRecord>> {
    Json(questions.iter().map(QuestionRecord::from_question).collect())
}

// ─── Questions ─────────────────────────────────────────────────────────────────

pub async fn all_questions(State(app): State<AppServices>) -> ApiResult<Vec<QuestionRecord>> {
    Ok(records(&app.selection().all_questions()?))
}

pub async fn questions_by_chapter(
    State(app): State<AppServices>,
    Path(chapter): Path<String>,
) -> ApiResult<Vec<QuestionRecord>> {
    let chapter = ChapterKey::new(chapter.trim());
    Ok(records(&app.selection().by_chapter(&chapter)?))
}

pub async fn questions_by_type(
    State(app): State<AppServices>,
    Path(kind): Path<String>,
) -> ApiResult<Vec<QuestionRecord>> {
    Ok(records(&app.selection().by_type(&kind)?))
}

pub async fn random_questions(State(app): State<AppServices>) -> ApiResult<Vec<QuestionRecord>> {
    Ok(records(&app.selection().random_sample(None)?))
}

pub async fn random_questions_count(
    State(app): State<AppServices>,
    Path(count): Path<String>,
) -> ApiResult<Vec<QuestionRecord>> {
    Ok(records(&app.selection().random_sample(Some(&count))?))
}

pub async fn meta(State(app): State<AppServices>) -> ApiResult<MetaRecord> {
    let bank = app.selection().active_bank()?;
    Ok(Json(MetaRecord::from_meta(bank.meta())))
}

// ─── Quiz sessions ─────────────────────────────────────────────────────────────

pub async fn submit_quiz(
    State(app): State<AppServices>,
    payload: Result<Json<SubmitQuizRequest>, JsonRejection>,
) -> ApiResult<SubmitQuizResponse> {
    let Json(request) = payload?;
    let submission = request.into_submission()?;
    let record = app.grading().submit(submission).await?;
    Ok(Json(SubmitQuizResponse::from(&record)))
}

pub async fn statistics(State(app): State<AppServices>) -> ApiResult<StatisticsView> {
    let state = app.statistics().current_statistics().await?;
    Ok(Json(StatisticsView::from(&state)))
}

pub async fn recent_sessions(
    State(app): State<AppServices>,
    query: Result<Query<SessionsQuery>, QueryRejection>,
) -> ApiResult<Vec<SessionView>> {
    let Query(query) = query?;
    let sessions = app.sessions().recent(query.limit()).await?;
    Ok(Json(sessions.iter().map(SessionView::from).collect()))
}

// ─── Difficulty ────────────────────────────────────────────────────────────────

/// Failed switches answer 400 with the unchanged selection in the body.
pub async fn switch_difficulty(
    State(app): State<AppServices>,
    payload: Result<Json<SwitchDifficultyRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let outcome = app.selector().switch_to(&request.difficulty);
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(outcome)).into_response())
}

pub async fn difficulty(State(app): State<AppServices>) -> ApiResult<BankSummary> {
    Ok(Json(app.selector().current()?))
}

// ─── Study modes ───────────────────────────────────────────────────────────────

pub async fn flashcards(
    State(app): State<AppServices>,
    query: Result<Query<ChapterQuery>, QueryRejection>,
) -> ApiResult<Vec<Flashcard>> {
    let Query(query) = query?;
    Ok(Json(
        app.presentation().flashcards(query.chapter_key().as_ref())?,
    ))
}

pub async fn matching(
    State(app): State<AppServices>,
    query: Result<Query<ChapterQuery>, QueryRejection>,
) -> ApiResult<Vec<MatchingPair>> {
    let Query(query) = query?;
    Ok(Json(
        app.presentation()
            .matching_pairs(query.chapter_key().as_ref())?,
    ))
}

// ─── Misc ──────────────────────────────────────────────────────────────────────

pub async fn health(State(app): State<AppServices>) -> ApiResult<HealthView> {
    let (difficulty, bank) = app.selector().active_bank()?;
    Ok(Json(HealthView {
        status: "OK",
        message: "API is working",
        question_count: bank.len(),
        difficulty,
        timestamp: app.clock().now(),
    }))
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
