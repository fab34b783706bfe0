//! HTTP+JSON surface of the quiz service.

pub mod dto;
mod error;
mod handlers;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use services::AppServices;

pub use error::{ApiError, ErrorCode};

/// Build the router. Every handler reaches the services through `State`.
pub fn router(app: AppServices) -> Router {
    Router::new()
        .route("/api/questions", get(handlers::all_questions))
        .route(
            "/api/questions/chapter/:chapter",
            get(handlers::questions_by_chapter),
        )
        .route("/api/questions/type/:type", get(handlers::questions_by_type))
        .route("/api/questions/random", get(handlers::random_questions))
        .route(
            "/api/questions/random/:count",
            get(handlers::random_questions_count),
        )
        .route("/api/meta", get(handlers::meta))
        .route("/api/statistics", get(handlers::statistics))
        .route("/api/sessions", get(handlers::recent_sessions))
        .route("/api/submit-quiz", post(handlers::submit_quiz))
        .route("/api/switch-difficulty", post(handlers::switch_difficulty))
        .route("/api/difficulty", get(handlers::difficulty))
        .route("/api/flashcards", get(handlers::flashcards))
        .route("/api/matching", get(handlers::matching))
        .route("/api/test", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .with_state(app)
}
