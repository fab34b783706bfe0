use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use serde::Serialize;
use thiserror::Error;

use services::{SelectorError, SubmissionError};
use storage::repository::StorageError;

/// Reason code carried in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    NotFound,
    Internal,
}

/// Errors returned by request handlers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    code: ErrorCode,
    error: String,
}

impl ApiError {
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::InvalidInput(_) => ErrorCode::InvalidInput,
            ApiError::NotFound(_) => ErrorCode::NotFound,
            ApiError::Internal(_) => ErrorCode::Internal,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {self}");
        } else {
            warn!("request rejected: {self}");
        }
        let body = ErrorBody {
            success: false,
            code: self.code(),
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<SelectorError> for ApiError {
    fn from(err: SelectorError) -> Self {
        match err {
            SelectorError::UnknownBank(_) => ApiError::InvalidInput(err.to_string()),
            SelectorError::NotLoaded(_) => ApiError::NotFound(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Selector(inner) => inner.into(),
            SubmissionError::Storage(inner) => inner.into(),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::BankName;

    #[test]
    fn selector_errors_map_to_codes() {
        let unknown: SelectorError = "medium".parse::<BankName>().unwrap_err().into();
        assert_eq!(ApiError::from(unknown).code(), ErrorCode::InvalidInput);
        assert_eq!(
            ApiError::from(SelectorError::NotLoaded(BankName::Hard)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(SelectorError::Poisoned).code(),
            ErrorCode::Internal
        );
    }

    #[test]
    fn code_serializes_screaming() {
        let json = serde_json::to_value(ErrorCode::InvalidInput).unwrap();
        assert_eq!(json, "INVALID_INPUT");
    }
}
