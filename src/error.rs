// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::{filter::FilterError, models::request::INVALID_KEY_MESSAGE};

/// Global Application Error Enum.
/// Every variant aborts the whole request; none carries a partial result.
#[derive(Debug)]
pub enum AppError {
    // 400: key/value lists of different length, or a key outside the allowed alphabet
    MalformedRequest(String),

    // 400: `quizid` absent from the filter set
    MissingRequiredParameter(String),

    // 404
    QuizNotFound(i64),

    // 403: the quiz's course-module context cannot be resolved
    InvalidContext(String),

    // 403: caller lacks the capability in the quiz context
    Forbidden(String),

    // 500: an attempt references a user that does not exist
    UserNotFound(i64),

    // 401
    AuthError(String),

    // 500
    InternalServerError(String),
}

impl AppError {
    /// Stable machine-readable code sent alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MalformedRequest(_) => "malformed_request",
            AppError::MissingRequiredParameter(_) => "missing_required_parameter",
            AppError::QuizNotFound(_) => "quiz_not_found",
            AppError::InvalidContext(_) => "invalid_context",
            AppError::Forbidden(_) => "forbidden",
            AppError::UserNotFound(_) => "user_not_found",
            AppError::AuthError(_) => "unauthorized",
            AppError::InternalServerError(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedRequest(_) | AppError::MissingRequiredParameter(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::QuizNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidContext(_) | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::UserNotFound(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Converts the error into a JSON response with appropriate HTTP status code.
///
/// Data-integrity and internal failures are logged in full and answered with a
/// generic message, so no other user's identity or database detail leaks out.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let error_message = match self {
            AppError::UserNotFound(user_id) => {
                tracing::error!("Attempt references missing user {}", user_id);
                "Attempt owner could not be resolved".to_string()
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                "Internal Server Error".to_string()
            }
            AppError::QuizNotFound(quiz_id) => format!("Quiz {} not found", quiz_id),
            AppError::MalformedRequest(msg)
            | AppError::MissingRequiredParameter(msg)
            | AppError::InvalidContext(msg)
            | AppError::Forbidden(msg)
            | AppError::AuthError(msg) => msg,
        };
        let body = Json(json!({
            "error": error_message,
            "errorcode": code,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<FilterError> for AppError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::MissingQuizId => {
                AppError::MissingRequiredParameter("The quizid parameter is required".to_string())
            }
        }
    }
}

/// Only filter keys are validated, so every validation failure maps to the
/// same fixed message. The validator's own text stays in the debug log.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        tracing::debug!("Rejected filter keys: {}", err);
        AppError::MalformedRequest(INVALID_KEY_MESSAGE.to_string())
    }
}
