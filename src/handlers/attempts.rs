// src/handlers/attempts.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    access::Caller,
    error::AppError,
    models::{attempt::EnrichedAttempt, request::SearchAttemptsRequest},
    service::AttemptSearchService,
};

/// Searches completed attempts of a quiz.
///
/// * Requires a bearer token; the caller needs `mod/quiz:viewreports` on the quiz.
/// * `quizid` is mandatory; `userid`, `before_timestamp` and `after_timestamp`
///   narrow the result. Timestamp bounds are inclusive.
/// * Attempts still in progress are never returned.
#[utoipa::path(
    post,
    path = "/api/quiz/attempts/search",
    tag = "quiz",
    request_body = SearchAttemptsRequest,
    responses(
        (status = 200, description = "Matching completed attempts", body = [EnrichedAttempt]),
        (status = 400, description = "Malformed key/value lists or missing quizid"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Invalid quiz context or missing capability"),
        (status = 404, description = "Quiz not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn search_attempts(
    State(service): State<AttemptSearchService>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<SearchAttemptsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = service.search(req, &caller).await?;

    Ok(Json(attempts))
}
