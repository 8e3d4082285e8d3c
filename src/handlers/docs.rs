// src/handlers/docs.rs

use axum::{Json, response::IntoResponse};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    handlers::attempts,
    models::{
        attempt::{AttemptDetail, AttemptTiming, EnrichedAttempt},
        request::SearchAttemptsRequest,
        user::UserIdentity,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(attempts::search_attempts),
    components(schemas(
        SearchAttemptsRequest,
        EnrichedAttempt,
        UserIdentity,
        AttemptDetail,
        AttemptTiming
    )),
    modifiers(&BearerAuth),
    tags((name = "quiz", description = "Quiz attempt search"))
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serves the OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
