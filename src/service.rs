// src/service.rs

use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    access::{AccessControl, Caller, Capability},
    error::AppError,
    filter::{self, FilterError, FilterKey},
    models::{
        attempt::EnrichedAttempt,
        context::ModuleContext,
        quiz::Quiz,
        request::{FilterMap, SearchAttemptsRequest},
        user::UserIdentity,
    },
    store::AttemptStore,
};

/// Searches completed quiz attempts on behalf of an authorized caller.
///
/// The quiz must exist and the caller must hold `mod/quiz:viewreports` in its
/// course-module context before any attempt data is read.
#[derive(Clone)]
pub struct AttemptSearchService {
    store: Arc<dyn AttemptStore>,
    access: Arc<dyn AccessControl>,
}

impl AttemptSearchService {
    pub fn new(store: Arc<dyn AttemptStore>, access: Arc<dyn AccessControl>) -> Self {
        Self { store, access }
    }

    /// Entry point for the raw parallel-list request.
    pub async fn search(
        &self,
        request: SearchAttemptsRequest,
        caller: &Caller,
    ) -> Result<Vec<EnrichedAttempt>, AppError> {
        let filters = request.into_filters().inspect_err(|e| {
            tracing::warn!("Rejected malformed search from user {}: {}", caller.user_id, e);
        })?;

        self.search_attempts(&filters, caller).await
    }

    pub async fn search_attempts(
        &self,
        filters: &FilterMap,
        caller: &Caller,
    ) -> Result<Vec<EnrichedAttempt>, AppError> {
        let quiz_id = *filters
            .get(FilterKey::QUIZ_ID)
            .ok_or(FilterError::MissingQuizId)?;

        let quiz = self.store.get_quiz(quiz_id).await?;
        let context = self.resolve_context(&quiz).await?;
        self.require_capability(caller, Capability::ViewQuizReports, &context)
            .await?;

        let query = filter::compile(filters)?;
        tracing::debug!("Selecting attempts of quiz {} where {}", quiz_id, query);

        let attempts = self.store.select_attempts(&query).await?;

        // Several attempts usually share an owner.
        let mut owners: HashMap<i64, UserIdentity> = HashMap::new();
        let mut results = Vec::with_capacity(attempts.len());
        for attempt in attempts {
            let user = match owners.get(&attempt.userid) {
                Some(user) => user.clone(),
                None => {
                    let user = self.store.get_user(attempt.userid).await?;
                    owners.insert(attempt.userid, user.clone());
                    user
                }
            };
            results.push(EnrichedAttempt::new(attempt, user));
        }

        tracing::info!(
            "User {} searched quiz {}: {} attempt(s)",
            caller.user_id,
            quiz_id,
            results.len()
        );

        Ok(results)
    }

    async fn resolve_context(&self, quiz: &Quiz) -> Result<ModuleContext, AppError> {
        let record = self.access.module_context(quiz).await?.ok_or_else(|| {
            tracing::warn!("Quiz {} has no course module context", quiz.id);
            AppError::InvalidContext("Quiz course module not found".to_string())
        })?;

        ModuleContext::try_from(record)
    }

    async fn require_capability(
        &self,
        caller: &Caller,
        capability: Capability,
        context: &ModuleContext,
    ) -> Result<(), AppError> {
        if caller.is_site_admin() {
            return Ok(());
        }

        if self
            .access
            .has_capability(caller.user_id, capability, context)
            .await?
        {
            return Ok(());
        }

        tracing::warn!(
            "User {} lacks {} in context {}",
            caller.user_id,
            capability.as_str(),
            context.id
        );
        Err(AppError::Forbidden(
            "You do not have permission to view quiz reports".to_string(),
        ))
    }
}
