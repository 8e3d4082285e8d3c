// src/store/memory.rs

//! In-memory `AttemptStore`, used by tests and local demos.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::AttemptStore;
use crate::{
    error::AppError,
    filter::CompiledQuery,
    models::{attempt::AttemptRecord, quiz::Quiz, user::UserIdentity},
};

#[derive(Debug, Clone, Default)]
pub struct MemoryAttemptStore {
    quizzes: Arc<RwLock<HashMap<i64, Quiz>>>,
    // Keyed by attempt id so selection comes back in id order.
    attempts: Arc<RwLock<BTreeMap<i64, AttemptRecord>>>,
    users: Arc<RwLock<HashMap<i64, UserIdentity>>>,
}

impl MemoryAttemptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_quiz(&self, quiz: Quiz) {
        self.quizzes.write().await.insert(quiz.id, quiz);
    }

    pub async fn insert_attempt(&self, attempt: AttemptRecord) {
        self.attempts.write().await.insert(attempt.id, attempt);
    }

    pub async fn insert_user(&self, user_id: i64, user: UserIdentity) {
        self.users.write().await.insert(user_id, user);
    }

    pub async fn remove_user(&self, user_id: i64) -> Option<UserIdentity> {
        self.users.write().await.remove(&user_id)
    }
}

#[async_trait]
impl AttemptStore for MemoryAttemptStore {
    async fn get_quiz(&self, quiz_id: i64) -> Result<Quiz, AppError> {
        self.quizzes
            .read()
            .await
            .get(&quiz_id)
            .cloned()
            .ok_or(AppError::QuizNotFound(quiz_id))
    }

    async fn select_attempts(&self, query: &CompiledQuery) -> Result<Vec<AttemptRecord>, AppError> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .values()
            .filter(|attempt| query.matches(attempt))
            .cloned()
            .collect())
    }

    async fn get_user(&self, user_id: i64) -> Result<UserIdentity, AppError> {
        self.users
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or(AppError::UserNotFound(user_id))
    }
}
