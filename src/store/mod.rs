// src/store/mod.rs

//! Read access to quizzes, attempts and users.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppError,
    filter::CompiledQuery,
    models::{attempt::AttemptRecord, quiz::Quiz, user::UserIdentity},
};

pub use memory::MemoryAttemptStore;
pub use postgres::PgAttemptStore;

/// Attempt store port. Implementations never write.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    /// Fails with `AppError::QuizNotFound` when no quiz has this id.
    async fn get_quiz(&self, quiz_id: i64) -> Result<Quiz, AppError>;

    /// Attempts satisfying every condition of `query`, by ascending id.
    async fn select_attempts(&self, query: &CompiledQuery) -> Result<Vec<AttemptRecord>, AppError>;

    /// Fails with `AppError::UserNotFound` when no user has this id.
    async fn get_user(&self, user_id: i64) -> Result<UserIdentity, AppError>;
}
