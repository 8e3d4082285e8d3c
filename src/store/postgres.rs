// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::AttemptStore;
use crate::{
    error::AppError,
    filter::CompiledQuery,
    models::{attempt::AttemptRecord, quiz::Quiz, user::UserIdentity},
};

/// `AttemptStore` backed by the PostgreSQL schema in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgAttemptStore {
    pool: PgPool,
}

impl PgAttemptStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Builds the attempt SELECT. Every condition value goes through `push_bind`.
pub(crate) fn select_attempts_query(query: &CompiledQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT
            id,
            quiz,
            userid,
            attempt,
            uniqueid,
            state,
            sumgrades::FLOAT8 AS sumgrades,
            layout,
            currentpage,
            timestart,
            timefinish
        FROM quiz_attempts
        WHERE ",
    );

    for (i, condition) in query.conditions().iter().enumerate() {
        if i > 0 {
            builder.push(" AND ");
        }
        builder.push(condition.column.as_sql());
        builder.push(" ");
        builder.push(condition.op.as_sql());
        builder.push(" ");
        builder.push_bind(condition.value);
    }
    builder.push(" ORDER BY id");

    builder
}

#[async_trait]
impl AttemptStore for PgAttemptStore {
    async fn get_quiz(&self, quiz_id: i64) -> Result<Quiz, AppError> {
        sqlx::query_as::<_, Quiz>("SELECT id, course, name FROM quiz WHERE id = $1")
            .bind(quiz_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch quiz {}: {:?}", quiz_id, e);
                AppError::from(e)
            })?
            .ok_or(AppError::QuizNotFound(quiz_id))
    }

    async fn select_attempts(&self, query: &CompiledQuery) -> Result<Vec<AttemptRecord>, AppError> {
        let mut builder = select_attempts_query(query);

        let attempts = builder
            .build_query_as::<AttemptRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to select attempts for quiz {}: {:?}",
                    query.quiz_id(),
                    e
                );
                AppError::from(e)
            })?;

        Ok(attempts)
    }

    async fn get_user(&self, user_id: i64) -> Result<UserIdentity, AppError> {
        sqlx::query_as::<_, UserIdentity>(
            "SELECT firstname, lastname, email FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound(user_id))
    }
}
