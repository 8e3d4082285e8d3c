// src/models/quiz.rs

use serde::Serialize;
use sqlx::FromRow;

/// Represents the 'quiz' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quiz {
    pub id: i64,

    /// Course hosting the quiz.
    pub course: i64,

    pub name: String,
}
