// src/filter.rs

//! Translates a filter map into a bounded attempt predicate.
//!
//! The compiled predicate always starts with `quiz = ? AND timefinish > ?`,
//! so only completed attempts of a single quiz can ever be selected. Values
//! are carried as bound parameters and never rendered into the SQL text.

use std::fmt;

use crate::models::{attempt::AttemptRecord, request::FilterMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    MissingQuizId,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::MissingQuizId => write!(f, "quizid filter is required"),
        }
    }
}

impl std::error::Error for FilterError {}

/// Recognized filter keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    QuizId,
    UserId,
    BeforeTimestamp,
    AfterTimestamp,
    Unrecognized,
}

impl FilterKey {
    pub const QUIZ_ID: &'static str = "quizid";

    pub fn parse(key: &str) -> Self {
        match key {
            Self::QUIZ_ID => FilterKey::QuizId,
            "userid" => FilterKey::UserId,
            "before_timestamp" => FilterKey::BeforeTimestamp,
            "after_timestamp" => FilterKey::AfterTimestamp,
            _ => FilterKey::Unrecognized,
        }
    }
}

/// Attempt columns a condition may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Quiz,
    UserId,
    TimeFinish,
}

impl Column {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Column::Quiz => "quiz",
            Column::UserId => "userid",
            Column::TimeFinish => "timefinish",
        }
    }

    fn value_of(&self, record: &AttemptRecord) -> i64 {
        match self {
            Column::Quiz => record.quiz,
            Column::UserId => record.userid,
            Column::TimeFinish => record.timefinish,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Gt,
    Le,
    Ge,
}

impl Comparison {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Gt => ">",
            Comparison::Le => "<=",
            Comparison::Ge => ">=",
        }
    }

    fn holds(&self, left: i64, right: i64) -> bool {
        match self {
            Comparison::Eq => left == right,
            Comparison::Gt => left > right,
            Comparison::Le => left <= right,
            Comparison::Ge => left >= right,
        }
    }
}

/// `column <op> value`, with `value` bound as a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub column: Column,
    pub op: Comparison,
    pub value: i64,
}

impl Condition {
    fn new(column: Column, op: Comparison, value: i64) -> Self {
        Self { column, op, value }
    }

    pub fn matches(&self, record: &AttemptRecord) -> bool {
        self.op.holds(self.column.value_of(record), self.value)
    }
}

/// A compiled search: the quiz it is scoped to plus the conjunction of
/// conditions to apply to `quiz_attempts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    quiz_id: i64,
    conditions: Vec<Condition>,
}

impl CompiledQuery {
    pub fn quiz_id(&self) -> i64 {
        self.quiz_id
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Bound parameters in placeholder order.
    pub fn params(&self) -> Vec<i64> {
        self.conditions.iter().map(|c| c.value).collect()
    }

    pub fn matches(&self, record: &AttemptRecord) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}

/// Renders the predicate with `$n` placeholders.
impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(
                f,
                "{} {} ${}",
                condition.column.as_sql(),
                condition.op.as_sql(),
                i + 1
            )?;
        }
        Ok(())
    }
}

/// Compiles the filter map. Pure: no I/O and no authorization.
pub fn compile(filters: &FilterMap) -> Result<CompiledQuery, FilterError> {
    let mut quiz_id = None;
    let mut user_id = None;
    let mut before = None;
    let mut after = None;

    for (key, value) in filters {
        match FilterKey::parse(key) {
            FilterKey::QuizId => quiz_id = Some(*value),
            FilterKey::UserId => user_id = Some(*value),
            FilterKey::BeforeTimestamp => before = Some(*value),
            FilterKey::AfterTimestamp => after = Some(*value),
            FilterKey::Unrecognized => {
                tracing::debug!("Ignoring unrecognized filter key '{}'", key);
            }
        }
    }

    let quiz_id = quiz_id.ok_or(FilterError::MissingQuizId)?;

    let mut conditions = vec![
        Condition::new(Column::Quiz, Comparison::Eq, quiz_id),
        Condition::new(Column::TimeFinish, Comparison::Gt, 0),
    ];
    if let Some(user_id) = user_id {
        conditions.push(Condition::new(Column::UserId, Comparison::Eq, user_id));
    }
    if let Some(before) = before {
        conditions.push(Condition::new(Column::TimeFinish, Comparison::Le, before));
    }
    if let Some(after) = after {
        conditions.push(Condition::new(Column::TimeFinish, Comparison::Ge, after));
    }

    Ok(CompiledQuery {
        quiz_id,
        conditions,
    })
}
