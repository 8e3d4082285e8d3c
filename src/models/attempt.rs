// src/models/attempt.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::user::UserIdentity;

/// Lifecycle state of a quiz attempt, stored as lowercase text.
///
/// States this service does not know are carried through unchanged in
/// `Other`, so newer stored values never fail a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttemptState {
    InProgress,
    Overdue,
    Finished,
    Abandoned,
    Other(String),
}

impl AttemptState {
    pub fn as_str(&self) -> &str {
        match self {
            AttemptState::InProgress => "inprogress",
            AttemptState::Overdue => "overdue",
            AttemptState::Finished => "finished",
            AttemptState::Abandoned => "abandoned",
            AttemptState::Other(state) => state,
        }
    }
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for AttemptState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "inprogress" => AttemptState::InProgress,
            "overdue" => AttemptState::Overdue,
            "finished" => AttemptState::Finished,
            "abandoned" => AttemptState::Abandoned,
            _ => AttemptState::Other(value),
        }
    }
}

impl From<AttemptState> for String {
    fn from(state: AttemptState) -> Self {
        match state {
            AttemptState::Other(state) => state,
            known => known.as_str().to_string(),
        }
    }
}

/// Represents the 'quiz_attempts' table in the database.
/// Never written by this service.
#[derive(Debug, Clone, FromRow)]
pub struct AttemptRecord {
    pub id: i64,
    pub quiz: i64,
    pub userid: i64,

    /// Sequence number of this attempt for its user (1, 2, ...).
    pub attempt: i64,

    /// Question usage id backing the attempt.
    pub uniqueid: i64,

    #[sqlx(try_from = "String")]
    pub state: AttemptState,

    /// Total marks; NULL until the attempt has been graded.
    pub sumgrades: Option<f64>,

    /// Comma separated slot numbers, `0` marking a page break. Opaque here.
    pub layout: String,

    pub currentpage: i64,

    pub timestart: i64,

    /// Unix timestamp; 0 while the attempt is not completed.
    pub timefinish: i64,
}

impl AttemptRecord {
    pub fn is_completed(&self) -> bool {
        self.timefinish > 0
    }
}

/// Attempt details block of an [`EnrichedAttempt`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttemptDetail {
    /// Attempt number for this user.
    pub number: i64,
    pub uniqueid: i64,
    #[schema(value_type = String, example = "finished")]
    pub state: AttemptState,
    pub sumgrades: Option<f64>,
    /// Question layout of the quiz.
    pub layout: String,
    pub currentpage: i64,
}

/// Timing block of an [`EnrichedAttempt`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttemptTiming {
    pub timestart: i64,
    pub timefinish: i64,
}

/// One search result: an attempt joined with its owner's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EnrichedAttempt {
    pub attemptid: i64,
    pub userid: i64,
    pub user: UserIdentity,
    pub attempt: AttemptDetail,
    pub timing: AttemptTiming,
}

impl EnrichedAttempt {
    pub fn new(record: AttemptRecord, user: UserIdentity) -> Self {
        Self {
            attemptid: record.id,
            userid: record.userid,
            user,
            attempt: AttemptDetail {
                number: record.attempt,
                uniqueid: record.uniqueid,
                state: record.state,
                sumgrades: record.sumgrades,
                layout: record.layout,
                currentpage: record.currentpage,
            },
            timing: AttemptTiming {
                timestart: record.timestart,
                timefinish: record.timefinish,
            },
        }
    }
}
