// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use quiz_attempt_search::{
    AttemptSearchService,
    access::{Caller, Capability, MemoryAccessControl},
    error::AppError,
    filter::CompiledQuery,
    models::{
        attempt::{AttemptRecord, AttemptState},
        context::ContextRecord,
        quiz::Quiz,
        user::UserIdentity,
    },
    store::{AttemptStore, MemoryAttemptStore},
};

pub const QUIZ: i64 = 3;
pub const OTHER_QUIZ: i64 = 4;
pub const ORPHAN_QUIZ: i64 = 5;
pub const DELETING_QUIZ: i64 = 6;
pub const MISSING_QUIZ: i64 = 99_999;

pub const COURSE: i64 = 2;
pub const COURSE_CONTEXT: i64 = 15;
pub const QUIZ_CONTEXT: i64 = 42;

pub const USER_A: i64 = 11;
pub const USER_B: i64 = 12;
pub const INSTRUCTOR: i64 = 20;
pub const STUDENT: i64 = 21;

/// Wraps the in-memory store and counts calls, so tests can assert that
/// rejected requests never reach attempt data.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryAttemptStore,
    pub quiz_lookups: AtomicUsize,
    pub attempt_selects: AtomicUsize,
    pub user_lookups: AtomicUsize,
}

#[async_trait]
impl AttemptStore for CountingStore {
    async fn get_quiz(&self, quiz_id: i64) -> Result<Quiz, AppError> {
        self.quiz_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_quiz(quiz_id).await
    }

    async fn select_attempts(&self, query: &CompiledQuery) -> Result<Vec<AttemptRecord>, AppError> {
        self.attempt_selects.fetch_add(1, Ordering::SeqCst);
        self.inner.select_attempts(query).await
    }

    async fn get_user(&self, user_id: i64) -> Result<UserIdentity, AppError> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_user(user_id).await
    }
}

pub struct Fixture {
    pub now: i64,
    pub store: Arc<CountingStore>,
    pub access: MemoryAccessControl,
    pub service: AttemptSearchService,
}

impl Fixture {
    pub fn instructor(&self) -> Caller {
        Caller::new(INSTRUCTOR, "user")
    }

    pub fn student(&self) -> Caller {
        Caller::new(STUDENT, "user")
    }

    pub fn admin(&self) -> Caller {
        Caller::new(1, "admin")
    }

    pub fn selects(&self) -> usize {
        self.store.attempt_selects.load(Ordering::SeqCst)
    }

    pub fn quiz_lookups(&self) -> usize {
        self.store.quiz_lookups.load(Ordering::SeqCst)
    }
}

pub fn identity(first: &str, last: &str) -> UserIdentity {
    UserIdentity {
        firstname: first.to_string(),
        lastname: last.to_string(),
        email: format!("{}.{}@example.com", first, last).to_lowercase(),
    }
}

pub fn attempt(id: i64, quiz: i64, userid: i64, timefinish: i64) -> AttemptRecord {
    AttemptRecord {
        id,
        quiz,
        userid,
        attempt: 1,
        uniqueid: 1000 + id,
        state: if timefinish > 0 {
            AttemptState::Finished
        } else {
            AttemptState::InProgress
        },
        sumgrades: if timefinish > 0 { Some(7.5) } else { None },
        layout: "1,2,3,0".to_string(),
        currentpage: 0,
        timestart: if timefinish > 0 {
            timefinish - 1800
        } else {
            chrono::Utc::now().timestamp() - 600
        },
        timefinish,
    }
}

fn context(id: i64, path: &str, deletion_in_progress: bool) -> ContextRecord {
    ContextRecord {
        id,
        course_module_id: id + 100,
        course_id: COURSE,
        path: path.to_string(),
        deletion_in_progress,
    }
}

/// Quiz 3 holds two finished attempts (A at now-3600, B at now-7200) and one
/// in-progress attempt by A. Quiz 4 holds a finished attempt by B. The
/// instructor holds the report capability at course level.
pub async fn fixture() -> Fixture {
    let now = chrono::Utc::now().timestamp();
    let store = Arc::new(CountingStore::default());
    let access = MemoryAccessControl::new();

    for (id, name) in [
        (QUIZ, "Roman architecture"),
        (OTHER_QUIZ, "Greek architecture"),
        (ORPHAN_QUIZ, "Detached quiz"),
        (DELETING_QUIZ, "Quiz being deleted"),
    ] {
        store
            .inner
            .insert_quiz(Quiz {
                id,
                course: COURSE,
                name: name.to_string(),
            })
            .await;
    }

    store.inner.insert_user(USER_A, identity("Ada", "Lovelace")).await;
    store.inner.insert_user(USER_B, identity("Grace", "Hopper")).await;
    store.inner.insert_user(INSTRUCTOR, identity("Alan", "Turing")).await;
    store.inner.insert_user(STUDENT, identity("Edsger", "Dijkstra")).await;

    store.inner.insert_attempt(attempt(1, QUIZ, USER_A, now - 3600)).await;
    store.inner.insert_attempt(attempt(2, QUIZ, USER_B, now - 7200)).await;
    store.inner.insert_attempt(attempt(3, QUIZ, USER_A, 0)).await;
    store.inner.insert_attempt(attempt(4, OTHER_QUIZ, USER_B, now - 3600)).await;

    access
        .set_quiz_context(QUIZ, context(QUIZ_CONTEXT, "/1/15/42", false))
        .await;
    access
        .set_quiz_context(OTHER_QUIZ, context(43, "/1/15/43", false))
        .await;
    access
        .set_quiz_context(DELETING_QUIZ, context(44, "/1/15/44", true))
        .await;
    access
        .grant(INSTRUCTOR, COURSE_CONTEXT, Capability::ViewQuizReports)
        .await;

    let service = AttemptSearchService::new(store.clone(), Arc::new(access.clone()));

    Fixture {
        now,
        store,
        access,
        service,
    }
}
