// tests/search_tests.rs

mod common;

use common::*;
use quiz_attempt_search::{
    access::Caller,
    error::AppError,
    models::{
        attempt::AttemptState,
        request::{FilterMap, SearchAttemptsRequest},
    },
};

fn filters(pairs: &[(&str, i64)]) -> FilterMap {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[tokio::test]
async fn quiz_filter_returns_completed_attempts_only() {
    let fx = fixture().await;

    let results = fx
        .service
        .search_attempts(&filters(&[("quizid", QUIZ)]), &fx.instructor())
        .await
        .unwrap();

    let ids: Vec<i64> = results.iter().map(|r| r.attemptid).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(results.iter().all(|r| r.timing.timefinish > 0));
    assert!(results.iter().all(|r| r.attempt.state == AttemptState::Finished));

    let first = &results[0];
    assert_eq!(first.userid, USER_A);
    assert_eq!(first.user, identity("Ada", "Lovelace"));
    assert_eq!(first.attempt.number, 1);
    assert_eq!(first.attempt.uniqueid, 1001);
    assert_eq!(first.attempt.sumgrades, Some(7.5));
    assert_eq!(first.attempt.layout, "1,2,3,0");
    assert_eq!(first.attempt.currentpage, 0);
    assert_eq!(first.timing.timefinish, fx.now - 3600);
    assert_eq!(first.timing.timestart, fx.now - 5400);
}

#[tokio::test]
async fn user_filter_isolates_one_owner() {
    let fx = fixture().await;

    let results = fx
        .service
        .search_attempts(&filters(&[("quizid", QUIZ), ("userid", USER_A)]), &fx.instructor())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].attemptid, 1);
    assert_eq!(results[0].userid, USER_A);
    assert_eq!(results[0].user.email, "ada.lovelace@example.com");
}

#[tokio::test]
async fn time_bounds_isolate_attempts() {
    let fx = fixture().await;
    let cutoff = fx.now - 5400;

    let before = fx
        .service
        .search_attempts(
            &filters(&[("quizid", QUIZ), ("before_timestamp", cutoff)]),
            &fx.instructor(),
        )
        .await
        .unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].userid, USER_B);
    assert_eq!(before[0].timing.timefinish, fx.now - 7200);

    let after = fx
        .service
        .search_attempts(
            &filters(&[("quizid", QUIZ), ("after_timestamp", cutoff)]),
            &fx.instructor(),
        )
        .await
        .unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].userid, USER_A);
    assert_eq!(after[0].timing.timefinish, fx.now - 3600);
}

#[tokio::test]
async fn closed_window_includes_its_bounds() {
    let fx = fixture().await;

    let results = fx
        .service
        .search_attempts(
            &filters(&[
                ("quizid", QUIZ),
                ("after_timestamp", fx.now - 7200),
                ("before_timestamp", fx.now - 3600),
            ]),
            &fx.instructor(),
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn no_match_is_an_empty_success() {
    let fx = fixture().await;

    let results = fx
        .service
        .search_attempts(&filters(&[("quizid", QUIZ), ("userid", STUDENT)]), &fx.instructor())
        .await
        .unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn unrecognized_keys_are_ignored() {
    let fx = fixture().await;

    let results = fx
        .service
        .search_attempts(&filters(&[("quizid", QUIZ), ("courseid", 777)]), &fx.instructor())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn results_never_leak_other_quizzes() {
    let fx = fixture().await;

    let results = fx
        .service
        .search_attempts(&filters(&[("quizid", QUIZ), ("userid", USER_B)]), &fx.instructor())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].attemptid, 2);
}

#[tokio::test]
async fn missing_quiz_id_is_rejected() {
    let fx = fixture().await;

    let err = fx
        .service
        .search_attempts(&filters(&[("before_timestamp", 1_234_567_890)]), &fx.instructor())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MissingRequiredParameter(_)));
    assert_eq!(fx.quiz_lookups(), 0);
}

#[tokio::test]
async fn unknown_quiz_is_not_found_regardless_of_permission() {
    let fx = fixture().await;

    for caller in [fx.instructor(), fx.student()] {
        let err = fx
            .service
            .search_attempts(&filters(&[("quizid", MISSING_QUIZ)]), &caller)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::QuizNotFound(MISSING_QUIZ)));
    }
    assert_eq!(fx.selects(), 0);
}

#[tokio::test]
async fn caller_without_capability_is_forbidden_before_any_attempt_read() {
    let fx = fixture().await;

    let err = fx
        .service
        .search_attempts(&filters(&[("quizid", QUIZ)]), &fx.student())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(fx.selects(), 0);
}

#[tokio::test]
async fn grant_on_module_context_is_enough() {
    let fx = fixture().await;
    fx.access
        .grant(
            STUDENT,
            QUIZ_CONTEXT,
            quiz_attempt_search::access::Capability::ViewQuizReports,
        )
        .await;

    let results = fx
        .service
        .search_attempts(&filters(&[("quizid", QUIZ)]), &fx.student())
        .await
        .unwrap();
    assert_eq!(results.len(), 2);

    // The grant does not reach a sibling quiz.
    let err = fx
        .service
        .search_attempts(&filters(&[("quizid", OTHER_QUIZ)]), &fx.student())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn prohibit_in_module_context_overrides_course_grant() {
    let fx = fixture().await;
    fx.access
        .prohibit(
            INSTRUCTOR,
            QUIZ_CONTEXT,
            quiz_attempt_search::access::Capability::ViewQuizReports,
        )
        .await;

    let err = fx
        .service
        .search_attempts(&filters(&[("quizid", QUIZ)]), &fx.instructor())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(fx.selects(), 0);

    // The sibling quiz keeps the course-level grant.
    let results = fx
        .service
        .search_attempts(&filters(&[("quizid", OTHER_QUIZ)]), &fx.instructor())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn site_admin_bypasses_capability_check() {
    let fx = fixture().await;

    let results = fx
        .service
        .search_attempts(&filters(&[("quizid", OTHER_QUIZ)]), &fx.admin())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].userid, USER_B);
}

#[tokio::test]
async fn quiz_without_module_context_is_invalid() {
    let fx = fixture().await;

    for quiz in [ORPHAN_QUIZ, DELETING_QUIZ] {
        let err = fx
            .service
            .search_attempts(&filters(&[("quizid", quiz)]), &fx.admin())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidContext(_)));
    }
    assert_eq!(fx.selects(), 0);
}

#[tokio::test]
async fn missing_owner_fails_the_whole_request() {
    let fx = fixture().await;
    fx.store.inner.remove_user(USER_B).await;

    let err = fx
        .service
        .search_attempts(&filters(&[("quizid", QUIZ)]), &fx.instructor())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UserNotFound(USER_B)));
}

#[tokio::test]
async fn each_owner_is_looked_up_once() {
    let fx = fixture().await;
    fx.store
        .inner
        .insert_attempt(attempt(5, QUIZ, USER_A, fx.now - 60))
        .await;

    let results = fx
        .service
        .search_attempts(&filters(&[("quizid", QUIZ)]), &fx.instructor())
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(
        fx.store
            .user_lookups
            .load(std::sync::atomic::Ordering::SeqCst),
        2
    );
}

#[tokio::test]
async fn mismatched_lists_are_malformed_before_store_access() {
    let fx = fixture().await;
    let request = SearchAttemptsRequest {
        key: vec!["quizid".to_string(), "before_timestamp".to_string()],
        value: vec![QUIZ],
    };

    let err = fx.service.search(request, &fx.instructor()).await.unwrap_err();

    assert!(matches!(err, AppError::MalformedRequest(_)));
    assert_eq!(fx.quiz_lookups(), 0);
}

#[tokio::test]
async fn parallel_lists_search_end_to_end() {
    let fx = fixture().await;
    let request = SearchAttemptsRequest::new([
        ("quizid", QUIZ),
        ("before_timestamp", fx.now),
        ("after_timestamp", fx.now - 4000),
    ]);

    let results = fx
        .service
        .search(request, &Caller::new(INSTRUCTOR, "user"))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].attemptid, 1);
}

#[tokio::test]
async fn empty_key_is_ignored() {
    let fx = fixture().await;
    let request = SearchAttemptsRequest::new([("quizid", QUIZ), ("", 1)]);

    let results = fx.service.search(request, &fx.instructor()).await.unwrap();

    let ids: Vec<i64> = results.iter().map(|r| r.attemptid).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn unknown_stored_state_is_returned_unchanged() {
    let fx = fixture().await;
    let mut submitted = attempt(5, QUIZ, USER_B, fx.now - 60);
    submitted.state = AttemptState::Other("submitted".to_string());
    fx.store.inner.insert_attempt(submitted).await;

    let results = fx
        .service
        .search_attempts(&filters(&[("quizid", QUIZ), ("userid", USER_B)]), &fx.instructor())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[1].attemptid, 5);
    assert_eq!(results[1].attempt.state.as_str(), "submitted");
}
