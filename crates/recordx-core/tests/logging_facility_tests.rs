#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{sophia, users_store, UserForm};
use recordx_core::errors::{ExErrorKind, RecordXError};
use recordx_core::logging_facility::test_capture::init_test_capture;
use recordx_core::prelude::*;
use recordx_core::{log_op_end, log_op_error, log_op_start, Block};
use recordx_core_types::schema::{
    EVENT_ATTRIBUTED, EVENT_END, EVENT_END_ERROR, EVENT_PHASE, EVENT_START,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, entity_id = "7");

    let events = capture.events();
    let start: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START))
        .collect();
    assert_eq!(start.len(), 1);
    assert_eq!(start[0].field("entity_id"), Some("7"));
    assert!(start[0].component.is_some());
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();
    assert_eq!(end.len(), 1);
    assert_eq!(end[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = RecordXError::MissingAction {
        matcher: "update_record".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let errors: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field("err_kind"), Some("MissingAction"));
    assert_eq!(
        errors[0].field("err_code"),
        Some(ExErrorKind::MissingAction.code())
    );
}

#[test]
fn test_update_assertion_logs_start_end_and_phases() {
    let capture = init_test_capture();
    let store = users_store();
    let user = sophia(&store);

    let verdict = expect_block(|_scope| {
        store
            .update("User", &user.id(), [("age", Value::from(30))])
            .unwrap();
    })
    .to(update_record(&user, Expectation::new().attr("age", 30)))
    .unwrap();

    let assertion_id = verdict.assertion_id().unwrap().to_string();
    let events = capture.events_with("assertion_id", &assertion_id);

    let start = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_START))
        .expect("start event");
    assert_eq!(start.op.as_deref(), Some("update_record"));
    assert_eq!(start.field("entity_type"), Some("User"));
    assert_eq!(start.field("entity_id"), Some("1"));

    let end = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .expect("end event");
    assert_eq!(end.field("passed"), Some("true"));
    assert!(end.field("duration_ms").is_some());

    let phases: Vec<&str> = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_PHASE))
        .filter_map(|e| e.field("phase"))
        .collect();
    assert_eq!(phases, vec!["armed", "executing", "diffing", "verdict"]);
}

#[test]
fn test_failed_verdict_logs_passed_false() {
    let capture = init_test_capture();
    let store = users_store();
    let user = sophia(&store);

    let verdict = expect_block(|_scope| {})
        .to(destroy_record(&user, &store))
        .unwrap();

    let assertion_id = verdict.assertion_id().unwrap().to_string();
    let end: Vec<_> = capture
        .events_with("assertion_id", &assertion_id)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();
    assert_eq!(end.len(), 1);
    assert_eq!(end[0].field("passed"), Some("false"));

    let phases: Vec<String> = capture
        .events_with("assertion_id", &assertion_id)
        .into_iter()
        .filter_map(|e| e.field("phase").map(str::to_string))
        .collect();
    assert!(phases.contains(&"verifying".to_string()));
}

#[test]
fn test_config_error_logs_end_error_with_assertion_id() {
    let capture = init_test_capture();
    let store = users_store();
    let user = sophia(&store);

    let err = Block::missing()
        .to(update_record(&user, Expectation::new().attr("age", 30)))
        .unwrap_err();
    let assertion_id = err.assertion_id().unwrap().to_string();

    let errors: Vec<_> = capture
        .events_with("assertion_id", &assertion_id)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].field("err_code"),
        Some(ExErrorKind::MissingAction.code())
    );
}

#[test]
fn test_attribution_is_logged_per_attribute() {
    let capture = init_test_capture();
    let users = users_store();
    let user = sophia(&users);
    let id = user.id();

    expect_block(|scope| {
        let mut form = scope.intercept(UserForm::new(&users, id.clone()).set("age", 77));
        form.execute().unwrap();
    })
    .to(update_record(&user, Expectation::new().attr("age", 77)).using_delegate::<UserForm>())
    .unwrap();

    let attributed = capture.count_events(|e| {
        e.event.as_deref() == Some(EVENT_ATTRIBUTED)
            && e.field("delegate") == Some("UserForm")
            && e.field("attribute") == Some("age")
    });
    assert!(attributed >= 1);
}
