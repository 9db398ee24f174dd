#![allow(clippy::unwrap_used, clippy::expect_used)]

// Repository mutations emit start/end/end_error events tagged with the table.
// The capture buffer is process-wide, so each test filters on its own table
// events and only this binary installs the capture layer.

mod common;

use common::{payroll, setup_session_with_tables};
use staffdb_core::logging_facility::test_capture::init_test_capture;
use staffdb_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_TABLE};
use staffdb_store::model::{Employee, Review};
use staffdb_store::Handle;

#[test]
fn test_save_emits_start_and_end_with_record_id() {
    let capture = init_test_capture();
    let mut session = setup_session_with_tables();

    let department = payroll(&mut session);
    let id = department.id().unwrap().to_string();

    let events: Vec<_> = capture
        .events_for_op("save")
        .into_iter()
        .filter(|e| e.field(FIELD_TABLE) == Some("departments"))
        .collect();
    assert!(events.iter().any(|e| e.event.as_deref() == Some(EVENT_START)));
    assert!(events
        .iter()
        .any(|e| e.event.as_deref() == Some(EVENT_END) && e.field("record_id") == Some(id.as_str())));
}

#[test]
fn test_failed_update_emits_error_event() {
    let capture = init_test_capture();
    let mut session = setup_session_with_tables();
    let review = Handle::new(Review::new(2022, "Never saved", 1));

    session.reviews().update(&review).unwrap_err();

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("update")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_TABLE) == Some("reviews")
            && e.field("err_code") == Some("ERR_NOT_PERSISTED")
    });
    assert!(errors >= 1);
}

#[test]
fn test_constraint_failure_is_logged_with_code() {
    let capture = init_test_capture();
    let mut session = setup_session_with_tables();

    session
        .employees()
        .create(Employee::new("Ghost", "Nobody", 404))
        .unwrap_err();

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("save")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_TABLE) == Some("employees")
            && e.field("err_code") == Some("ERR_CONSTRAINT_VIOLATION")
    });
    assert!(errors >= 1);
}
