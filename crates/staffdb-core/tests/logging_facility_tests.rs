#![allow(clippy::unwrap_used, clippy::expect_used)]

use staffdb_core::errors::StaffError;
use staffdb_core::logging_facility::test_capture::init_test_capture;
use staffdb_core::{log_op_end, log_op_error, log_op_start};
use staffdb_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    assert_eq!(starts, 1);
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one end event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = StaffError::NotPersisted {
        table: "reviews".to_string(),
        op: "delete".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10, table = "reviews");

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let event = capture
        .events_for_op(op_name)
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");

    assert_eq!(event.field("err_code"), Some("ERR_NOT_PERSISTED"));
    assert_eq!(event.field("err_kind"), Some("NotPersisted"));
    assert_eq!(event.field("table"), Some("reviews"));
    assert_eq!(event.level, tracing::Level::ERROR);
}

#[test]
fn test_extra_fields_are_captured() {
    let capture = init_test_capture();
    let op_name = "test_log_fields_unique_4";

    log_op_start!(op_name, table = "employees", record_id = 12);

    let events = capture.events_for_op(op_name);
    let start = events.first().expect("Should have start event");
    assert_eq!(start.field("table"), Some("employees"));
    assert_eq!(start.field("record_id"), Some("12"));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_assert_event_exists_fails_for_missing_event() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}
