use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::tests::common::fake_google::{self, RecordedCall};
use crate::tests::common::fixtures::reservation_json;
use crate::tests::common::test_utils::{create_test_server, source_header, TEST_SOURCE};

/// A reservation moving through the sheet: ids returned by the first call
/// are written back to the row and sent again on the next edit.
#[tokio::test]
async fn test_returned_ids_turn_inserts_into_updates() {
    let google = fake_google::start(fake_google::default_calendars()).await;
    let server = create_test_server(&google);

    let (name, value) = source_header(TEST_SOURCE);
    let first = server
        .post("/")
        .add_header(name, value)
        .json(&json!([reservation_json()]))
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let ids = first.json::<Value>();

    let mut row = reservation_json();
    row["status"] = json!("On Loan");
    row["Return Appointment"] = json!("2024-06-09T10:00:00Z");
    row["CollectCalendarID"] = ids["CollectCalendarID"].clone();
    row["ReturnCalendarID"] = ids["ReturnCalendarID"].clone();
    row["BoxCalID"] = ids["BoxCalID"].clone();

    let (name, value) = source_header(TEST_SOURCE);
    let second = server
        .post("/")
        .add_header(name, value)
        .json(&json!([row]))
        .await;
    assert_eq!(second.status_code(), StatusCode::OK);
    assert_eq!(second.json::<Value>(), ids);

    let calls = google.google.event_calls();
    assert_eq!(calls.len(), 6);

    let updates: Vec<(String, String)> = calls[3..]
        .iter()
        .map(|call| match call {
            RecordedCall::Update {
                calendar_id,
                event_id,
                ..
            } => (calendar_id.clone(), event_id.clone()),
            other => panic!("expected update, got {:?}", other),
        })
        .collect();

    assert_eq!(
        updates,
        vec![
            (
                "central@group.calendar.google.com".to_string(),
                ids["CollectCalendarID"].as_str().unwrap().to_string()
            ),
            (
                "central@group.calendar.google.com".to_string(),
                ids["ReturnCalendarID"].as_str().unwrap().to_string()
            ),
            (
                "thule#1@group.calendar.google.com".to_string(),
                ids["BoxCalID"].as_str().unwrap().to_string()
            ),
        ]
    );

    match &calls[4] {
        RecordedCall::Update { event, .. } => {
            assert_eq!(event.start.date_time.as_deref(), Some("2024-06-09T10:00:00Z"));
            assert!(event.description.contains("Status: On Loan"));
        }
        other => panic!("expected return update, got {:?}", other),
    }
}

/// Nothing is cached between webhook calls.
#[tokio::test]
async fn test_each_call_fetches_fresh_token_and_calendar_list() {
    let google = fake_google::start(fake_google::default_calendars()).await;
    let server = create_test_server(&google);

    for _ in 0..2 {
        let (name, value) = source_header(TEST_SOURCE);
        let response = server
            .post("/")
            .add_header(name, value)
            .json(&json!([reservation_json()]))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    let calls = google.google.calls();
    let tokens = calls
        .iter()
        .filter(|call| matches!(call, RecordedCall::Token { .. }))
        .count();
    let list_pages = calls
        .iter()
        .filter(|call| matches!(call, RecordedCall::ListCalendars { .. }))
        .count();

    assert_eq!(tokens, 2);
    assert_eq!(list_pages, 4);
}
