use std::sync::Arc;

use axum::http::StatusCode;
use chrono::NaiveDate;
use mockall::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use unimed_core::{catalog::DEFAULT_TIME_SLOTS, models::availability::AvailabilitySlot};
use unimed_db::mock::repositories::MockAppointmentStore;

use crate::test_utils::{server_with_store, TestContext, NINE};

#[tokio::test]
async fn test_availability_for_empty_day() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/availability")
        .add_query_param("date", "2024-03-01")
        .await;

    // Assert every catalog slot is listed with full capacity
    response.assert_status_ok();
    let slots: Vec<AvailabilitySlot> = response.json();
    let labels: Vec<&str> = slots.iter().map(|s| s.time_slot.as_str()).collect();
    assert_eq!(labels, DEFAULT_TIME_SLOTS);
    assert!(slots.iter().all(|s| s.slots_remaining == 5 && s.is_available));
}

#[tokio::test]
async fn test_availability_lists_booked_students() {
    let ctx = TestContext::new();
    ctx.server
        .post("/api/appointments")
        .json(&json!({
            "student_id": "2021-00001",
            "student_name": "Juan Dela Cruz",
            "date": "2024-03-01",
            "time_slot": NINE,
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx
        .server
        .get("/api/availability")
        .add_query_param("date", "2024-03-01")
        .await;

    let body: Value = response.json();
    let nine = body
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["time_slot"] == NINE)
        .unwrap();
    assert_eq!(nine["slots_remaining"], 4);
    assert_eq!(nine["is_available"], true);
    assert_eq!(nine["booked_students"][0]["student_name"], "Juan Dela Cruz");
    assert_eq!(nine["booked_students"][0]["status"], "booked");
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("03/01/2024"))]
#[case(Some("2024-02-30"))]
#[tokio::test]
async fn test_availability_rejects_bad_dates(#[case] date: Option<&str>) {
    let ctx = TestContext::new();

    let mut request = ctx.server.get("/api/availability");
    if let Some(date) = date {
        request = request.add_query_param("date", date);
    }
    let response = request.await;

    // Assert the response is a validation error
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[test_log::test(tokio::test)]
async fn test_availability_store_failure_is_generic_500() {
    let mut store = MockAppointmentStore::new();
    store
        .expect_find_by_date()
        .with(predicate::eq(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()))
        .times(1)
        .returning(|_| Err(eyre::eyre!("connection refused (os error 111)")));
    let server = server_with_store(Arc::new(store));

    let response = server
        .get("/api/availability")
        .add_query_param("date", "2024-03-01")
        .await;

    // Assert no internal detail reaches the caller
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "error": "STORE_ERROR", "message": "Internal server error" })
    );
}

#[tokio::test]
async fn test_slot_catalog_endpoint() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/slots").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["capacity"], 5);
    assert_eq!(body["time_slots"], json!(DEFAULT_TIME_SLOTS));
}

#[tokio::test]
async fn test_health_and_version() {
    let ctx = TestContext::new();

    ctx.server.get("/health").await.assert_json(&json!({ "status": "ok" }));

    let version: Value = ctx.server.get("/version").await.json();
    assert_eq!(version["name"], "unimed-api");
}
