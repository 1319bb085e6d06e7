use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use fake::{faker::name::en::Name, Fake};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use unimed_core::models::appointment::{Appointment, AppointmentStatus, InsertOutcome};
use unimed_db::mock::repositories::MockAppointmentStore;
use uuid::Uuid;

use crate::test_utils::{server_with_store, TestContext, AFTERNOON, MORNING, NINE};

async fn book(server: &TestServer, student_id: &str, date: &str, slot: &str) -> Appointment {
    let response = server
        .post("/api/appointments")
        .json(&json!({
            "student_id": student_id,
            "student_name": format!("Student {}", student_id),
            "date": date,
            "time_slot": slot,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_book_appointment_created() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/appointments")
        .json(&json!({
            "student_id": "2021-00001",
            "student_name": "Juan Dela Cruz",
            "date": "2024-03-01",
            "time_slot": NINE,
        }))
        .await;

    // Assert the appointment was created as booked
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["student_id"], "2021-00001");
    assert_eq!(body["date"], "2024-03-01");
    assert_eq!(body["time_slot"], NINE);
    assert_eq!(body["status"], "booked");
    assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
}

#[rstest]
#[case(json!({ "student_id": "s1", "student_name": "Ana", "date": "2024-03-01", "time_slot": "5:00 PM - 6:00 PM" }), "INVALID_SLOT")]
#[case(json!({ "student_id": "", "student_name": "Ana", "date": "2024-03-01", "time_slot": NINE }), "VALIDATION_ERROR")]
#[case(json!({ "student_id": "s1", "student_name": "Ana", "time_slot": NINE }), "VALIDATION_ERROR")]
#[case(json!({ "student_id": "s1", "student_name": "Ana", "date": "2024-03-01T08:00:00Z", "time_slot": NINE }), "VALIDATION_ERROR")]
#[tokio::test]
async fn test_book_appointment_bad_request(#[case] payload: Value, #[case] code: &str) {
    let ctx = TestContext::new();

    let response = ctx.server.post("/api/appointments").json(&payload).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], code);
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn test_book_appointment_duplicate_conflict() {
    let ctx = TestContext::new();
    book(&ctx.server, "s1", "2024-03-01", NINE).await;

    let response = ctx
        .server
        .post("/api/appointments")
        .json(&json!({
            "student_id": "s1",
            "student_name": "Ana",
            "date": "2024-03-01",
            "time_slot": AFTERNOON,
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"], "DUPLICATE_BOOKING");
    assert_eq!(body["message"], "You already have an appointment on 2024-03-01");
}

#[tokio::test]
async fn test_book_appointment_slot_full() {
    let ctx = TestContext::with_capacity(1);
    book(&ctx.server, "s1", "2024-03-01", NINE).await;

    let response = ctx
        .server
        .post("/api/appointments")
        .json(&json!({
            "student_id": "s2",
            "student_name": "Ben",
            "date": "2024-03-01",
            "time_slot": NINE,
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"], "SLOT_FULL");
}

#[tokio::test]
async fn test_delete_appointment() {
    let ctx = TestContext::new();
    book(&ctx.server, "s1", "2024-03-01", NINE).await;
    let payload = json!({ "student_id": "s1", "date": "2024-03-01", "time_slot": NINE });

    let response = ctx.server.delete("/api/appointments").json(&payload).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["deleted"], true);

    // Second delete reports the miss in the body
    let response = ctx.server.delete("/api/appointments").json(&payload).await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["deleted"], false);
    assert_eq!(body["message"], "Appointment not found");
}

#[tokio::test]
async fn test_delete_appointment_unknown_slot() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .delete("/api/appointments")
        .json(&json!({ "student_id": "s1", "date": "2024-03-01", "time_slot": "midnight" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "INVALID_SLOT");
}

#[tokio::test]
async fn test_update_status() {
    let ctx = TestContext::new();
    let appointment = book(&ctx.server, "s1", "2024-03-01", NINE).await;

    let response = ctx
        .server
        .patch(&format!("/api/appointments/{}", appointment.id))
        .json(&json!({ "status": "done" }))
        .await;

    response.assert_status_ok();
    let updated: Appointment = response.json();
    assert_eq!(updated.id, appointment.id);
    assert_eq!(updated.status, AppointmentStatus::Done);
}

#[tokio::test]
async fn test_update_status_done_after_cancel_is_conflict() {
    let ctx = TestContext::new();
    let appointment = book(&ctx.server, "s1", "2024-03-01", NINE).await;
    let path = format!("/api/appointments/{}", appointment.id);
    ctx.server
        .patch(&path)
        .json(&json!({ "status": "cancelled" }))
        .await
        .assert_status_ok();

    let response = ctx
        .server
        .patch(&path)
        .json(&json!({ "status": "done" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"], "INVALID_TRANSITION");
}

#[rstest]
#[case("not-a-uuid", json!({ "status": "done" }), StatusCode::BAD_REQUEST, "VALIDATION_ERROR")]
#[case("7c9e6679-7425-40de-944b-e07fc1f90ae7", json!({ "status": "done" }), StatusCode::NOT_FOUND, "NOT_FOUND")]
#[case("7c9e6679-7425-40de-944b-e07fc1f90ae7", json!({ "status": "archived" }), StatusCode::BAD_REQUEST, "VALIDATION_ERROR")]
#[tokio::test]
async fn test_update_status_errors(
    #[case] id: &str,
    #[case] payload: Value,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .patch(&format!("/api/appointments/{}", id))
        .json(&payload)
        .await;

    response.assert_status(status);
    let body: Value = response.json();
    assert_eq!(body["error"], code);
}

#[tokio::test]
async fn test_bulk_update_status_reports_each_id() {
    let ctx = TestContext::new();
    let first = book(&ctx.server, "s1", "2024-03-01", NINE).await;
    let second = book(&ctx.server, "s2", "2024-03-01", MORNING).await;
    let missing = Uuid::new_v4();

    let response = ctx
        .server
        .patch("/api/appointments/status")
        .json(&json!({
            "appointment_ids": [first.id, missing, second.id],
            "status": "cancelled",
        }))
        .await;

    // Assert partial failure still returns 200 with per-id results
    response.assert_status_ok();
    let body: Value = response.json();
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0]["appointment_id"], first.id.to_string());
    assert_eq!(results[0]["appointment"]["status"], "cancelled");
    assert!(results[0].get("error").is_none());

    assert_eq!(results[1]["appointment_id"], missing.to_string());
    assert_eq!(results[1]["error"]["error"], "NOT_FOUND");
    assert!(results[1].get("appointment").is_none());

    assert_eq!(results[2]["appointment"]["status"], "cancelled");
}

#[tokio::test]
async fn test_list_student_appointments() {
    let ctx = TestContext::new();
    book(&ctx.server, "s1", "2024-03-05", NINE).await;
    book(&ctx.server, "s1", "2024-03-01", MORNING).await;
    book(&ctx.server, "s2", "2024-03-01", MORNING).await;

    let response = ctx.server.get("/api/appointments/s1").await;

    response.assert_status_ok();
    let appointments: Vec<Appointment> = response.json();
    let dates: Vec<String> = appointments.iter().map(|a| a.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-03-01", "2024-03-05"]);
}

#[tokio::test]
async fn test_list_student_appointments_not_found() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/appointments/nobody").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_student_history() {
    let ctx = TestContext::new();
    let appointment = book(&ctx.server, "s1", "2024-03-01", NINE).await;
    ctx.server
        .patch(&format!("/api/appointments/{}", appointment.id))
        .json(&json!({ "status": "done" }))
        .await
        .assert_status_ok();

    let response = ctx.server.get("/api/appointments/s1/history").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["action"], "done");
    assert_eq!(body[0]["appointment_id"], appointment.id.to_string());

    // Empty history is not an error
    let empty: Value = ctx.server.get("/api/appointments/s2/history").await.json();
    assert_eq!(empty, json!([]));
}

#[tokio::test]
async fn test_reference_scenario_over_http() {
    let ctx = TestContext::new();

    for i in 1..=5 {
        let name: String = Name().fake();
        ctx.server
            .post("/api/appointments")
            .json(&json!({
                "student_id": format!("student-{}", i),
                "student_name": name,
                "date": "2024-03-01",
                "time_slot": NINE,
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let sixth = ctx
        .server
        .post("/api/appointments")
        .json(&json!({
            "student_id": "student-6",
            "student_name": "Sixth",
            "date": "2024-03-01",
            "time_slot": NINE,
        }))
        .await;
    sixth.assert_status(StatusCode::CONFLICT);
    assert_eq!(sixth.json::<Value>()["error"], "SLOT_FULL");

    let availability: Value = ctx
        .server
        .get("/api/availability")
        .add_query_param("date", "2024-03-01")
        .await
        .json();
    let nine = availability
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["time_slot"] == NINE)
        .unwrap();
    assert_eq!(nine["slots_remaining"], 0);
    assert_eq!(nine["is_available"], false);
}

#[rstest]
#[case(InsertOutcome::SlotFull, "SLOT_FULL")]
#[case(InsertOutcome::Duplicate, "DUPLICATE_BOOKING")]
#[tokio::test]
async fn test_book_appointment_lost_race_at_insert(
    #[case] outcome: InsertOutcome,
    #[case] code: &str,
) {
    // Pre-checks pass; the atomic insert then rejects the request
    let mut store = MockAppointmentStore::new();
    store
        .expect_find_active_by_student_and_date()
        .times(1)
        .returning(|_, _| Ok(None));
    store
        .expect_count_booked()
        .times(1)
        .returning(|_, _| Ok(0));
    store
        .expect_insert_if_available()
        .withf(|request, capacity| request.student_id == "s1" && *capacity == 5)
        .times(1)
        .returning(move |_, _| Ok(outcome.clone()));
    store.expect_record_history().never();
    store
        .expect_find_by_student()
        .withf(|student_id| student_id == "s1")
        .returning(|_| Ok(Vec::new()));
    let server = server_with_store(Arc::new(store));

    let response = server
        .post("/api/appointments")
        .json(&json!({
            "student_id": "s1",
            "student_name": "Ana",
            "date": "2024-03-01",
            "time_slot": NINE,
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"], code);

    // Nothing was created for the student
    server
        .get("/api/appointments/s1")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
