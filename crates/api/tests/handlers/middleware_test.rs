use axum::{body::to_bytes, http::StatusCode};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use unimed_api::middleware::error_handling::{map_error, AppError};
use unimed_core::{errors::ClinicError, models::appointment::AppointmentStatus};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

#[rstest]
#[case(ClinicError::Validation("Invalid input".into()), StatusCode::BAD_REQUEST)]
#[case(ClinicError::InvalidSlot("midnight".into()), StatusCode::BAD_REQUEST)]
#[case(ClinicError::DuplicateBooking { student_id: "s1".into(), date: date() }, StatusCode::CONFLICT)]
#[case(ClinicError::SlotFull { date: date(), time_slot: "9:00 AM - 10:00 AM".into() }, StatusCode::CONFLICT)]
#[case(ClinicError::NotFound("Appointment not found".into()), StatusCode::NOT_FOUND)]
#[case(
    ClinicError::InvalidTransition { from: AppointmentStatus::Cancelled, to: AppointmentStatus::Done },
    StatusCode::CONFLICT
)]
#[case(ClinicError::Store(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
#[tokio::test]
async fn test_error_status_mapping(#[case] error: ClinicError, #[case] expected: StatusCode) {
    // Map the error to a response
    let response = map_error(error);

    // Assert the response has the correct status code
    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_error_body_carries_code_and_message() {
    let response = map_error(ClinicError::SlotFull {
        date: date(),
        time_slot: "9:00 AM - 10:00 AM".into(),
    });

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        body,
        json!({
            "error": "SLOT_FULL",
            "message": "Time slot 9:00 AM - 10:00 AM on 2024-03-01 is full",
        })
    );
}

#[tokio::test]
async fn test_store_error_body_is_generic() {
    let response = map_error(ClinicError::Store(eyre::eyre!(
        "error returned from database: relation \"appointments\" does not exist"
    )));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["error"], "STORE_ERROR");
    assert_eq!(body["message"], "Internal server error");
}

#[test]
fn test_eyre_report_becomes_store_error() {
    let error: AppError = eyre::eyre!("pool timed out").into();

    assert!(matches!(error.0, ClinicError::Store(_)));
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}
