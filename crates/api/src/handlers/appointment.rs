use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use unimed_core::{
    errors::ClinicError,
    models::{
        appointment::{
            Appointment, BookAppointmentRequest, BulkStatusItem, BulkStatusRequest,
            BulkStatusResponse, DeleteAppointmentRequest, DeleteAppointmentResponse, ErrorBody,
            UpdateStatusRequest,
        },
        history::AppointmentHistory,
    },
};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Unwraps a JSON body, reporting malformed input as a validation error.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError(ClinicError::Validation(rejection.body_text())))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<BookAppointmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let payload = json_body(payload)?;

    let appointment = state
        .scheduler
        .book_slot(
            &payload.student_id,
            &payload.student_name,
            payload.date,
            &payload.time_slot,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Removes a booking by (student_id, date, time_slot). A missing booking is
/// reported in the body with 404, not as an error.
#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<DeleteAppointmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DeleteAppointmentResponse>), AppError> {
    let payload = json_body(payload)?;

    let deleted = state
        .scheduler
        .delete_booking(&payload.student_id, payload.date, &payload.time_slot)
        .await?;

    let response = if deleted {
        (
            StatusCode::OK,
            Json(DeleteAppointmentResponse {
                deleted: true,
                message: "Appointment deleted successfully".to_string(),
            }),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(DeleteAppointmentResponse {
                deleted: false,
                message: "Appointment not found".to_string(),
            }),
        )
    };

    Ok(response)
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Appointment>, AppError> {
    let id = Uuid::parse_str(&id).map_err(|_| {
        AppError(ClinicError::Validation(format!(
            "Invalid appointment ID '{}'",
            id
        )))
    })?;
    let payload = json_body(payload)?;

    let appointment = state.scheduler.set_status(id, payload.status).await?;

    Ok(Json(appointment))
}

/// Applies one status to many appointments. Always 200; each entry carries
/// either the updated appointment or its own error.
#[axum::debug_handler]
pub async fn bulk_update_status(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<BulkStatusRequest>, JsonRejection>,
) -> Result<Json<BulkStatusResponse>, AppError> {
    let payload = json_body(payload)?;

    let outcomes = state
        .scheduler
        .bulk_set_status(payload.appointment_ids, payload.status)
        .await;

    let results = outcomes
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(appointment) => BulkStatusItem {
                appointment_id: outcome.appointment_id,
                appointment: Some(appointment),
                error: None,
            },
            Err(err) => BulkStatusItem {
                appointment_id: outcome.appointment_id,
                appointment: None,
                error: Some(ErrorBody::from(&err)),
            },
        })
        .collect();

    Ok(Json(BulkStatusResponse { results }))
}

#[axum::debug_handler]
pub async fn list_student_appointments(
    State(state): State<Arc<ApiState>>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = state.scheduler.appointments_for_student(&student_id).await?;

    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn student_history(
    State(state): State<Arc<ApiState>>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<AppointmentHistory>>, AppError> {
    let history = state.scheduler.history_for_student(&student_id).await?;

    Ok(Json(history))
}
