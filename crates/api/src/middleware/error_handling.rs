//! # Error Handling Middleware
//!
//! Maps [`ClinicError`] to HTTP status codes and the JSON error body
//! `{"error": CODE, "message": "..."}`.
//!
//! Business outcomes (validation, duplicate, full slot, unknown id, rejected
//! transition) are returned to the caller as-is and are not logged as faults.
//! Store failures are logged with full context by the store handle and reach
//! the caller only as a generic 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use unimed_core::{errors::ClinicError, models::appointment::ErrorBody};

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use unimed_api::middleware::error_handling::AppError;
/// use unimed_core::errors::ClinicError;
///
/// async fn handler(student_id: String) -> Result<Json<String>, AppError> {
///     if student_id.trim().is_empty() {
///         return Err(AppError(ClinicError::Validation("Student ID is required".into())));
///     }
///     Ok(Json(student_id))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ClinicError);

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            ClinicError::Validation(_) | ClinicError::InvalidSlot(_) => StatusCode::BAD_REQUEST,
            ClinicError::DuplicateBooking { .. }
            | ClinicError::SlotFull { .. }
            | ClinicError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ClinicError::NotFound(_) => StatusCode::NOT_FOUND,
            ClinicError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.0.is_expected() {
            tracing::debug!(code = self.0.code(), %status, "request rejected: {}", self.0);
        } else {
            // Already logged at error level by the store handle
            tracing::debug!(code = self.0.code(), %status, "request failed");
        }

        (status, Json(ErrorBody::from(&self.0))).into_response()
    }
}

impl From<ClinicError> for AppError {
    fn from(err: ClinicError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ClinicError::Store(err))
    }
}

/// Maps a ClinicError straight to an HTTP response
pub fn map_error(err: ClinicError) -> Response {
    AppError(err).into_response()
}
