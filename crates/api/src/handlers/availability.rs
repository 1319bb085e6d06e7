//! # Availability Handlers
//!
//! Per-day view of every catalog slot: how many places remain and who holds
//! the existing appointments. Reads never change state, so clients may poll.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use unimed_core::models::{appointment::parse_calendar_day, availability::AvailabilitySlot};

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for the availability endpoint
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// Calendar day as `YYYY-MM-DD`. Kept as a string so a missing or malformed
    /// value produces the API's own validation error.
    pub date: Option<String>,
}

/// Remaining capacity and booked students for each slot on a day
///
/// # Endpoint
///
/// ```text
/// GET /api/availability?date=2024-03-01
/// ```
///
/// # Errors
///
/// * `ClinicError::Validation` - Missing or malformed date
/// * `ClinicError::Store` - Store failure or timeout
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<AvailabilitySlot>>, AppError> {
    let date = parse_calendar_day(query.date.as_deref().unwrap_or_default())?;

    let availability = state.scheduler.compute_availability(date).await?;

    Ok(Json(availability))
}
