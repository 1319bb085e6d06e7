use axum::{extract::State, Json};
use std::sync::Arc;
use unimed_core::models::time_slot::SlotCatalogResponse;

use crate::ApiState;

/// Configured daily slots, in display order, and the per-slot capacity.
#[axum::debug_handler]
pub async fn list_slots(State(state): State<Arc<ApiState>>) -> Json<SlotCatalogResponse> {
    Json(state.scheduler.catalog().to_response())
}
