use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

// `:id` is a student ID for GET and an appointment UUID for PATCH; the router
// requires one parameter name per path segment.
pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments",
            post(handlers::appointment::book_appointment)
                .delete(handlers::appointment::delete_appointment),
        )
        .route(
            "/api/appointments/status",
            patch(handlers::appointment::bulk_update_status),
        )
        .route(
            "/api/appointments/:id",
            get(handlers::appointment::list_student_appointments)
                .patch(handlers::appointment::update_status),
        )
        .route(
            "/api/appointments/:id/history",
            get(handlers::appointment::student_history),
        )
}
