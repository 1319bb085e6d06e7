//! # Allocation Engine
//!
//! The components that decide what happens to appointments:
//!
//! - [`AvailabilityCalculator`]: per-day remaining capacity and booked students
//! - [`BookingController`]: admission and cancellation-by-deletion
//! - [`StatusManager`]: administrator status changes, single and bulk
//!
//! [`Scheduler`] wires them to one catalog and one store and is what the API holds.

pub mod availability;
pub mod booking;
pub mod status;

use std::{sync::Arc, time::Duration};

use chrono::NaiveDate;
use uuid::Uuid;

pub use availability::AvailabilityCalculator;
pub use booking::BookingController;
pub use status::{BulkStatusOutcome, StatusManager};

use crate::catalog::SlotCatalog;
use crate::errors::{ClinicError, ClinicResult};
use crate::models::{
    appointment::{Appointment, AppointmentStatus},
    availability::AvailabilitySlot,
    history::{AppointmentHistory, NewHistoryEntry},
};
use crate::store::{AppointmentStore, StoreHandle, DEFAULT_STORE_TIMEOUT};

#[derive(Clone)]
pub struct Scheduler {
    catalog: Arc<SlotCatalog>,
    store: StoreHandle,
    availability: AvailabilityCalculator,
    booking: BookingController,
    status: StatusManager,
}

impl Scheduler {
    pub fn new(
        catalog: SlotCatalog,
        store: Arc<dyn AppointmentStore>,
        store_timeout: Duration,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let store = StoreHandle::new(store, store_timeout);

        Self {
            availability: AvailabilityCalculator::new(catalog.clone(), store.clone()),
            booking: BookingController::new(catalog.clone(), store.clone()),
            status: StatusManager::new(store.clone()),
            catalog,
            store,
        }
    }

    /// Reference catalog and default store timeout.
    pub fn with_defaults(store: Arc<dyn AppointmentStore>) -> Self {
        Self::new(SlotCatalog::default(), store, DEFAULT_STORE_TIMEOUT)
    }

    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    pub async fn compute_availability(&self, date: NaiveDate) -> ClinicResult<Vec<AvailabilitySlot>> {
        self.availability.compute_availability(date).await
    }

    pub async fn book_slot(
        &self,
        student_id: &str,
        student_name: &str,
        date: NaiveDate,
        time_slot: &str,
    ) -> ClinicResult<Appointment> {
        self.booking
            .book_slot(student_id, student_name, date, time_slot)
            .await
    }

    pub async fn delete_booking(
        &self,
        student_id: &str,
        date: NaiveDate,
        time_slot: &str,
    ) -> ClinicResult<bool> {
        self.booking.delete_booking(student_id, date, time_slot).await
    }

    pub async fn set_status(&self, id: Uuid, status: AppointmentStatus) -> ClinicResult<Appointment> {
        self.status.set_status(id, status).await
    }

    pub async fn bulk_set_status(
        &self,
        ids: Vec<Uuid>,
        status: AppointmentStatus,
    ) -> Vec<BulkStatusOutcome> {
        self.status.bulk_set_status(ids, status).await
    }

    /// Fails with `NotFound` when the student has no appointments at all.
    pub async fn appointments_for_student(&self, student_id: &str) -> ClinicResult<Vec<Appointment>> {
        let student_id = required("student_id", student_id)?;
        let appointments = self
            .store
            .run(
                "find_by_student",
                self.store.inner().find_by_student(&student_id),
            )
            .await?;

        if appointments.is_empty() {
            return Err(ClinicError::NotFound(format!(
                "No appointments found for student {}",
                student_id
            )));
        }
        Ok(appointments)
    }

    pub async fn history_for_student(&self, student_id: &str) -> ClinicResult<Vec<AppointmentHistory>> {
        let student_id = required("student_id", student_id)?;
        self.store
            .run(
                "history_by_student",
                self.store.inner().history_by_student(&student_id),
            )
            .await
    }
}

/// Appends an audit entry. The change it describes has already been committed,
/// so a failure here is logged and not returned.
pub(crate) async fn record_history(store: &StoreHandle, entry: NewHistoryEntry) {
    let appointment_id = entry.appointment_id;
    let action = entry.action;
    if let Err(err) = store
        .run("record_history", store.inner().record_history(entry))
        .await
    {
        tracing::warn!(%appointment_id, %action, error = %err, "failed to record appointment history");
    }
}

/// Trims a caller-supplied identifier; blank values are a validation error.
/// Every path that takes a student id goes through here so stored and queried
/// ids match.
pub(crate) fn required(field: &str, value: &str) -> ClinicResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClinicError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}
