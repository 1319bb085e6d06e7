//! # Appointment Store
//!
//! The persistence seam for the allocation engine. The engine only ever talks to
//! an [`AppointmentStore`]; PostgreSQL and in-memory implementations live behind it.
//!
//! Every call made by the engine goes through a [`StoreHandle`], which bounds it
//! with a timeout and turns failures into [`ClinicError::Store`].

pub mod memory;

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::{eyre, Result};
use uuid::Uuid;

use crate::errors::{ClinicError, ClinicResult};
use crate::models::{
    appointment::{Appointment, AppointmentStatus, InsertOutcome, NewAppointment},
    history::{AppointmentHistory, NewHistoryEntry},
    time_slot::TimeSlot,
};

pub use memory::InMemoryAppointmentStore;

/// Default upper bound for a single store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Number of `booked` appointments on `date` in `time_slot`.
    async fn count_booked(&self, date: NaiveDate, time_slot: &TimeSlot) -> Result<u32>;

    /// The `booked` appointment `student_id` holds on `date`, if any.
    async fn find_active_by_student_and_date(
        &self,
        student_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Appointment>>;

    /// Inserts a `booked` appointment unless the student already holds one that
    /// day or the slot already has `capacity` booked appointments. The checks and
    /// the insert are a single atomic step.
    async fn insert_if_available(
        &self,
        appointment: NewAppointment,
        capacity: u32,
    ) -> Result<InsertOutcome>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>>;

    /// Moves `id` from `expected` to `status`. Returns `None` when `id` is unknown
    /// or no longer has the `expected` status.
    async fn update_status(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>>;

    /// Removes the `booked` appointment matching the natural key and returns it.
    async fn delete_by_natural_key(
        &self,
        student_id: &str,
        date: NaiveDate,
        time_slot: &TimeSlot,
    ) -> Result<Option<Appointment>>;

    /// All appointments of a student ordered by date, then booking time.
    async fn find_by_student(&self, student_id: &str) -> Result<Vec<Appointment>>;

    /// All appointments on `date`, any status, in booking order.
    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>>;

    async fn record_history(&self, entry: NewHistoryEntry) -> Result<AppointmentHistory>;

    /// History of a student, oldest first.
    async fn history_by_student(&self, student_id: &str) -> Result<Vec<AppointmentHistory>>;
}

/// Shared, timeout-bounded access to an [`AppointmentStore`].
#[derive(Clone)]
pub struct StoreHandle {
    store: Arc<dyn AppointmentStore>,
    timeout: Duration,
}

impl StoreHandle {
    pub fn new(store: Arc<dyn AppointmentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn inner(&self) -> &dyn AppointmentStore {
        self.store.as_ref()
    }

    /// Awaits a store future with the configured deadline.
    pub async fn run<T, F>(&self, operation: &'static str, fut: F) -> ClinicResult<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                tracing::error!(operation, error = ?err, "appointment store operation failed");
                Err(ClinicError::Store(
                    err.wrap_err(format!("store operation `{}` failed", operation)),
                ))
            }
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                tracing::error!(operation, timeout_ms, "appointment store operation timed out");
                Err(ClinicError::Store(eyre!(
                    "store operation `{}` timed out after {}ms",
                    operation,
                    timeout_ms
                )))
            }
        }
    }
}
