use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::{record_history, required};
use crate::catalog::SlotCatalog;
use crate::errors::{ClinicError, ClinicResult};
use crate::models::{
    appointment::{Appointment, InsertOutcome, NewAppointment},
    history::{HistoryAction, NewHistoryEntry},
};
use crate::store::StoreHandle;

/// Admits or rejects booking requests.
///
/// Gates run in a fixed order and the first failure wins:
///
/// 1. the slot must be in the catalog (`InvalidSlot`)
/// 2. the student must not already hold a booking that day (`DuplicateBooking`)
/// 3. the slot must have room (`SlotFull`)
///
/// Gates 2 and 3 are checked up front for a precise error, and then again by the
/// store inside its atomic insert, so two requests racing for the last place can
/// never both be admitted.
#[derive(Clone)]
pub struct BookingController {
    catalog: Arc<SlotCatalog>,
    store: StoreHandle,
}

impl BookingController {
    pub fn new(catalog: Arc<SlotCatalog>, store: StoreHandle) -> Self {
        Self { catalog, store }
    }

    pub async fn book_slot(
        &self,
        student_id: &str,
        student_name: &str,
        date: NaiveDate,
        time_slot: &str,
    ) -> ClinicResult<Appointment> {
        let student_id = required("student_id", student_id)?;
        let student_name = required("student_name", student_name)?;
        let time_slot = self.catalog.resolve(time_slot)?;
        let capacity = self.catalog.capacity();

        let existing = self
            .store
            .run(
                "find_active_by_student_and_date",
                self.store
                    .inner()
                    .find_active_by_student_and_date(&student_id, date),
            )
            .await?;
        if let Some(existing) = existing {
            debug!(%student_id, %date, existing_slot = %existing.time_slot, "duplicate booking rejected");
            return Err(duplicate(student_id, date));
        }

        let booked = self
            .store
            .run(
                "count_booked",
                self.store.inner().count_booked(date, &time_slot),
            )
            .await?;
        if booked >= capacity {
            debug!(%date, %time_slot, booked, capacity, "slot full");
            return Err(slot_full(date, time_slot.into_inner()));
        }

        let request = NewAppointment {
            student_id: student_id.clone(),
            student_name,
            date,
            time_slot: time_slot.clone(),
        };
        let outcome = self
            .store
            .run(
                "insert_if_available",
                self.store.inner().insert_if_available(request, capacity),
            )
            .await?;

        match outcome {
            InsertOutcome::Inserted(appointment) => {
                info!(
                    appointment_id = %appointment.id,
                    %student_id,
                    %date,
                    %time_slot,
                    "appointment booked"
                );
                Ok(appointment)
            }
            // Lost a race after the pre-checks passed.
            InsertOutcome::Duplicate => Err(duplicate(student_id, date)),
            InsertOutcome::SlotFull => Err(slot_full(date, time_slot.into_inner())),
        }
    }

    /// Removes the booked appointment matching the natural key.
    ///
    /// Returns `false` when nothing matched so callers can tell "already gone"
    /// apart from a store failure.
    pub async fn delete_booking(
        &self,
        student_id: &str,
        date: NaiveDate,
        time_slot: &str,
    ) -> ClinicResult<bool> {
        let student_id = required("student_id", student_id)?;
        let time_slot = self.catalog.resolve(time_slot)?;

        let removed = self
            .store
            .run(
                "delete_by_natural_key",
                self.store
                    .inner()
                    .delete_by_natural_key(&student_id, date, &time_slot),
            )
            .await?;

        match removed {
            Some(appointment) => {
                info!(appointment_id = %appointment.id, %student_id, %date, %time_slot, "appointment deleted");
                record_history(
                    &self.store,
                    NewHistoryEntry::from_appointment(&appointment, HistoryAction::Deleted),
                )
                .await;
                Ok(true)
            }
            None => {
                debug!(%student_id, %date, %time_slot, "no booked appointment to delete");
                Ok(false)
            }
        }
    }
}

fn duplicate(student_id: String, date: NaiveDate) -> ClinicError {
    ClinicError::DuplicateBooking { student_id, date }
}

fn slot_full(date: NaiveDate, time_slot: String) -> ClinicError {
    ClinicError::SlotFull { date, time_slot }
}
