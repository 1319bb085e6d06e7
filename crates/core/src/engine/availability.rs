use std::sync::Arc;

use chrono::NaiveDate;

use crate::catalog::SlotCatalog;
use crate::errors::ClinicResult;
use crate::models::{
    appointment::{Appointment, AppointmentStatus},
    availability::{AvailabilitySlot, BookedStudent},
};
use crate::store::StoreHandle;

/// Read-only per-day view over the store. Safe to poll.
#[derive(Clone)]
pub struct AvailabilityCalculator {
    catalog: Arc<SlotCatalog>,
    store: StoreHandle,
}

impl AvailabilityCalculator {
    pub fn new(catalog: Arc<SlotCatalog>, store: StoreHandle) -> Self {
        Self { catalog, store }
    }

    /// One entry per catalog slot, in catalog order.
    pub async fn compute_availability(&self, date: NaiveDate) -> ClinicResult<Vec<AvailabilitySlot>> {
        // A single read gives every slot the same snapshot of the day.
        let appointments = self
            .store
            .run("find_by_date", self.store.inner().find_by_date(date))
            .await?;

        tracing::debug!(%date, appointments = appointments.len(), "computing availability");
        Ok(summarize(&self.catalog, &appointments))
    }
}

/// Aggregates one day's appointments against the catalog.
///
/// Appointments whose slot is no longer in the catalog are not shown.
pub fn summarize(catalog: &SlotCatalog, appointments: &[Appointment]) -> Vec<AvailabilitySlot> {
    catalog
        .slots_for_day()
        .iter()
        .map(|slot| {
            let in_slot: Vec<&Appointment> = appointments
                .iter()
                .filter(|a| &a.time_slot == slot)
                .collect();
            let booked = in_slot
                .iter()
                .filter(|a| a.status == AppointmentStatus::Booked)
                .count() as u32;
            let slots_remaining = catalog.capacity().saturating_sub(booked);

            AvailabilitySlot {
                time_slot: slot.clone(),
                slots_remaining,
                is_available: slots_remaining > 0,
                booked_students: in_slot
                    .into_iter()
                    .map(|a| BookedStudent {
                        appointment_id: a.id,
                        student_name: a.student_name.clone(),
                        student_id: a.student_id.clone(),
                        status: a.status,
                    })
                    .collect(),
            }
        })
        .collect()
}
