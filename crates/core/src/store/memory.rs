use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::AppointmentStore;
use crate::models::{
    appointment::{Appointment, AppointmentStatus, InsertOutcome, NewAppointment},
    history::{AppointmentHistory, NewHistoryEntry},
    time_slot::TimeSlot,
};

/// Process-local store. Admission holds the write lock across the duplicate
/// check, the capacity check and the insert.
#[derive(Debug, Default)]
pub struct InMemoryAppointmentStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    // Insertion order doubles as booking order.
    appointments: Vec<Appointment>,
    history: Vec<AppointmentHistory>,
}

impl MemoryState {
    fn booked_in_slot(&self, date: NaiveDate, time_slot: &TimeSlot) -> u32 {
        self.appointments
            .iter()
            .filter(|a| {
                a.status == AppointmentStatus::Booked && a.date == date && &a.time_slot == time_slot
            })
            .count() as u32
    }

    fn active_for_student(&self, student_id: &str, date: NaiveDate) -> Option<&Appointment> {
        self.appointments.iter().find(|a| {
            a.status == AppointmentStatus::Booked && a.student_id == student_id && a.date == date
        })
    }
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn count_booked(&self, date: NaiveDate, time_slot: &TimeSlot) -> Result<u32> {
        let state = self.state.read().await;
        Ok(state.booked_in_slot(date, time_slot))
    }

    async fn find_active_by_student_and_date(
        &self,
        student_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Appointment>> {
        let state = self.state.read().await;
        Ok(state.active_for_student(student_id, date).cloned())
    }

    async fn insert_if_available(
        &self,
        appointment: NewAppointment,
        capacity: u32,
    ) -> Result<InsertOutcome> {
        let mut state = self.state.write().await;

        if state
            .active_for_student(&appointment.student_id, appointment.date)
            .is_some()
        {
            return Ok(InsertOutcome::Duplicate);
        }
        if state.booked_in_slot(appointment.date, &appointment.time_slot) >= capacity {
            return Ok(InsertOutcome::SlotFull);
        }

        let now = Utc::now();
        let record = Appointment {
            id: Uuid::new_v4(),
            student_id: appointment.student_id,
            student_name: appointment.student_name,
            date: appointment.date,
            time_slot: appointment.time_slot,
            status: AppointmentStatus::Booked,
            created_at: now,
            updated_at: now,
        };
        state.appointments.push(record.clone());

        Ok(InsertOutcome::Inserted(record))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>> {
        let state = self.state.read().await;
        Ok(state.appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        let mut state = self.state.write().await;
        Ok(state
            .appointments
            .iter_mut()
            .find(|a| a.id == id && a.status == expected)
            .map(|appointment| {
                appointment.status = status;
                appointment.updated_at = Utc::now();
                appointment.clone()
            }))
    }

    async fn delete_by_natural_key(
        &self,
        student_id: &str,
        date: NaiveDate,
        time_slot: &TimeSlot,
    ) -> Result<Option<Appointment>> {
        let mut state = self.state.write().await;
        let position = state.appointments.iter().position(|a| {
            a.status == AppointmentStatus::Booked
                && a.student_id == student_id
                && a.date == date
                && &a.time_slot == time_slot
        });
        Ok(position.map(|idx| state.appointments.remove(idx)))
    }

    async fn find_by_student(&self, student_id: &str) -> Result<Vec<Appointment>> {
        let state = self.state.read().await;
        let mut appointments: Vec<Appointment> = state
            .appointments
            .iter()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect();
        // Stable sort keeps booking order within a day.
        appointments.sort_by_key(|a| a.date);
        Ok(appointments)
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>> {
        let state = self.state.read().await;
        Ok(state
            .appointments
            .iter()
            .filter(|a| a.date == date)
            .cloned()
            .collect())
    }

    async fn record_history(&self, entry: NewHistoryEntry) -> Result<AppointmentHistory> {
        let mut state = self.state.write().await;
        let record = AppointmentHistory {
            id: Uuid::new_v4(),
            appointment_id: entry.appointment_id,
            student_id: entry.student_id,
            student_name: entry.student_name,
            date: entry.date,
            time_slot: entry.time_slot,
            action: entry.action,
            recorded_at: Utc::now(),
        };
        state.history.push(record.clone());
        Ok(record)
    }

    async fn history_by_student(&self, student_id: &str) -> Result<Vec<AppointmentHistory>> {
        let state = self.state.read().await;
        Ok(state
            .history
            .iter()
            .filter(|h| h.student_id == student_id)
            .cloned()
            .collect())
    }
}
