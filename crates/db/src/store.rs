use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::Result;
use unimed_core::models::{
    appointment::{Appointment, AppointmentStatus, InsertOutcome, NewAppointment},
    history::{AppointmentHistory, NewHistoryEntry},
    time_slot::TimeSlot,
};
use unimed_core::store::AppointmentStore;
use uuid::Uuid;

use crate::repositories::{
    appointment::{self, Admission},
    history,
};
use crate::DbPool;

/// [`AppointmentStore`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgAppointmentStore {
    pool: DbPool,
}

impl PgAppointmentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn convert_all<T, U>(rows: Vec<T>) -> Result<Vec<U>>
where
    U: TryFrom<T, Error = eyre::Report>,
{
    rows.into_iter().map(U::try_from).collect()
}

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    async fn count_booked(&self, date: NaiveDate, time_slot: &TimeSlot) -> Result<u32> {
        let count = appointment::count_booked(&self.pool, date, time_slot.as_str()).await?;
        Ok(u32::try_from(count)?)
    }

    async fn find_active_by_student_and_date(
        &self,
        student_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Appointment>> {
        appointment::find_active_by_student_and_date(&self.pool, student_id, date)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn insert_if_available(
        &self,
        new: NewAppointment,
        capacity: u32,
    ) -> Result<InsertOutcome> {
        let admission = appointment::insert_if_available(
            &self.pool,
            &new.student_id,
            &new.student_name,
            new.date,
            new.time_slot.as_str(),
            i64::from(capacity),
        )
        .await?;

        Ok(match admission {
            Admission::Inserted(row) => InsertOutcome::Inserted(row.try_into()?),
            Admission::SlotFull => InsertOutcome::SlotFull,
            Admission::Duplicate => InsertOutcome::Duplicate,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>> {
        appointment::get_appointment_by_id(&self.pool, id)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        appointment::update_status(&self.pool, id, expected.as_str(), status.as_str())
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn delete_by_natural_key(
        &self,
        student_id: &str,
        date: NaiveDate,
        time_slot: &TimeSlot,
    ) -> Result<Option<Appointment>> {
        appointment::delete_booked(&self.pool, student_id, date, time_slot.as_str())
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn find_by_student(&self, student_id: &str) -> Result<Vec<Appointment>> {
        convert_all(appointment::get_appointments_by_student(&self.pool, student_id).await?)
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>> {
        convert_all(appointment::get_appointments_by_date(&self.pool, date).await?)
    }

    async fn record_history(&self, entry: NewHistoryEntry) -> Result<AppointmentHistory> {
        let row = history::create_history_entry(
            &self.pool,
            entry.appointment_id,
            &entry.student_id,
            &entry.student_name,
            entry.date,
            entry.time_slot.as_str(),
            entry.action.as_str(),
        )
        .await?;

        row.try_into()
    }

    async fn history_by_student(&self, student_id: &str) -> Result<Vec<AppointmentHistory>> {
        convert_all(history::get_history_by_student(&self.pool, student_id).await?)
    }
}
