use chrono::{DateTime, NaiveDate, Utc};
use eyre::{eyre, Report};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use unimed_core::models::{
    appointment::{Appointment, AppointmentStatus},
    history::{AppointmentHistory, HistoryAction},
    time_slot::TimeSlot,
};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub student_id: String,
    pub student_name: String,
    pub appointment_date: NaiveDate,
    pub time_slot: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointmentHistory {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub student_id: String,
    pub student_name: String,
    pub appointment_date: NaiveDate,
    pub time_slot: String,
    pub action: String,
    pub recorded_at: DateTime<Utc>,
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = Report;

    fn try_from(row: DbAppointment) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<AppointmentStatus>()
            .map_err(|e| eyre!("appointment {} has unreadable status: {}", row.id, e))?;

        Ok(Appointment {
            id: row.id,
            student_id: row.student_id,
            student_name: row.student_name,
            date: row.appointment_date,
            time_slot: TimeSlot::new(row.time_slot),
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<DbAppointmentHistory> for AppointmentHistory {
    type Error = Report;

    fn try_from(row: DbAppointmentHistory) -> Result<Self, Self::Error> {
        let action = row
            .action
            .parse::<HistoryAction>()
            .map_err(|e| eyre!("history entry {} has unreadable action: {}", row.id, e))?;

        Ok(AppointmentHistory {
            id: row.id,
            appointment_id: row.appointment_id,
            student_id: row.student_id,
            student_name: row.student_name,
            date: row.appointment_date,
            time_slot: TimeSlot::new(row.time_slot),
            action,
            recorded_at: row.recorded_at,
        })
    }
}
