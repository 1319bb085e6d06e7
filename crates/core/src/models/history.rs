use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ClinicError;
use crate::models::{
    appointment::{Appointment, AppointmentStatus},
    time_slot::TimeSlot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Done,
    Cancelled,
    Deleted,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Done => "done",
            HistoryAction::Cancelled => "cancelled",
            HistoryAction::Deleted => "deleted",
        }
    }

    /// History action recorded when an appointment enters `status`.
    pub fn for_status(status: AppointmentStatus) -> Option<Self> {
        match status {
            AppointmentStatus::Booked => None,
            AppointmentStatus::Done => Some(HistoryAction::Done),
            AppointmentStatus::Cancelled => Some(HistoryAction::Cancelled),
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryAction {
    type Err = ClinicError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "done" => Ok(HistoryAction::Done),
            "cancelled" => Ok(HistoryAction::Cancelled),
            "deleted" => Ok(HistoryAction::Deleted),
            other => Err(ClinicError::Validation(format!(
                "Invalid history action '{}'",
                other
            ))),
        }
    }
}

/// Append-only audit record of what happened to an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentHistory {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub student_id: String,
    pub student_name: String,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub action: HistoryAction,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub appointment_id: Uuid,
    pub student_id: String,
    pub student_name: String,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub action: HistoryAction,
}

impl NewHistoryEntry {
    pub fn from_appointment(appointment: &Appointment, action: HistoryAction) -> Self {
        Self {
            appointment_id: appointment.id,
            student_id: appointment.student_id.clone(),
            student_name: appointment.student_name.clone(),
            date: appointment.date,
            time_slot: appointment.time_slot.clone(),
            action,
        }
    }
}
