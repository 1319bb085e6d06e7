use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ClinicError, ClinicResult};
use crate::models::time_slot::TimeSlot;

/// Canonical wire format for calendar days.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` calendar day. Timestamps are rejected so that every
/// component matches on the same day representation.
pub fn parse_calendar_day(value: &str) -> ClinicResult<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClinicError::Validation("Date is required".to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        ClinicError::Validation(format!(
            "Invalid date '{}': expected format YYYY-MM-DD",
            trimmed
        ))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Booked,
    Done,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "booked",
            AppointmentStatus::Done => "done",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Whether an administrator may move an appointment from `self` to `target`.
    ///
    /// Only `booked` records move. Re-applying the status a record already has is
    /// accepted so repeated bulk requests stay harmless.
    pub fn can_transition_to(&self, target: AppointmentStatus) -> bool {
        match (self, target) {
            (_, AppointmentStatus::Booked) => false,
            (AppointmentStatus::Booked, _) => true,
            (current, target) => *current == target,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ClinicError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "booked" => Ok(AppointmentStatus::Booked),
            "done" => Ok(AppointmentStatus::Done),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(ClinicError::Validation(format!(
                "Invalid status '{}'. Must be one of: booked, done, cancelled",
                value
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub student_id: String,
    /// Name as supplied when the booking was made; not refreshed on profile changes.
    pub student_name: String,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A booking that passed validation and is waiting for the store to admit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub student_id: String,
    pub student_name: String,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
}

/// Result of the store's atomic capacity-and-duplicate guarded insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(Appointment),
    SlotFull,
    Duplicate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub student_id: String,
    pub student_name: String,
    pub date: NaiveDate,
    pub time_slot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAppointmentRequest {
    pub student_id: String,
    pub date: NaiveDate,
    pub time_slot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAppointmentResponse {
    pub deleted: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkStatusRequest {
    pub appointment_ids: Vec<Uuid>,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl From<&ClinicError> for ErrorBody {
    fn from(err: &ClinicError) -> Self {
        Self {
            error: err.code().to_string(),
            message: err.user_message(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkStatusItem {
    pub appointment_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<Appointment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkStatusResponse {
    pub results: Vec<BulkStatusItem>,
}
