use chrono::NaiveDate;
use thiserror::Error;

use crate::models::appointment::AppointmentStatus;

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid time slot: {0}")]
    InvalidSlot(String),

    #[error("You already have an appointment on {date}")]
    DuplicateBooking { student_id: String, date: NaiveDate },

    #[error("Time slot {time_slot} on {date} is full")]
    SlotFull { date: NaiveDate, time_slot: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Cannot change appointment status from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Store error: {0}")]
    Store(#[from] eyre::Report),
}

impl ClinicError {
    /// Stable machine-readable code returned to API callers.
    pub fn code(&self) -> &'static str {
        match self {
            ClinicError::Validation(_) => "VALIDATION_ERROR",
            ClinicError::InvalidSlot(_) => "INVALID_SLOT",
            ClinicError::DuplicateBooking { .. } => "DUPLICATE_BOOKING",
            ClinicError::SlotFull { .. } => "SLOT_FULL",
            ClinicError::NotFound(_) => "NOT_FOUND",
            ClinicError::InvalidTransition { .. } => "INVALID_TRANSITION",
            ClinicError::Store(_) => "STORE_ERROR",
        }
    }

    /// Business outcomes the caller is expected to handle. Everything else is a fault.
    pub fn is_expected(&self) -> bool {
        !matches!(self, ClinicError::Store(_))
    }

    /// Message safe to show to a caller; store failures never leak their cause.
    pub fn user_message(&self) -> String {
        match self {
            ClinicError::Store(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

pub type ClinicResult<T> = Result<T, ClinicError>;
