use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{appointment::AppointmentStatus, time_slot::TimeSlot};

/// Derived per-slot view for one calendar day. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub time_slot: TimeSlot,
    pub slots_remaining: u32,
    pub is_available: bool,
    /// Every appointment in the slot, whatever its status, in booking order.
    pub booked_students: Vec<BookedStudent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedStudent {
    pub appointment_id: Uuid,
    pub student_name: String,
    pub student_id: String,
    pub status: AppointmentStatus,
}
