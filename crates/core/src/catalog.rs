use std::collections::HashSet;

use crate::errors::{ClinicError, ClinicResult};
use crate::models::time_slot::{SlotCatalogResponse, TimeSlot};

/// Daily slots offered by the clinic in the reference deployment.
pub const DEFAULT_TIME_SLOTS: [&str; 5] = [
    "8:00 AM - 9:00 AM",
    "9:00 AM - 10:00 AM",
    "1:00 PM - 2:00 PM",
    "2:00 PM - 3:00 PM",
    "3:00 PM - 4:00 PM",
];

/// Maximum `booked` appointments per (date, slot) in the reference deployment.
pub const DEFAULT_SLOT_CAPACITY: u32 = 5;

/// The fixed, ordered set of daily time slots and the per-slot capacity.
///
/// Both availability enumeration and booking validation read from the same
/// catalog, so changing slots or capacity never touches admission logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCatalog {
    slots: Vec<TimeSlot>,
    capacity: u32,
}

impl SlotCatalog {
    pub fn new<I, S>(slots: I, capacity: u32) -> ClinicResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots: Vec<TimeSlot> = slots
            .into_iter()
            .map(|label| {
                let label: String = label.into();
                TimeSlot::new(label.trim())
            })
            .collect();

        if slots.is_empty() {
            return Err(ClinicError::Validation(
                "Slot catalog must contain at least one time slot".to_string(),
            ));
        }
        if slots.iter().any(|slot| slot.as_str().is_empty()) {
            return Err(ClinicError::Validation(
                "Time slot labels cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = slots.iter().find(|slot| !seen.insert(slot.as_str())) {
            return Err(ClinicError::Validation(format!(
                "Duplicate time slot in catalog: {}",
                dup
            )));
        }

        if capacity == 0 {
            return Err(ClinicError::Validation(
                "Slot capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self { slots, capacity })
    }

    /// Slots in display order.
    pub fn slots_for_day(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Maps a caller-supplied label onto a catalog member.
    pub fn resolve(&self, label: &str) -> ClinicResult<TimeSlot> {
        let label = label.trim();
        self.slots
            .iter()
            .find(|slot| slot.as_str() == label)
            .cloned()
            .ok_or_else(|| ClinicError::InvalidSlot(label.to_string()))
    }

    /// Catalog position, used to order per-slot views.
    pub fn position(&self, slot: &TimeSlot) -> Option<usize> {
        self.slots.iter().position(|s| s == slot)
    }

    pub fn to_response(&self) -> SlotCatalogResponse {
        SlotCatalogResponse {
            time_slots: self.slots.clone(),
            capacity: self.capacity,
        }
    }
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self {
            slots: DEFAULT_TIME_SLOTS.iter().map(|s| TimeSlot::new(*s)).collect(),
            capacity: DEFAULT_SLOT_CAPACITY,
        }
    }
}
