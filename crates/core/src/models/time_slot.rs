use std::fmt;

use serde::{Deserialize, Serialize};

/// A named interval on the daily schedule, e.g. `8:00 AM - 9:00 AM`.
///
/// Only values handed out by a [`SlotCatalog`](crate::catalog::SlotCatalog) are
/// admitted by the booking path; the wrapper itself does not validate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSlot(String);

impl TimeSlot {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotCatalogResponse {
    pub time_slots: Vec<TimeSlot>,
    pub capacity: u32,
}
