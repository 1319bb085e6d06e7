pub mod appointment;
pub mod availability;
pub mod history;
pub mod time_slot;
