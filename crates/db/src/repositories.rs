pub mod appointment;
pub mod history;
