//! # Unimed Core
//!
//! Domain types and the appointment slot allocation engine for the clinic.
//!
//! - **Models**: appointments, availability views, history entries, time slots
//! - **Catalog**: the ordered daily slots and their capacity
//! - **Store**: the persistence seam and an in-memory implementation
//! - **Engine**: admission, availability and status transitions over a store

pub mod catalog;
pub mod engine;
pub mod errors;
pub mod models;
pub mod store;

pub use catalog::SlotCatalog;
pub use engine::Scheduler;
pub use errors::{ClinicError, ClinicResult};
