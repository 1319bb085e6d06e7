#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use unimed_core::{
    models::{
        appointment::{Appointment, AppointmentStatus, InsertOutcome, NewAppointment},
        history::{AppointmentHistory, NewHistoryEntry},
        time_slot::TimeSlot,
    },
    store::{AppointmentStore, InMemoryAppointmentStore},
    Scheduler, SlotCatalog,
};
use uuid::Uuid;

pub const MORNING: &str = "8:00 AM - 9:00 AM";
pub const NINE: &str = "9:00 AM - 10:00 AM";
pub const AFTERNOON: &str = "1:00 PM - 2:00 PM";

pub fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid test date")
}

/// Scheduler over a fresh in-memory store with the reference catalog.
pub fn scheduler() -> (Scheduler, Arc<InMemoryAppointmentStore>) {
    let store = Arc::new(InMemoryAppointmentStore::new());
    (Scheduler::with_defaults(store.clone()), store)
}

pub fn scheduler_with_capacity(capacity: u32) -> Scheduler {
    let catalog = SlotCatalog::new([MORNING, NINE, AFTERNOON], capacity).unwrap();
    Scheduler::new(
        catalog,
        Arc::new(InMemoryAppointmentStore::new()),
        Duration::from_secs(5),
    )
}

/// Store whose every call hangs for `delay` before delegating.
pub struct SlowStore {
    pub delay: Duration,
    pub inner: InMemoryAppointmentStore,
}

#[async_trait]
impl AppointmentStore for SlowStore {
    async fn count_booked(&self, date: NaiveDate, time_slot: &TimeSlot) -> eyre::Result<u32> {
        tokio::time::sleep(self.delay).await;
        self.inner.count_booked(date, time_slot).await
    }

    async fn find_active_by_student_and_date(
        &self,
        student_id: &str,
        date: NaiveDate,
    ) -> eyre::Result<Option<Appointment>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_active_by_student_and_date(student_id, date).await
    }

    async fn insert_if_available(
        &self,
        appointment: NewAppointment,
        capacity: u32,
    ) -> eyre::Result<InsertOutcome> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert_if_available(appointment, capacity).await
    }

    async fn find_by_id(&self, id: Uuid) -> eyre::Result<Option<Appointment>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_id(id).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
    ) -> eyre::Result<Option<Appointment>> {
        tokio::time::sleep(self.delay).await;
        self.inner.update_status(id, expected, status).await
    }

    async fn delete_by_natural_key(
        &self,
        student_id: &str,
        date: NaiveDate,
        time_slot: &TimeSlot,
    ) -> eyre::Result<Option<Appointment>> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete_by_natural_key(student_id, date, time_slot).await
    }

    async fn find_by_student(&self, student_id: &str) -> eyre::Result<Vec<Appointment>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_student(student_id).await
    }

    async fn find_by_date(&self, date: NaiveDate) -> eyre::Result<Vec<Appointment>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_date(date).await
    }

    async fn record_history(&self, entry: NewHistoryEntry) -> eyre::Result<AppointmentHistory> {
        tokio::time::sleep(self.delay).await;
        self.inner.record_history(entry).await
    }

    async fn history_by_student(&self, student_id: &str) -> eyre::Result<Vec<AppointmentHistory>> {
        tokio::time::sleep(self.delay).await;
        self.inner.history_by_student(student_id).await
    }
}
