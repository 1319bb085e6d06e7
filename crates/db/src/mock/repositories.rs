use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use unimed_core::models::{
    appointment::{Appointment, AppointmentStatus, InsertOutcome, NewAppointment},
    history::{AppointmentHistory, NewHistoryEntry},
    time_slot::TimeSlot,
};
use unimed_core::store::AppointmentStore;
use uuid::Uuid;

// Mock store for exercising callers without a database
mock! {
    pub AppointmentStore {}

    #[async_trait]
    impl AppointmentStore for AppointmentStore {
        async fn count_booked(
            &self,
            date: NaiveDate,
            time_slot: &TimeSlot,
        ) -> eyre::Result<u32>;

        async fn find_active_by_student_and_date(
            &self,
            student_id: &str,
            date: NaiveDate,
        ) -> eyre::Result<Option<Appointment>>;

        async fn insert_if_available(
            &self,
            appointment: NewAppointment,
            capacity: u32,
        ) -> eyre::Result<InsertOutcome>;

        async fn find_by_id(&self, id: Uuid) -> eyre::Result<Option<Appointment>>;

        async fn update_status(
            &self,
            id: Uuid,
            expected: AppointmentStatus,
            status: AppointmentStatus,
        ) -> eyre::Result<Option<Appointment>>;

        async fn delete_by_natural_key(
            &self,
            student_id: &str,
            date: NaiveDate,
            time_slot: &TimeSlot,
        ) -> eyre::Result<Option<Appointment>>;

        async fn find_by_student(&self, student_id: &str) -> eyre::Result<Vec<Appointment>>;

        async fn find_by_date(&self, date: NaiveDate) -> eyre::Result<Vec<Appointment>>;

        async fn record_history(
            &self,
            entry: NewHistoryEntry,
        ) -> eyre::Result<AppointmentHistory>;

        async fn history_by_student(
            &self,
            student_id: &str,
        ) -> eyre::Result<Vec<AppointmentHistory>>;
    }
}
