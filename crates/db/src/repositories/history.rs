use crate::models::DbAppointmentHistory;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_history_entry(
    pool: &Pool<Postgres>,
    appointment_id: Uuid,
    student_id: &str,
    student_name: &str,
    date: NaiveDate,
    time_slot: &str,
    action: &str,
) -> Result<DbAppointmentHistory> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Recording history: id={}, appointment_id={}, action={}",
        id, appointment_id, action
    );

    let entry = sqlx::query_as::<_, DbAppointmentHistory>(
        r#"
        INSERT INTO appointment_history (id, appointment_id, student_id, student_name, appointment_date, time_slot, action, recorded_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, appointment_id, student_id, student_name, appointment_date, time_slot, action, recorded_at
        "#,
    )
    .bind(id)
    .bind(appointment_id)
    .bind(student_id)
    .bind(student_name)
    .bind(date)
    .bind(time_slot)
    .bind(action)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(entry)
}

pub async fn get_history_by_student(
    pool: &Pool<Postgres>,
    student_id: &str,
) -> Result<Vec<DbAppointmentHistory>> {
    let entries = sqlx::query_as::<_, DbAppointmentHistory>(
        r#"
        SELECT id, appointment_id, student_id, student_name, appointment_date, time_slot, action, recorded_at
        FROM appointment_history
        WHERE student_id = $1
        ORDER BY recorded_at ASC
        "#,
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
