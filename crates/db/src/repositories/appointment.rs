use crate::models::DbAppointment;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const APPOINTMENT_COLUMNS: &str =
    "id, student_id, student_name, appointment_date, time_slot, status, created_at, updated_at";

/// Outcome of [`insert_if_available`].
#[derive(Debug)]
pub enum Admission {
    Inserted(DbAppointment),
    SlotFull,
    Duplicate,
}

pub async fn count_booked(
    pool: &Pool<Postgres>,
    date: NaiveDate,
    time_slot: &str,
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM appointments
        WHERE appointment_date = $1 AND time_slot = $2 AND status = 'booked'
        "#,
    )
    .bind(date)
    .bind(time_slot)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

pub async fn find_active_by_student_and_date(
    pool: &Pool<Postgres>,
    student_id: &str,
    date: NaiveDate,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE student_id = $1 AND appointment_date = $2 AND status = 'booked'
        "#
    ))
    .bind(student_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// Admits a booking inside one transaction.
///
/// A transaction-scoped advisory lock keyed on the (date, slot) pair serializes
/// competing admissions for the same slot, so the count and the insert cannot
/// interleave. Same-student races across different slots are caught by the
/// partial unique index on (student_id, appointment_date).
pub async fn insert_if_available(
    pool: &Pool<Postgres>,
    student_id: &str,
    student_name: &str,
    date: NaiveDate,
    time_slot: &str,
    capacity: i64,
) -> Result<Admission> {
    let mut tx = pool.begin().await?;

    let lock_key = format!("{}|{}", date, time_slot);
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(&lock_key)
        .execute(&mut *tx)
        .await?;

    let existing = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM appointments
        WHERE student_id = $1 AND appointment_date = $2 AND status = 'booked'
        "#,
    )
    .bind(student_id)
    .bind(date)
    .fetch_one(&mut *tx)
    .await?;
    if existing > 0 {
        return Ok(Admission::Duplicate);
    }

    let booked = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM appointments
        WHERE appointment_date = $1 AND time_slot = $2 AND status = 'booked'
        "#,
    )
    .bind(date)
    .bind(time_slot)
    .fetch_one(&mut *tx)
    .await?;
    if booked >= capacity {
        tracing::debug!(%date, time_slot, booked, capacity, "slot is full");
        return Ok(Admission::SlotFull);
    }

    let id = Uuid::new_v4();
    let now = Utc::now();
    let inserted = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments (id, student_id, student_name, appointment_date, time_slot, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, 'booked', $6, $6)
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(student_id)
    .bind(student_name)
    .bind(date)
    .bind(time_slot)
    .bind(now)
    .fetch_one(&mut *tx)
    .await;

    let appointment = match inserted {
        Ok(appointment) => appointment,
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
            tracing::debug!(student_id, %date, "concurrent booking for the same day");
            return Ok(Admission::Duplicate);
        }
        Err(err) => return Err(err.into()),
    };

    tx.commit().await?;

    tracing::debug!("Appointment created successfully: id={}", id);
    Ok(Admission::Inserted(appointment))
}

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    tracing::debug!("Getting appointment by id: {}", id);

    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// Compare-and-set on the status column. `None` when the row is missing or no
/// longer has `expected`.
pub async fn update_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    expected: &str,
    status: &str,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET status = $3, updated_at = $4
        WHERE id = $1 AND status = $2
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(expected)
    .bind(status)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn delete_booked(
    pool: &Pool<Postgres>,
    student_id: &str,
    date: NaiveDate,
    time_slot: &str,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        DELETE FROM appointments
        WHERE student_id = $1 AND appointment_date = $2 AND time_slot = $3 AND status = 'booked'
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(student_id)
    .bind(date)
    .bind(time_slot)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn get_appointments_by_student(
    pool: &Pool<Postgres>,
    student_id: &str,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE student_id = $1
        ORDER BY appointment_date ASC, created_at ASC
        "#
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn get_appointments_by_date(
    pool: &Pool<Postgres>,
    date: NaiveDate,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE appointment_date = $1
        ORDER BY created_at ASC
        "#
    ))
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}
