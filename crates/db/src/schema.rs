use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY,
            student_id TEXT NOT NULL,
            student_name TEXT NOT NULL,
            appointment_date DATE NOT NULL,
            time_slot TEXT NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'booked',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_status CHECK (status IN ('booked', 'done', 'cancelled'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // At most one booked appointment per student per day
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS uniq_appointments_active_student_day
            ON appointments(student_id, appointment_date)
            WHERE status = 'booked';
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointment_history table; rows outlive deleted appointments
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointment_history (
            id UUID PRIMARY KEY,
            appointment_id UUID NOT NULL,
            student_id TEXT NOT NULL,
            student_name TEXT NOT NULL,
            appointment_date DATE NOT NULL,
            time_slot TEXT NOT NULL,
            action VARCHAR(16) NOT NULL,
            recorded_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_action CHECK (action IN ('done', 'cancelled', 'deleted'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Tables created before identifiers were unbounded; no-op on current ones
    for statement in [
        "ALTER TABLE appointments ALTER COLUMN student_id TYPE TEXT",
        "ALTER TABLE appointments ALTER COLUMN student_name TYPE TEXT",
        "ALTER TABLE appointments ALTER COLUMN time_slot TYPE TEXT",
        "ALTER TABLE appointment_history ALTER COLUMN student_id TYPE TEXT",
        "ALTER TABLE appointment_history ALTER COLUMN student_name TYPE TEXT",
        "ALTER TABLE appointment_history ALTER COLUMN time_slot TYPE TEXT",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    // Create indexes, one statement per query
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_appointments_date_slot ON appointments(appointment_date, time_slot)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_student_id ON appointments(student_id)",
        "CREATE INDEX IF NOT EXISTS idx_appointment_history_student_id ON appointment_history(student_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
