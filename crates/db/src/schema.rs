use eyre::Result;
use sqlx::{Executor, Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create staff table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS staff (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            duration_minutes INTEGER NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_duration CHECK (duration_minutes IS NULL OR duration_minutes > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create working_hours table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS working_hours (
            staff_id UUID NOT NULL REFERENCES staff(id),
            weekday SMALLINT NOT NULL,
            open_time TIME NOT NULL,
            close_time TIME NOT NULL,
            PRIMARY KEY (staff_id, weekday),
            CONSTRAINT valid_weekday CHECK (weekday BETWEEN 0 AND 6),
            CONSTRAINT valid_hours CHECK (close_time > open_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create staff_leave table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS staff_leave (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            staff_id UUID NOT NULL REFERENCES staff(id),
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            note TEXT NULL,
            CONSTRAINT valid_leave_range CHECK (end_date >= start_date)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            staff_id UUID NOT NULL REFERENCES staff(id),
            booking_date DATE NOT NULL,
            start_time TIME NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'pending',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_status CHECK (status IN ('confirmed', 'pending', 'cancelled', 'completed'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create booking_services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS booking_services (
            booking_id UUID NOT NULL REFERENCES bookings(id) ON DELETE CASCADE,
            service_id UUID NOT NULL REFERENCES services(id),
            PRIMARY KEY (booking_id, service_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Several statements at once need the simple query protocol
    pool.execute(
        r#"
        CREATE INDEX IF NOT EXISTS idx_bookings_staff_date ON bookings(staff_id, booking_date);
        CREATE INDEX IF NOT EXISTS idx_bookings_status ON bookings(status);
        CREATE INDEX IF NOT EXISTS idx_booking_services_booking_id ON booking_services(booking_id);
        CREATE INDEX IF NOT EXISTS idx_staff_leave_staff_dates ON staff_leave(staff_id, start_date, end_date);
        "#,
    )
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
