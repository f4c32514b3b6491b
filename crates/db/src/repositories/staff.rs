use crate::models::{DbStaffLeave, DbWorkingHours};
use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn staff_exists(pool: &Pool<Postgres>, staff_id: Uuid) -> Result<bool> {
    tracing::debug!("Checking staff exists: {}", staff_id);

    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (SELECT 1 FROM staff WHERE id = $1)
        "#,
    )
    .bind(staff_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

pub async fn get_working_hours(
    pool: &Pool<Postgres>,
    staff_id: Uuid,
    weekday: i16,
) -> Result<Option<DbWorkingHours>> {
    tracing::debug!("Getting working hours: staff_id={}, weekday={}", staff_id, weekday);

    let hours = sqlx::query_as::<_, DbWorkingHours>(
        r#"
        SELECT staff_id, weekday, open_time, close_time
        FROM working_hours
        WHERE staff_id = $1 AND weekday = $2
        "#,
    )
    .bind(staff_id)
    .bind(weekday)
    .fetch_optional(pool)
    .await?;

    Ok(hours)
}

pub async fn get_leave_covering(
    pool: &Pool<Postgres>,
    staff_id: Uuid,
    date: NaiveDate,
) -> Result<Option<DbStaffLeave>> {
    tracing::debug!("Getting leave: staff_id={}, date={}", staff_id, date);

    let leave = sqlx::query_as::<_, DbStaffLeave>(
        r#"
        SELECT id, staff_id, start_date, end_date, note
        FROM staff_leave
        WHERE staff_id = $1 AND start_date <= $2 AND end_date >= $2
        ORDER BY start_date ASC
        LIMIT 1
        "#,
    )
    .bind(staff_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(leave)
}
