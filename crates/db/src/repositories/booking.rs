use crate::models::DbBookingSlot;
use bookdesk_core::models::booking::BookingStatus;
use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Bookings for a staff member on one date whose status is in `statuses`,
/// each with the summed duration of its services. The duration is NULL when
/// the booking has no services or any of them lacks a duration.
pub async fn get_bookings_for_staff_on_date(
    pool: &Pool<Postgres>,
    staff_id: Uuid,
    date: NaiveDate,
    statuses: &[BookingStatus],
) -> Result<Vec<DbBookingSlot>> {
    let statuses: Vec<&str> = statuses.iter().map(BookingStatus::as_str).collect();

    tracing::debug!(
        "Getting bookings: staff_id={}, date={}, statuses={:?}",
        staff_id, date, statuses
    );

    let bookings = sqlx::query_as::<_, DbBookingSlot>(
        r#"
        SELECT b.id, b.staff_id, b.booking_date, b.start_time, b.status,
               CASE
                   WHEN COUNT(*) FILTER (WHERE s.duration_minutes IS NULL) > 0 THEN NULL
                   ELSE SUM(s.duration_minutes)::BIGINT
               END AS duration_minutes
        FROM bookings b
        LEFT JOIN booking_services bs ON bs.booking_id = b.id
        LEFT JOIN services s ON s.id = bs.service_id
        WHERE b.staff_id = $1 AND b.booking_date = $2 AND b.status = ANY($3)
        GROUP BY b.id, b.staff_id, b.booking_date, b.start_time, b.status
        ORDER BY b.start_time ASC
        "#,
    )
    .bind(staff_id)
    .bind(date)
    .bind(&statuses)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}
