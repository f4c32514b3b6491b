use bookdesk_core::models::{
    booking::{BookingStatus, ExistingBooking},
    staff::WorkingHours,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::{eyre, Report};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWorkingHours {
    pub staff_id: Uuid,
    /// Monday = 0 through Sunday = 6.
    pub weekday: i16,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStaffLeave {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub note: Option<String>,
}

/// A booking row joined with the summed duration of its services.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBookingSlot {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub status: String,
    pub duration_minutes: Option<i64>,
}

impl From<DbWorkingHours> for WorkingHours {
    fn from(row: DbWorkingHours) -> Self {
        WorkingHours {
            open: row.open_time,
            close: row.close_time,
        }
    }
}

impl TryFrom<DbBookingSlot> for ExistingBooking {
    type Error = Report;

    fn try_from(row: DbBookingSlot) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<BookingStatus>()
            .map_err(|e| eyre!("Booking {}: {}", row.id, e))?;

        let duration_minutes = row
            .duration_minutes
            .filter(|minutes| *minutes > 0)
            .ok_or_else(|| eyre!("Booking {} has no service duration", row.id))
            .and_then(|minutes| {
                u32::try_from(minutes)
                    .map_err(|_| eyre!("Booking {} duration {} out of range", row.id, minutes))
            })?;

        Ok(ExistingBooking {
            id: row.id,
            start: row.start_time,
            duration_minutes,
            status,
        })
    }
}
