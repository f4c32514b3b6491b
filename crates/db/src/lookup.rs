use async_trait::async_trait;
use bookdesk_core::{
    lookup::AvailabilityLookup,
    models::{
        booking::{BookingStatus, ExistingBooking},
        staff::{StaffDay, WorkingHours},
    },
};
use chrono::{Datelike, NaiveDate};
use eyre::Result;
use uuid::Uuid;

use crate::{repositories, DbPool};

/// Statuses worth fetching; the rest never block a slot.
const BLOCKING_STATUSES: [BookingStatus; 2] = [BookingStatus::Confirmed, BookingStatus::Pending];

/// [`AvailabilityLookup`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgAvailabilityLookup {
    pool: DbPool,
}

impl PgAvailabilityLookup {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Weekday index as stored in `working_hours.weekday` (Monday = 0).
pub fn weekday_index(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_monday() as i16
}

#[async_trait]
impl AvailabilityLookup for PgAvailabilityLookup {
    async fn staff_exists(&self, staff_id: Uuid) -> Result<bool> {
        repositories::staff::staff_exists(&self.pool, staff_id).await
    }

    async fn service_duration(&self, service_id: Uuid) -> Result<Option<u32>> {
        let service = repositories::service::get_service_by_id(&self.pool, service_id).await?;

        Ok(service
            .and_then(|service| service.duration_minutes)
            .and_then(|minutes| u32::try_from(minutes).ok()))
    }

    async fn staff_day(&self, staff_id: Uuid, date: NaiveDate) -> Result<StaffDay> {
        if let Some(leave) = repositories::staff::get_leave_covering(&self.pool, staff_id, date).await? {
            tracing::debug!(
                "Staff {} on leave {}..={} covering {}",
                staff_id, leave.start_date, leave.end_date, date
            );
            return Ok(StaffDay::OnLeave);
        }

        let hours =
            repositories::staff::get_working_hours(&self.pool, staff_id, weekday_index(date)).await?;

        Ok(match hours {
            Some(hours) => StaffDay::Working(WorkingHours::from(hours)),
            None => StaffDay::NotWorking,
        })
    }

    async fn bookings_for(&self, staff_id: Uuid, date: NaiveDate) -> Result<Vec<ExistingBooking>> {
        let rows = repositories::booking::get_bookings_for_staff_on_date(
            &self.pool,
            staff_id,
            date,
            &BLOCKING_STATUSES,
        )
        .await?;

        rows.into_iter().map(ExistingBooking::try_from).collect()
    }
}
