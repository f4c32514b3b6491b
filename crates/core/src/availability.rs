//! # Availability Calculator
//!
//! Produces the bookable start times for one staff member on one day.
//!
//! ## Algorithm
//!
//! 1. Sum the durations of the requested services
//! 2. Resolve the staff member's working hours for the date (leave and days
//!    off short-circuit with a reason)
//! 3. Step through candidate starts from opening time at a fixed granularity,
//!    keeping only those whose service run finishes by closing time
//! 4. Drop candidates that overlap a confirmed or pending booking, unless the
//!    candidate is the slot currently held by the booking being edited
//!
//! All arithmetic is in seconds from midnight, so intervals never wrap and
//! times carrying seconds are compared exactly.
//! [`compute_slots`] is pure; [`find_available_slots`] does the lookups
//! around it.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    lookup::AvailabilityLookup,
    models::{
        booking::ExistingBooking,
        staff::StaffDay,
        time_slot::{
            minutes_to_seconds, seconds_from_midnight, time_from_seconds, Availability, TimeSlot,
            UnavailableReason,
        },
    },
};

pub const DEFAULT_GRANULARITY_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Increment between candidate start times.
    pub granularity_minutes: u32,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
        }
    }
}

/// Inputs for one availability computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotQuery {
    pub staff_id: Uuid,
    pub date: NaiveDate,
    pub service_ids: Vec<Uuid>,
    /// Booking being edited; it never blocks its own reschedule.
    pub exclude_booking_id: Option<Uuid>,
    /// Start time that stays selectable even when it overlaps a booking.
    pub current_slot_start: Option<NaiveTime>,
}

impl SlotQuery {
    pub fn new(staff_id: Uuid, date: NaiveDate, service_ids: Vec<Uuid>) -> Self {
        Self {
            staff_id,
            date,
            service_ids,
            exclude_booking_id: None,
            current_slot_start: None,
        }
    }

    pub fn excluding(mut self, booking_id: Uuid) -> Self {
        self.exclude_booking_id = Some(booking_id);
        self
    }

    pub fn keeping(mut self, current_slot_start: NaiveTime) -> Self {
        self.current_slot_start = Some(current_slot_start);
        self
    }

    /// Rejects queries that should never reach the calculator.
    pub fn validate(&self, today: NaiveDate) -> BookingResult<()> {
        if self.service_ids.is_empty() {
            return Err(BookingError::Validation(
                "At least one service must be selected".to_string(),
            ));
        }

        if self.date < today {
            return Err(BookingError::Validation(
                "Cannot check availability for a past date".to_string(),
            ));
        }

        Ok(())
    }

    /// Service IDs with duplicates removed, first occurrence wins.
    pub fn unique_service_ids(&self) -> Vec<Uuid> {
        let mut unique = Vec::with_capacity(self.service_ids.len());
        for id in &self.service_ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }
        unique
    }
}

/// Computes bookable slots from already resolved data.
///
/// Bookings that are cancelled, completed or match `exclude_booking_id` are
/// ignored here as well, so callers may pass the raw booking list.
pub fn compute_slots(
    query: &SlotQuery,
    day: &StaffDay,
    total_duration_minutes: u32,
    bookings: &[ExistingBooking],
    config: &SlotConfig,
) -> Availability {
    let hours = match day {
        StaffDay::Working(hours) => hours,
        StaffDay::NotWorking => {
            return Availability::unavailable(total_duration_minutes, UnavailableReason::NotWorking);
        }
        StaffDay::OnLeave => {
            return Availability::unavailable(total_duration_minutes, UnavailableReason::OnLeave);
        }
    };

    let open = seconds_from_midnight(hours.open);
    let close = seconds_from_midnight(hours.close);
    let duration = minutes_to_seconds(total_duration_minutes);
    let step = minutes_to_seconds(config.granularity_minutes.max(1));

    let blocking: Vec<(u32, u32)> = bookings
        .iter()
        .filter(|booking| booking.status.blocks_availability())
        .filter(|booking| Some(booking.id) != query.exclude_booking_id)
        .map(ExistingBooking::interval)
        .collect();

    let mut slots = Vec::new();
    let mut any_fit = false;
    let mut start = open;

    while start < close {
        let Some(end) = start.checked_add(duration).filter(|end| *end <= close) else {
            break;
        };
        any_fit = true;

        let (Some(start_time), Some(end_time)) = (time_from_seconds(start), time_from_seconds(end))
        else {
            break;
        };

        let overlaps = blocking
            .iter()
            .any(|&(block_start, block_end)| start < block_end && end > block_start);

        // Only the exact start held by the edited booking survives an overlap
        if !overlaps || query.current_slot_start == Some(start_time) {
            slots.push(TimeSlot {
                start: start_time,
                end: end_time,
            });
        }

        start = start.saturating_add(step);
    }

    debug!(
        staff_id = %query.staff_id,
        date = %query.date,
        total_duration_minutes,
        blocking = blocking.len(),
        slots = slots.len(),
        "Computed availability"
    );

    if slots.is_empty() {
        let reason = if any_fit {
            UnavailableReason::FullyBooked
        } else {
            UnavailableReason::OutsideWorkingHours
        };
        return Availability::unavailable(total_duration_minutes, reason);
    }

    Availability {
        total_duration_minutes,
        slots,
        reason: None,
    }
}

/// Sums the durations of the requested services. A service without a
/// positive duration is a validation error rather than a silent default.
pub async fn resolve_total_duration<L>(lookup: &L, service_ids: &[Uuid]) -> BookingResult<u32>
where
    L: AvailabilityLookup + ?Sized,
{
    let mut total: u32 = 0;
    for service_id in service_ids {
        let duration = lookup
            .service_duration(*service_id)
            .await?
            .filter(|minutes| *minutes > 0)
            .ok_or_else(|| {
                BookingError::Validation(format!("Service {} has no duration configured", service_id))
            })?;
        total = total.saturating_add(duration);
    }
    Ok(total)
}

/// Validates the query, resolves everything the calculator needs through
/// `lookup`, and computes the slots.
///
/// # Errors
///
/// * `BookingError::Validation` - empty service list, past date, or a service without a duration
/// * `BookingError::NotFound` - unknown staff member
/// * `BookingError::Lookup` - any collaborator failure
pub async fn find_available_slots<L>(
    lookup: &L,
    query: &SlotQuery,
    config: &SlotConfig,
    today: NaiveDate,
) -> BookingResult<Availability>
where
    L: AvailabilityLookup + ?Sized,
{
    query.validate(today)?;

    if !lookup.staff_exists(query.staff_id).await? {
        return Err(BookingError::NotFound(format!(
            "Staff member with ID {} not found",
            query.staff_id
        )));
    }

    let total_duration = resolve_total_duration(lookup, &query.unique_service_ids()).await?;

    let day = lookup.staff_day(query.staff_id, query.date).await?;

    // Bookings only matter on a working day
    let bookings = match day {
        StaffDay::Working(_) => lookup.bookings_for(query.staff_id, query.date).await?,
        StaffDay::NotWorking | StaffDay::OnLeave => Vec::new(),
    };

    Ok(compute_slots(query, &day, total_duration, &bookings, config))
}
