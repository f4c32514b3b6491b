use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One bookable appointment window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    NotWorking,
    OnLeave,
    OutsideWorkingHours,
    FullyBooked,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            UnavailableReason::NotWorking => "staff not available this day",
            UnavailableReason::OnLeave => "staff on leave",
            UnavailableReason::OutsideWorkingHours => {
                "requested services do not fit within working hours"
            }
            UnavailableReason::FullyBooked => "no free slots remain on this day",
        };
        f.write_str(message)
    }
}

/// Result of an availability computation. `reason` is set exactly when
/// `slots` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub total_duration_minutes: u32,
    pub slots: Vec<TimeSlot>,
    pub reason: Option<UnavailableReason>,
}

impl Availability {
    pub fn unavailable(total_duration_minutes: u32, reason: UnavailableReason) -> Self {
        Self {
            total_duration_minutes,
            slots: Vec::new(),
            reason: Some(reason),
        }
    }

    pub fn start_times(&self) -> Vec<NaiveTime> {
        self.slots.iter().map(|slot| slot.start).collect()
    }
}

/// Whole seconds since midnight. Sub-second precision is dropped.
pub fn seconds_from_midnight(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight()
}

/// Inverse of [`seconds_from_midnight`]. `None` at or past 24:00.
pub fn time_from_seconds(seconds: u32) -> Option<NaiveTime> {
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
}

/// Service and booking durations are whole minutes.
pub fn minutes_to_seconds(minutes: u32) -> u32 {
    minutes.saturating_mul(60)
}

/// Body of `GET /api/availability`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub staff_id: Uuid,
    pub date: NaiveDate,
    pub total_duration_minutes: u32,
    pub slots: Vec<TimeSlot>,
    /// Why `slots` is empty, in words fit for the slot picker.
    pub reason: Option<String>,
}

impl AvailabilityResponse {
    pub fn new(staff_id: Uuid, date: NaiveDate, availability: Availability) -> Self {
        Self {
            staff_id,
            date,
            total_duration_minutes: availability.total_duration_minutes,
            slots: availability.slots,
            reason: availability.reason.map(|reason| reason.to_string()),
        }
    }
}
