//! # Availability Handlers
//!
//! Serves the slot picker on the booking form. Each request carries the
//! current (staff, date, services) selection plus, when editing, the booking
//! being edited and its current start time.
//!
//! Query parameters arrive as strings and are parsed here so that malformed
//! input produces the same JSON error body as every other validation failure.

use axum::{
    extract::{Query, State},
    Json,
};
use bookdesk_core::{
    availability::{find_available_slots, SlotQuery},
    errors::{BookingError, BookingResult},
    models::time_slot::AvailabilityResponse,
};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    middleware::{auth::Session, error_handling::AppError},
    ApiState,
};

/// Query parameters for the availability endpoint
///
/// # Fields
///
/// * `staff_id` - Staff member UUID
/// * `date` - Calendar day as `YYYY-MM-DD`
/// * `service_ids` - Comma-separated service UUIDs (at least one)
/// * `exclude_booking_id` - Booking being edited, ignored when checking overlaps
/// * `current_slot_start` - `HH:MM` start kept selectable for the edited booking
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub staff_id: Option<String>,
    pub date: Option<String>,
    pub service_ids: Option<String>,
    pub exclude_booking_id: Option<String>,
    pub current_slot_start: Option<String>,
}

/// Missing parameters fail here rather than in the `Query` extractor, so the
/// caller gets the usual JSON error body.
fn required(value: Option<String>, field: &str) -> BookingResult<String> {
    value.ok_or_else(|| BookingError::Validation(format!("Missing required parameter: {}", field)))
}

fn parse_uuid(raw: &str, field: &str) -> BookingResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| BookingError::Validation(format!("Invalid {}: {}", field, raw)))
}

fn parse_time(raw: &str) -> BookingResult<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| {
            BookingError::Validation(format!("Invalid current_slot_start: {}. Expected HH:MM", raw))
        })
}

/// Treats `?exclude_booking_id=` the same as leaving it out.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AvailabilityQuery {
    pub fn into_slot_query(self) -> BookingResult<SlotQuery> {
        let staff_id = parse_uuid(&required(self.staff_id, "staff_id")?, "staff_id")?;

        let raw_date = required(self.date, "date")?;
        let date = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d").map_err(|_| {
            BookingError::Validation(format!("Invalid date: {}. Expected YYYY-MM-DD", raw_date))
        })?;

        let service_ids = required(self.service_ids, "service_ids")?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| parse_uuid(s, "service id"))
            .collect::<BookingResult<Vec<_>>>()?;

        let mut query = SlotQuery::new(staff_id, date, service_ids);

        if let Some(raw) = non_empty(self.exclude_booking_id) {
            query = query.excluding(parse_uuid(&raw, "exclude_booking_id")?);
        }

        if let Some(raw) = non_empty(self.current_slot_start) {
            query = query.keeping(parse_time(&raw)?);
        }

        Ok(query)
    }
}

/// Lists the bookable start times for a staff member on a date
///
/// # Endpoint
///
/// ```text
/// GET /api/availability?staff_id=uuid&date=2030-05-06&service_ids=uuid1,uuid2
/// ```
///
/// # Errors
///
/// * `BookingError::Validation` - Malformed parameters, no services, past date, or a service without a duration
/// * `BookingError::NotFound` - Unknown staff member
/// * `BookingError::Authentication` - Missing or wrong bearer token
/// * `BookingError::Lookup` - Bookings, services or hours could not be loaded
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    session: Session,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let query = query.into_slot_query()?;
    let today = Local::now().date_naive();

    let availability =
        find_available_slots(state.lookup.as_ref(), &query, &state.slot_config, today).await?;

    info!(
        actor = session.actor(),
        staff_id = %query.staff_id,
        date = %query.date,
        slots = availability.slots.len(),
        "Served availability"
    );

    Ok(Json(AvailabilityResponse::new(
        query.staff_id,
        query.date,
        availability,
    )))
}
