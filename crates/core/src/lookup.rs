use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::Result;
use uuid::Uuid;

use crate::models::{booking::ExistingBooking, staff::StaffDay};

/// Data sources the availability calculator reads from.
///
/// Every method reports collaborator failures through `eyre::Report`; the
/// caller turns those into [`BookingError::Lookup`](crate::errors::BookingError::Lookup)
/// so they never look like an empty day.
#[async_trait]
pub trait AvailabilityLookup: Send + Sync {
    async fn staff_exists(&self, staff_id: Uuid) -> Result<bool>;

    /// Duration of a service in minutes, `None` if it is unknown or has no
    /// duration recorded.
    async fn service_duration(&self, service_id: Uuid) -> Result<Option<u32>>;

    async fn staff_day(&self, staff_id: Uuid, date: NaiveDate) -> Result<StaffDay>;

    /// Bookings for the staff member on the given date. Implementations may
    /// return non-blocking ones; the calculator filters by status.
    async fn bookings_for(&self, staff_id: Uuid, date: NaiveDate) -> Result<Vec<ExistingBooking>>;
}
