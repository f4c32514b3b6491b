//! # Bookdesk Core
//!
//! Domain types and the availability calculator shared by the database and
//! API crates.
//!
//! - **models**: bookings, services, staff working hours and time slots
//! - **availability**: turns a staff member's day and existing bookings into bookable slots
//! - **lookup**: the async seam through which bookings, durations and hours are fetched
//! - **tracker**: last-write-wins bookkeeping for callers that re-query on every input change

pub mod availability;
pub mod errors;
pub mod lookup;
pub mod models;
pub mod tracker;
