//! Last-write-wins tracking for availability requests.
//!
//! A booking form re-queries availability whenever staff, date or services
//! change. Responses can arrive out of order, so every query takes a ticket
//! and only the newest ticket may publish its result.
//!
//! This is a client-side helper. The server answers each request on its own
//! and never consults it; callers that fan out availability queries (the
//! dashboard, or any Rust client embedding `bookdesk-core`) hold one
//! `LatestRequest` per form.
//!
//! ```
//! use bookdesk_core::tracker::LatestRequest;
//!
//! let latest = LatestRequest::new();
//! let stale = latest.begin();
//! let fresh = latest.begin();
//!
//! assert_eq!(latest.accept(stale, vec!["09:00"]), None);
//! assert_eq!(latest.accept(fresh, vec!["09:30"]), Some(vec!["09:30"]));
//! ```

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

#[derive(Debug, Clone, Default)]
pub struct LatestRequest {
    generation: Arc<AtomicU64>,
}

impl LatestRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket for a new request, superseding every earlier one.
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }

    /// Hands back `value` only if `ticket` is still the newest request.
    pub fn accept<T>(&self, ticket: RequestTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(ticket = ticket.0, "Discarding superseded availability result");
            None
        }
    }
}
