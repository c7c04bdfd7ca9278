//! Booking model.
//!
//! A booking reserves one venue for one event over the event's window.
//! Bookings are never edited in place: when an event's window or venue
//! changes, the allocator deletes the old booking and creates a new one.

use serde::{Deserialize, Serialize};

use super::TimeWindow;

/// A committed venue reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Booked event ID.
    pub event_id: String,
    /// Reserved venue ID.
    pub venue_id: String,
    /// Reserved interval [start, end).
    pub window: TimeWindow,
}

impl Booking {
    /// Creates a new booking.
    pub fn new(event_id: impl Into<String>, venue_id: impl Into<String>, window: TimeWindow) -> Self {
        Self {
            event_id: event_id.into(),
            venue_id: venue_id.into(),
            window,
        }
    }

    /// Whether this booking blocks `other` (same venue, overlapping window).
    pub fn conflicts_with(&self, other: &Booking) -> bool {
        self.venue_id == other.venue_id && self.window.overlaps(&other.window)
    }
}
