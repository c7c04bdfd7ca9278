//! Event model.
//!
//! An event is a proposal to hold something at a given time for an
//! expected number of attendees. Events move through a small approval
//! lifecycle; only approved events hold venue bookings.
//!
//! # Time Representation
//! `start_ms` is required. `end_ms` is optional; when absent, a default
//! duration (see [`AllocatorConfig`](crate::config::AllocatorConfig)) is
//! assumed for conflict checking.

use serde::{Deserialize, Serialize};

use super::TimeWindow;

/// Approval state of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Approved; participates in venue allocation.
    Approved,
    /// Rejected; holds no booking.
    Rejected,
}

/// An event to be placed in a venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Start time (ms).
    pub start_ms: i64,
    /// End time (ms). `None` = default duration.
    pub end_ms: Option<i64>,
    /// Number of attendees the venue must hold.
    pub expected_attendees: u32,
    /// Venue chosen by hand or resolved by the allocator.
    pub venue_id: Option<String>,
    /// Approval state.
    pub status: EventStatus,
    /// Proposing user.
    pub proposed_by: Option<String>,
}

impl Event {
    /// Creates a pending event starting at `start_ms`.
    pub fn new(id: impl Into<String>, start_ms: i64) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            start_ms,
            end_ms: None,
            expected_attendees: 0,
            venue_id: None,
            status: EventStatus::Pending,
            proposed_by: None,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets an explicit end time.
    pub fn with_end(mut self, end_ms: i64) -> Self {
        self.end_ms = Some(end_ms);
        self
    }

    /// Sets the expected attendance.
    pub fn with_attendees(mut self, attendees: u32) -> Self {
        self.expected_attendees = attendees;
        self
    }

    /// Sets a manually chosen venue.
    pub fn with_venue(mut self, venue_id: impl Into<String>) -> Self {
        self.venue_id = Some(venue_id.into());
        self
    }

    /// Sets the approval state.
    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the proposing user.
    pub fn with_proposer(mut self, user_id: impl Into<String>) -> Self {
        self.proposed_by = Some(user_id.into());
        self
    }

    /// Whether the event takes part in allocation.
    #[inline]
    pub fn is_approved(&self) -> bool {
        self.status == EventStatus::Approved
    }

    /// The window a booking for this event covers.
    ///
    /// Uses the explicit end if set, otherwise `start + default_duration_ms`.
    pub fn window(&self, default_duration_ms: i64) -> TimeWindow {
        match self.end_ms {
            Some(end_ms) => TimeWindow::new(self.start_ms, end_ms),
            None => TimeWindow::starting_at(self.start_ms, default_duration_ms),
        }
    }
}
