//! Error types.
//!
//! "No venue available" is deliberately absent: it is a normal
//! [`Allocation::Unavailable`](crate::allocator::Allocation::Unavailable)
//! outcome, not a failure.

use std::path::PathBuf;

/// Errors raised at the persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The booking overlaps a committed booking on the same venue.
    #[error("venue '{venue_id}' is already booked by event '{conflicting_event_id}' during the window requested for event '{event_id}'")]
    BookingConflict {
        /// Venue that was double-booked.
        venue_id: String,
        /// Event whose booking was rejected.
        event_id: String,
        /// Event holding the overlapping booking.
        conflicting_event_id: String,
    },

    /// The booking window is zero-length or inverted.
    #[error("booking for event '{event_id}' on venue '{venue_id}' has an empty window")]
    EmptyWindow {
        /// Venue the booking targeted.
        venue_id: String,
        /// Event whose booking was rejected.
        event_id: String,
    },

    /// The event already holds a booking.
    #[error("event '{0}' already holds a booking")]
    DuplicateEventBooking(String),

    /// No venue with this ID exists.
    #[error("unknown venue '{0}'")]
    UnknownVenue(String),

    /// No event with this ID exists.
    #[error("unknown event '{0}'")]
    UnknownEvent(String),
}

impl StoreError {
    /// Whether this is a double-booking rejected by the store.
    pub fn is_booking_conflict(&self) -> bool {
        matches!(self, Self::BookingConflict { .. })
    }
}

/// Errors from a venue allocation run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    /// The store rejected a write.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl AllocationError {
    /// Whether the run lost a race for a venue and may be retried.
    pub fn is_booking_conflict(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_booking_conflict(),
        }
    }
}

/// Errors from event lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// No event with this ID exists.
    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    /// Venue allocation failed.
    #[error("allocation failed: {0}")]
    Allocation(#[from] AllocationError),

    /// The store rejected a write.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Errors loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The config text is not valid TOML for [`Config`](crate::config::Config).
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}
