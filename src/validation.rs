//! Snapshot audit for venues, events and bookings.
//!
//! Checks the structural integrity of a store snapshot and the booking
//! invariants the allocator maintains. Detects:
//! - Duplicate IDs
//! - Zero-capacity venues and inverted event windows
//! - Bookings referencing unknown venues or events
//! - More than one booking per event
//! - Overlapping bookings on the same venue (double-booking)
//! - Bookings whose venue cannot seat the event
//! - Bookings held by events that are not approved
//!
//! # Algorithm
//! Double-booking detection sorts bookings by (venue, start) and sweeps
//! each venue once, tracking the furthest end seen so far.
//!
//! # Complexity
//! O(b log b) for b bookings.

use std::collections::{HashMap, HashSet};

use crate::models::{Booking, Event, Venue};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A venue has zero capacity.
    InvalidCapacity,
    /// An event or booking ends at or before it starts.
    InvalidWindow,
    /// A booking references a venue that doesn't exist.
    InvalidVenueReference,
    /// A booking references an event that doesn't exist.
    InvalidEventReference,
    /// An event holds more than one booking.
    DuplicateEventBooking,
    /// Two bookings overlap on the same venue.
    DoubleBooking,
    /// A booked venue is too small for the event.
    CapacityExceeded,
    /// A booking belongs to an event that is not approved.
    UnapprovedBooking,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a snapshot of venues, events and bookings.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_snapshot(venues: &[Venue], events: &[Event], bookings: &[Booking]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut venue_by_id: HashMap<&str, &Venue> = HashMap::new();
    for v in venues {
        if venue_by_id.insert(v.id.as_str(), v).is_some() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate venue ID: {}", v.id),
            ));
        }
        if v.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("Venue '{}' has zero capacity", v.id),
            ));
        }
    }

    let mut event_by_id: HashMap<&str, &Event> = HashMap::new();
    for e in events {
        if event_by_id.insert(e.id.as_str(), e).is_some() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate event ID: {}", e.id),
            ));
        }
        if let Some(end_ms) = e.end_ms {
            if end_ms <= e.start_ms {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidWindow,
                    format!("Event '{}' ends at {end_ms} before it starts at {}", e.id, e.start_ms),
                ));
            }
        }
    }

    let mut booked_events = HashSet::new();
    for b in bookings {
        if b.window.end_ms <= b.window.start_ms {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWindow,
                format!("Booking for event '{}' has an empty window", b.event_id),
            ));
        }

        if !booked_events.insert(b.event_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateEventBooking,
                format!("Event '{}' holds more than one booking", b.event_id),
            ));
        }

        let venue = venue_by_id.get(b.venue_id.as_str());
        let event = event_by_id.get(b.event_id.as_str());

        if venue.is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidVenueReference,
                format!("Booking for event '{}' references unknown venue '{}'", b.event_id, b.venue_id),
            ));
        }
        if event.is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidEventReference,
                format!("Booking on venue '{}' references unknown event '{}'", b.venue_id, b.event_id),
            ));
        }

        if let (Some(venue), Some(event)) = (venue, event) {
            if !venue.fits(event.expected_attendees) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::CapacityExceeded,
                    format!(
                        "Venue '{}' seats {} but event '{}' expects {}",
                        venue.id, venue.capacity, event.id, event.expected_attendees
                    ),
                ));
            }
        }
        if let Some(event) = event {
            if !event.is_approved() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnapprovedBooking,
                    format!("Event '{}' holds a booking but is {:?}", event.id, event.status),
                ));
            }
        }
    }

    errors.extend(detect_double_bookings(bookings));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Finds overlapping bookings on the same venue.
///
/// Each booking is compared against the booking with the furthest end
/// seen so far on its venue, so every overlapping booking is reported
/// at least once.
fn detect_double_bookings(bookings: &[Booking]) -> Vec<ValidationError> {
    let mut sorted: Vec<&Booking> = bookings.iter().collect();
    sorted.sort_by(|a, b| {
        a.venue_id
            .cmp(&b.venue_id)
            .then(a.window.start_ms.cmp(&b.window.start_ms))
    });

    let mut errors = Vec::new();
    let mut reach: Option<&Booking> = None;

    for booking in sorted {
        match reach {
            Some(prev) if prev.venue_id == booking.venue_id => {
                if prev.event_id != booking.event_id && prev.window.overlaps(&booking.window) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::DoubleBooking,
                        format!(
                            "Venue '{}' is double-booked by events '{}' and '{}'",
                            booking.venue_id, prev.event_id, booking.event_id
                        ),
                    ));
                }
                if booking.window.end_ms > prev.window.end_ms {
                    reach = Some(booking);
                }
            }
            _ => reach = Some(booking),
        }
    }

    errors
}
