//! Persistence contract for venues, bookings and events.
//!
//! The allocator reads and writes through [`VenueStore`]; the event
//! lifecycle additionally needs [`EventStore`]. Any backend can implement
//! these traits, provided that `insert_booking` enforces the booking
//! uniqueness constraint itself: the allocator's conflict scan and its
//! insert are separate calls, so a concurrent writer can slip in between.
//!
//! [`MemoryStore`] is an indexed in-memory implementation.

mod memory;

pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::models::{Booking, Event, TimeWindow, Venue};

/// Read/write access to venues and bookings.
pub trait VenueStore {
    /// Venues with `capacity >= min_capacity`, in any order.
    fn venues_with_capacity(&self, min_capacity: u32) -> Vec<Venue>;

    /// Looks up a venue.
    fn venue(&self, venue_id: &str) -> Option<Venue>;

    /// Bookings on `venue_id` whose window overlaps `window`.
    fn overlapping_bookings(&self, venue_id: &str, window: &TimeWindow) -> Vec<Booking>;

    /// Whether any booking on `venue_id` overlaps `window`.
    fn has_conflict(&self, venue_id: &str, window: &TimeWindow) -> bool {
        !self.overlapping_bookings(venue_id, window).is_empty()
    }

    /// The booking held by an event, if any.
    fn booking_for_event(&self, event_id: &str) -> Option<Booking>;

    /// Commits a booking.
    ///
    /// # Errors
    /// - [`StoreError::BookingConflict`] if it overlaps a booking on the same venue
    /// - [`StoreError::DuplicateEventBooking`] if the event already holds one
    /// - [`StoreError::UnknownVenue`] if the venue does not exist
    fn insert_booking(&mut self, booking: Booking) -> Result<(), StoreError>;

    /// Removes every booking of an event. Returns how many were removed.
    fn delete_bookings_for_event(&mut self, event_id: &str) -> usize;

    /// Persists an event's resolved venue.
    fn set_event_venue(&mut self, event_id: &str, venue_id: Option<&str>)
        -> Result<(), StoreError>;
}

/// Read/write access to events.
pub trait EventStore {
    /// Looks up an event.
    fn event(&self, event_id: &str) -> Option<Event>;

    /// Inserts or replaces an event.
    fn save_event(&mut self, event: Event);
}
