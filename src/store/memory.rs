//! In-memory store.
//!
//! # Index
//! Bookings are kept per venue in a `BTreeMap` keyed by `(start, event)`,
//! so an overlap query only walks bookings that start before the query
//! window ends.
//!
//! # Complexity
//! Overlap query: O(log b + k) where b = bookings on the venue and
//! k = bookings starting before the window end.

use std::collections::{BTreeMap, HashMap};

use super::{EventStore, VenueStore};
use crate::error::StoreError;
use crate::models::{Booking, Event, TimeWindow, Venue};
use crate::validation::{validate_snapshot, ValidationResult};

/// Indexed in-memory [`VenueStore`] and [`EventStore`].
///
/// # Example
///
/// ```
/// use u_venue::models::{Booking, TimeWindow, Venue};
/// use u_venue::store::{MemoryStore, VenueStore};
///
/// let mut store = MemoryStore::new().with_venue(Venue::new("HALL", 100));
/// store.insert_booking(Booking::new("E1", "HALL", TimeWindow::new(0, 1000))).unwrap();
///
/// let clash = store.insert_booking(Booking::new("E2", "HALL", TimeWindow::new(500, 1500)));
/// assert!(clash.unwrap_err().is_booking_conflict());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    venues: HashMap<String, Venue>,
    events: HashMap<String, Event>,
    /// venue_id → (start_ms, event_id) → booking
    bookings: HashMap<String, BTreeMap<(i64, String), Booking>>,
    /// event_id → venue_id of its booking
    booked_venue: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a venue (builder form).
    pub fn with_venue(mut self, venue: Venue) -> Self {
        self.insert_venue(venue);
        self
    }

    /// Adds an event (builder form).
    pub fn with_event(mut self, event: Event) -> Self {
        self.save_event(event);
        self
    }

    /// Inserts or replaces a venue.
    pub fn insert_venue(&mut self, venue: Venue) {
        self.venues.insert(venue.id.clone(), venue);
    }

    /// All venues, ordered by ID.
    pub fn venues(&self) -> Vec<&Venue> {
        let mut venues: Vec<&Venue> = self.venues.values().collect();
        venues.sort_by(|a, b| a.id.cmp(&b.id));
        venues
    }

    /// All events, ordered by ID.
    pub fn events(&self) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.values().collect();
        events.sort_by(|a, b| a.id.cmp(&b.id));
        events
    }

    /// All bookings, ordered by venue then start time.
    pub fn bookings(&self) -> Vec<&Booking> {
        let mut venue_ids: Vec<&String> = self.bookings.keys().collect();
        venue_ids.sort();
        venue_ids
            .into_iter()
            .flat_map(|id| self.bookings[id].values())
            .collect()
    }

    /// Bookings on one venue, ordered by start time.
    pub fn bookings_for_venue(&self, venue_id: &str) -> Vec<&Booking> {
        self.bookings
            .get(venue_id)
            .map(|index| index.values().collect())
            .unwrap_or_default()
    }

    /// Number of committed bookings.
    pub fn booking_count(&self) -> usize {
        self.booked_venue.len()
    }

    /// Runs the snapshot audit over the store contents.
    pub fn audit(&self) -> ValidationResult {
        let venues: Vec<Venue> = self.venues().into_iter().cloned().collect();
        let events: Vec<Event> = self.events().into_iter().cloned().collect();
        let bookings: Vec<Booking> = self.bookings().into_iter().cloned().collect();
        validate_snapshot(&venues, &events, &bookings)
    }
}

impl VenueStore for MemoryStore {
    fn venues_with_capacity(&self, min_capacity: u32) -> Vec<Venue> {
        self.venues
            .values()
            .filter(|v| v.fits(min_capacity))
            .cloned()
            .collect()
    }

    fn venue(&self, venue_id: &str) -> Option<Venue> {
        self.venues.get(venue_id).cloned()
    }

    fn overlapping_bookings(&self, venue_id: &str, window: &TimeWindow) -> Vec<Booking> {
        let Some(index) = self.bookings.get(venue_id) else {
            return Vec::new();
        };
        // Keys below (end, "") are exactly the bookings starting before the window ends.
        index
            .range(..(window.end_ms, String::new()))
            .map(|(_, booking)| booking)
            .filter(|booking| booking.window.overlaps(window))
            .cloned()
            .collect()
    }

    fn booking_for_event(&self, event_id: &str) -> Option<Booking> {
        let venue_id = self.booked_venue.get(event_id)?;
        self.bookings
            .get(venue_id)?
            .values()
            .find(|b| b.event_id == event_id)
            .cloned()
    }

    fn insert_booking(&mut self, booking: Booking) -> Result<(), StoreError> {
        if !self.venues.contains_key(&booking.venue_id) {
            return Err(StoreError::UnknownVenue(booking.venue_id));
        }
        if booking.window.is_empty() {
            return Err(StoreError::EmptyWindow {
                venue_id: booking.venue_id,
                event_id: booking.event_id,
            });
        }
        if self.booked_venue.contains_key(&booking.event_id) {
            return Err(StoreError::DuplicateEventBooking(booking.event_id));
        }
        if let Some(existing) = self
            .overlapping_bookings(&booking.venue_id, &booking.window)
            .into_iter()
            .next()
        {
            return Err(StoreError::BookingConflict {
                venue_id: booking.venue_id,
                event_id: booking.event_id,
                conflicting_event_id: existing.event_id,
            });
        }

        self.booked_venue
            .insert(booking.event_id.clone(), booking.venue_id.clone());
        self.bookings
            .entry(booking.venue_id.clone())
            .or_default()
            .insert((booking.window.start_ms, booking.event_id.clone()), booking);
        Ok(())
    }

    fn delete_bookings_for_event(&mut self, event_id: &str) -> usize {
        let Some(venue_id) = self.booked_venue.remove(event_id) else {
            return 0;
        };
        let Some(index) = self.bookings.get_mut(&venue_id) else {
            return 0;
        };
        let before = index.len();
        index.retain(|(_, owner), _| owner != event_id);
        let removed = before - index.len();
        if index.is_empty() {
            self.bookings.remove(&venue_id);
        }
        removed
    }

    fn set_event_venue(
        &mut self,
        event_id: &str,
        venue_id: Option<&str>,
    ) -> Result<(), StoreError> {
        let event = self
            .events
            .get_mut(event_id)
            .ok_or_else(|| StoreError::UnknownEvent(event_id.to_string()))?;
        event.venue_id = venue_id.map(str::to_string);
        Ok(())
    }
}

impl EventStore for MemoryStore {
    fn event(&self, event_id: &str) -> Option<Event> {
        self.events.get(event_id).cloned()
    }

    fn save_event(&mut self, event: Event) {
        self.events.insert(event.id.clone(), event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> MemoryStore {
        MemoryStore::new()
            .with_venue(Venue::new("A", 50))
            .with_venue(Venue::new("B", 100))
            .with_venue(Venue::new("C", 200))
            .with_event(Event::new("E1", 0))
    }

    #[test]
    fn test_venues_with_capacity() {
        let store = sample_store();
        let mut ids: Vec<String> = store
            .venues_with_capacity(60)
            .into_iter()
            .map(|v| v.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["B", "C"]);
        assert_eq!(store.venues_with_capacity(0).len(), 3);
        assert!(store.venues_with_capacity(500).is_empty());
    }

    #[test]
    fn test_overlap_query() {
        let mut store = sample_store();
        store
            .insert_booking(Booking::new("E1", "A", TimeWindow::new(1000, 2000)))
            .unwrap();
        store
            .insert_booking(Booking::new("E2", "A", TimeWindow::new(3000, 4000)))
            .unwrap();

        let hits = store.overlapping_bookings("A", &TimeWindow::new(1500, 3500));
        assert_eq!(hits.len(), 2);

        // Touching edges do not conflict
        assert!(!store.has_conflict("A", &TimeWindow::new(2000, 3000)));
        assert!(!store.has_conflict("A", &TimeWindow::new(0, 1000)));
        assert!(store.has_conflict("A", &TimeWindow::new(0, 1001)));
        assert!(!store.has_conflict("B", &TimeWindow::new(0, 10_000)));
    }

    #[test]
    fn test_long_booking_found_from_inside() {
        let mut store = sample_store();
        store
            .insert_booking(Booking::new("E1", "A", TimeWindow::new(0, 10_000)))
            .unwrap();
        let hits = store.overlapping_bookings("A", &TimeWindow::new(5000, 6000));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].event_id, "E1");
    }

    #[test]
    fn test_insert_rejects_double_booking() {
        let mut store = sample_store();
        store
            .insert_booking(Booking::new("E1", "A", TimeWindow::new(0, 1000)))
            .unwrap();

        let err = store
            .insert_booking(Booking::new("E2", "A", TimeWindow::new(999, 2000)))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::BookingConflict {
                venue_id: "A".into(),
                event_id: "E2".into(),
                conflicting_event_id: "E1".into(),
            }
        );
        assert_eq!(store.booking_count(), 1);
    }

    #[test]
    fn test_insert_rejects_second_booking_for_event() {
        let mut store = sample_store();
        store
            .insert_booking(Booking::new("E1", "A", TimeWindow::new(0, 1000)))
            .unwrap();
        let err = store
            .insert_booking(Booking::new("E1", "B", TimeWindow::new(0, 1000)))
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateEventBooking("E1".into()));
    }

    #[test]
    fn test_insert_unknown_venue() {
        let mut store = sample_store();
        let err = store
            .insert_booking(Booking::new("E1", "NOPE", TimeWindow::new(0, 1000)))
            .unwrap_err();
        assert_eq!(err, StoreError::UnknownVenue("NOPE".into()));
    }

    #[test]
    fn test_insert_rejects_empty_window() {
        let mut store = sample_store();
        for window in [TimeWindow::new(1000, 1000), TimeWindow::new(2000, 1000)] {
            let err = store
                .insert_booking(Booking::new("E9", "A", window))
                .unwrap_err();
            assert!(matches!(err, StoreError::EmptyWindow { .. }), "{window:?}");
        }
        assert!(store.booking_for_event("E9").is_none());
    }

    #[test]
    fn test_delete_bookings_for_event() {
        let mut store = sample_store();
        store
            .insert_booking(Booking::new("E1", "A", TimeWindow::new(0, 1000)))
            .unwrap();
        assert!(store.booking_for_event("E1").is_some());

        assert_eq!(store.delete_bookings_for_event("E1"), 1);
        assert_eq!(store.delete_bookings_for_event("E1"), 0);
        assert!(store.booking_for_event("E1").is_none());
        assert!(!store.has_conflict("A", &TimeWindow::new(0, 1000)));
        assert_eq!(store.booking_count(), 0);
    }

    #[test]
    fn test_set_event_venue() {
        let mut store = sample_store();
        store.set_event_venue("E1", Some("B")).unwrap();
        assert_eq!(store.event("E1").unwrap().venue_id.as_deref(), Some("B"));
        store.set_event_venue("E1", None).unwrap();
        assert!(store.event("E1").unwrap().venue_id.is_none());

        let err = store.set_event_venue("E9", None).unwrap_err();
        assert_eq!(err, StoreError::UnknownEvent("E9".into()));
    }

    #[test]
    fn test_bookings_ordering() {
        let mut store = sample_store();
        store
            .insert_booking(Booking::new("E2", "B", TimeWindow::new(0, 10)))
            .unwrap();
        store
            .insert_booking(Booking::new("E3", "A", TimeWindow::new(50, 60)))
            .unwrap();
        store
            .insert_booking(Booking::new("E1", "A", TimeWindow::new(0, 10)))
            .unwrap();

        let order: Vec<&str> = store.bookings().iter().map(|b| b.event_id.as_str()).collect();
        assert_eq!(order, vec!["E1", "E3", "E2"]);
        assert_eq!(store.bookings_for_venue("A").len(), 2);
        assert!(store.bookings_for_venue("C").is_empty());
    }
}
