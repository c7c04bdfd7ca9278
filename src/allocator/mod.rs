//! Venue allocation.
//!
//! Binds an event to a venue that can seat it and is free for the whole
//! event window.
//!
//! # Algorithm
//!
//! 1. Resolve the event window (explicit end, else start + default duration).
//! 2. Drop any booking the event already holds.
//! 3. If the event names a venue by hand and that venue fits, book it
//!    unless it is busy. A venue that is too small is cleared.
//! 4. Otherwise search venues with enough seats, smallest first, skipping
//!    busy ones, and book the best by [`ScoringPolicy`].
//! 5. If nothing is free, clear the event's venue.
//!
//! # Complexity
//! O(v log v + v * q) where v = venues and q = cost of one overlap query.
//!
//! # Concurrency
//! The conflict scan and the insert are separate store calls. The store
//! rejects an overlapping insert with
//! [`StoreError::BookingConflict`](crate::error::StoreError::BookingConflict),
//! which surfaces here as an [`AllocationError`] for the caller to retry.

mod scoring;

pub use scoring::venue_score;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{AllocatorConfig, ScoringPolicy};
use crate::error::AllocationError;
use crate::models::{Booking, Event, TimeWindow, Venue};
use crate::store::VenueStore;

/// How a booked venue was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationPath {
    /// The event's hand-picked venue.
    Manual,
    /// Found by the candidate search.
    Automatic,
}

/// Result of an allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Allocation {
    /// A booking was committed.
    Booked {
        /// Booked venue.
        venue_id: String,
        /// How the venue was chosen.
        path: AllocationPath,
    },
    /// No venue can seat the event during its window.
    Unavailable,
}

impl Allocation {
    /// Whether a booking was committed.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        matches!(self, Self::Booked { .. })
    }

    /// The booked venue, if any.
    pub fn venue_id(&self) -> Option<&str> {
        match self {
            Self::Booked { venue_id, .. } => Some(venue_id),
            Self::Unavailable => None,
        }
    }
}

/// Finds and books conflict-free venues for events.
///
/// Holds no state besides its configuration; every call is a function of
/// the store contents at call time.
///
/// # Example
///
/// ```
/// use u_venue::allocator::VenueAllocator;
/// use u_venue::config::{AllocatorConfig, ScoringPolicy};
/// use u_venue::models::{Event, EventStatus, Venue, HOUR_MS};
/// use u_venue::store::MemoryStore;
///
/// let mut event = Event::new("E1", 10 * HOUR_MS)
///     .with_end(12 * HOUR_MS)
///     .with_attendees(40)
///     .with_status(EventStatus::Approved);
/// let mut store = MemoryStore::new()
///     .with_venue(Venue::new("A", 50))
///     .with_venue(Venue::new("B", 100))
///     .with_event(event.clone());
///
/// let allocator = VenueAllocator::with_config(
///     AllocatorConfig::default().with_policy(ScoringPolicy::TightestFit),
/// );
/// let allocation = allocator.allocate(&mut store, &mut event).unwrap();
/// assert_eq!(allocation.venue_id(), Some("A"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct VenueAllocator {
    config: AllocatorConfig,
}

impl VenueAllocator {
    /// Creates an allocator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator with the given settings.
    pub fn with_config(config: AllocatorConfig) -> Self {
        Self { config }
    }

    /// Current settings.
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Books a venue for `event`, replacing any booking it held.
    ///
    /// Updates `event.venue_id` and persists it through the store.
    /// Never changes the event status. "No venue free" is
    /// `Ok(Allocation::Unavailable)`, not an error. So is an empty or
    /// inverted window, which leaves the requested venue untouched.
    ///
    /// # Errors
    /// Returns [`AllocationError::Storage`] if the store rejects a write,
    /// including a double-booking lost to a concurrent writer.
    pub fn allocate<S>(&self, store: &mut S, event: &mut Event) -> Result<Allocation, AllocationError>
    where
        S: VenueStore + ?Sized,
    {
        let window = event.window(self.config.default_duration_ms);
        let removed = store.delete_bookings_for_event(&event.id);
        if removed > 0 {
            debug!(event = %event.id, removed, "released previous booking");
        }
        if window.is_empty() {
            warn!(
                event = %event.id,
                start_ms = window.start_ms,
                end_ms = window.end_ms,
                "event window is empty, not booking"
            );
            return Ok(Allocation::Unavailable);
        }

        if let Some(manual_id) = event.venue_id.clone() {
            match store.venue(&manual_id) {
                Some(venue) if venue.fits(event.expected_attendees) => {
                    if !store.has_conflict(&venue.id, &window) {
                        self.book(store, event, &venue, window)?;
                        info!(event = %event.id, venue = %venue.id, "booked requested venue");
                        return Ok(Allocation::Booked {
                            venue_id: venue.id,
                            path: AllocationPath::Manual,
                        });
                    }
                    debug!(
                        event = %event.id,
                        venue = %venue.id,
                        "requested venue is busy, searching alternatives"
                    );
                }
                Some(venue) => {
                    warn!(
                        event = %event.id,
                        venue = %venue.id,
                        capacity = venue.capacity,
                        attendees = event.expected_attendees,
                        "requested venue is too small, clearing it"
                    );
                    event.venue_id = None;
                    store.set_event_venue(&event.id, None)?;
                }
                None => {
                    warn!(event = %event.id, venue = %manual_id, "requested venue does not exist, clearing it");
                    event.venue_id = None;
                    store.set_event_venue(&event.id, None)?;
                }
            }
        }

        match self.select_venue(&*store, event, &window) {
            Some(venue) => {
                self.book(store, event, &venue, window)?;
                info!(event = %event.id, venue = %venue.id, "booked venue");
                Ok(Allocation::Booked {
                    venue_id: venue.id,
                    path: AllocationPath::Automatic,
                })
            }
            None => {
                warn!(
                    event = %event.id,
                    attendees = event.expected_attendees,
                    "no venue available"
                );
                if event.venue_id.is_some() {
                    event.venue_id = None;
                    store.set_event_venue(&event.id, None)?;
                }
                Ok(Allocation::Unavailable)
            }
        }
    }

    /// Drops the booking held by an event. Returns how many were removed.
    pub fn release<S>(&self, store: &mut S, event_id: &str) -> usize
    where
        S: VenueStore + ?Sized,
    {
        store.delete_bookings_for_event(event_id)
    }

    /// Runs the candidate search without booking anything.
    ///
    /// Candidates are venues that seat the event, ordered by
    /// (capacity, id). Busy venues are skipped; under
    /// [`ScoringPolicy::Weighted`] so are venues without a location.
    pub fn select_venue<S>(&self, store: &S, event: &Event, window: &TimeWindow) -> Option<Venue>
    where
        S: VenueStore + ?Sized,
    {
        let attendees = event.expected_attendees;
        let mut candidates = store.venues_with_capacity(attendees);
        candidates.sort_by(|a, b| a.capacity.cmp(&b.capacity).then_with(|| a.id.cmp(&b.id)));

        match self.config.policy {
            ScoringPolicy::TightestFit => candidates
                .into_iter()
                .find(|venue| !store.has_conflict(&venue.id, window)),
            ScoringPolicy::Weighted => {
                let mut best: Option<(f64, Venue)> = None;
                for venue in candidates {
                    if store.has_conflict(&venue.id, window) {
                        debug!(venue = %venue.id, "skipping busy venue");
                        continue;
                    }
                    let Some(score) = venue_score(&venue, attendees, &self.config) else {
                        debug!(venue = %venue.id, "skipping venue without location");
                        continue;
                    };
                    debug!(venue = %venue.id, score, "scored candidate");
                    // Strict comparison keeps the first of equal scores
                    if best.as_ref().map_or(true, |(best_score, _)| score < *best_score) {
                        best = Some((score, venue));
                    }
                }
                best.map(|(_, venue)| venue)
            }
        }
    }

    fn book<S>(
        &self,
        store: &mut S,
        event: &mut Event,
        venue: &Venue,
        window: TimeWindow,
    ) -> Result<(), AllocationError>
    where
        S: VenueStore + ?Sized,
    {
        store.insert_booking(Booking::new(&event.id, &venue.id, window))?;
        if let Err(e) = store.set_event_venue(&event.id, Some(&venue.id)) {
            // Roll back the insert
            store.delete_bookings_for_event(&event.id);
            return Err(e.into());
        }
        event.venue_id = Some(venue.id.clone());
        Ok(())
    }
}
