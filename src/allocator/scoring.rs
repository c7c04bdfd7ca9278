//! Candidate venue scoring.
//!
//! # Score Convention
//! **Lower score = better venue**, as with dispatching rules.
//!
//! ```text
//! score = (capacity - attendees) * capacity_weight
//!       + distance_km(venue, reference_point) * distance_weight
//! ```
//!
//! With the default weights (100 per empty seat, 5 per km) one spare seat
//! outweighs 20 km of travel, so a tighter venue loses to a looser one
//! only when it is much further away.

use crate::config::AllocatorConfig;
use crate::models::Venue;

/// Weighted score of hosting `attendees` in `venue`.
///
/// Returns `None` if the venue has no known location.
pub fn venue_score(venue: &Venue, attendees: u32, config: &AllocatorConfig) -> Option<f64> {
    let location = venue.location?;
    let spare = f64::from(venue.spare_capacity(attendees));
    let distance = location.distance_km(&config.reference_point);
    Some(spare * config.capacity_weight + distance * config.distance_weight)
}
