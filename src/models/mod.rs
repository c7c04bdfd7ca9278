//! Allocation domain models.
//!
//! Provides the core data types shared by the venue allocator, the task
//! advisor and the event lifecycle.
//!
//! # Domain Mappings
//!
//! | u-venue | Campus events | Conference | Sports club |
//! |---------|---------------|------------|-------------|
//! | Venue | Hall/Auditorium | Room | Court/Pitch |
//! | Event | Club event | Session | Match |
//! | Booking | Hall reservation | Room slot | Court slot |
//! | Volunteer | Student helper | Staff | Member |

mod booking;
mod event;
mod venue;
mod volunteer;
mod window;

pub use booking::Booking;
pub use event::{Event, EventStatus};
pub use venue::{GeoPoint, Venue};
pub use volunteer::{Task, Volunteer};
pub use window::{TimeWindow, HOUR_MS};
