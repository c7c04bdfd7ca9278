//! Venue allocation and volunteer task assignment for community events.
//!
//! Books each approved event into a venue that seats its expected
//! attendance without overlapping another booking, and suggests which
//! volunteer should pick up each open task.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Venue`, `GeoPoint`, `Event`, `Booking`,
//!   `TimeWindow`, `Volunteer`, `Task`
//! - **`allocator`**: Conflict-free venue search with manual overrides
//! - **`advisor`**: Least-loaded task suggestions and volunteer spanning trees
//! - **`lifecycle`**: Event create/approve/reject/update with allocation triggers
//! - **`store`**: Storage traits and the in-memory reference store
//! - **`validation`**: Snapshot integrity checks (double bookings, references)
//! - **`config`**: TOML-backed tuning for the allocator and advisor
//! - **`error`**: Error types for each layer
//!
//! # Time
//!
//! All timestamps are milliseconds since an arbitrary epoch. Windows are
//! half-open: an event ending at 12:00 does not conflict with one
//! starting at 12:00.
//!
//! # References
//!
//! - Kruskal (1956), "On the shortest spanning subtree of a graph"
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 21, 23

pub mod advisor;
pub mod allocator;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod store;
pub mod validation;
