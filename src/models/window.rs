//! Booking time windows.
//!
//! # Time Model
//! All times are in milliseconds relative to an epoch chosen by the
//! consumer (typically the Unix epoch, UTC).
//!
//! # Overlap
//! Windows are half-open, so an event ending at 12:00 and another starting
//! at 12:00 can share a venue.

use serde::{Deserialize, Serialize};

/// One hour in milliseconds.
pub const HOUR_MS: i64 = 60 * 60 * 1000;

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    /// Interval start (ms, inclusive).
    pub start_ms: i64,
    /// Interval end (ms, exclusive).
    pub end_ms: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Window starting at `start_ms` lasting `duration_ms`.
    pub fn starting_at(start_ms: i64, duration_ms: i64) -> Self {
        Self::new(start_ms, start_ms.saturating_add(duration_ms))
    }

    /// Duration of this window (ms).
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Whether the window covers no time (zero-length or inverted).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end_ms <= self.start_ms
    }

    /// Whether a timestamp falls within this window.
    #[inline]
    pub fn contains(&self, time_ms: i64) -> bool {
        time_ms >= self.start_ms && time_ms < self.end_ms
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_ms < other.end_ms && other.start_ms < self.end_ms
    }

    /// Length of the shared part of two windows, if any.
    pub fn overlap_ms(&self, other: &Self) -> Option<i64> {
        let start = self.start_ms.max(other.start_ms);
        let end = self.end_ms.min(other.end_ms);
        if end > start {
            Some(end.saturating_sub(start))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_extreme_windows() {
        assert!(TimeWindow::new(100, 100).is_empty());
        assert!(TimeWindow::new(200, 100).is_empty());
        assert!(!TimeWindow::new(100, 101).is_empty());

        let huge = TimeWindow::new(i64::MIN, i64::MAX);
        assert_eq!(huge.duration_ms(), i64::MAX);
        assert_eq!(huge.overlap_ms(&huge), Some(i64::MAX));
        assert_eq!(TimeWindow::new(i64::MAX, i64::MIN).duration_ms(), i64::MIN);
    }

    #[test]
    fn test_time_window() {
        let w = TimeWindow::new(100, 200);
        assert_eq!(w.duration_ms(), 100);
        assert!(w.contains(100));
        assert!(w.contains(199));
        assert!(!w.contains(200)); // exclusive end
        assert!(!w.contains(50));
    }

    #[test]
    fn test_time_window_overlap() {
        let a = TimeWindow::new(0, 100);
        let b = TimeWindow::new(50, 150);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let c = TimeWindow::new(100, 200); // touching but not overlapping
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_contained_window_overlaps() {
        let outer = TimeWindow::new(0, 1000);
        let inner = TimeWindow::new(200, 300);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert_eq!(outer.overlap_ms(&inner), Some(100));
    }

    #[test]
    fn test_starting_at() {
        let w = TimeWindow::starting_at(10 * HOUR_MS, 4 * HOUR_MS);
        assert_eq!(w.end_ms, 14 * HOUR_MS);
        assert_eq!(w.duration_ms(), 4 * HOUR_MS);
    }

    #[test]
    fn test_overlap_ms_disjoint() {
        let a = TimeWindow::new(0, 100);
        let b = TimeWindow::new(100, 200);
        assert_eq!(a.overlap_ms(&b), None);
    }
}
