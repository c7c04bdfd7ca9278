//! Event lifecycle service.
//!
//! Owns the write path for events and decides when venue allocation runs.
//! Allocation is re-run, synchronously, whenever:
//! - an event is created already approved (e.g. by a privileged proposer),
//! - a pending or rejected event is approved,
//! - an approved event changes attendance, start, end or venue.
//!
//! Each trigger is an explicit call at the end of the operation, driven by
//! an [`EventDelta`] between the stored state before and after the write.
//!
//! A booking lost to a concurrent writer is retried once; a second loss is
//! returned to the caller.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::allocator::{Allocation, VenueAllocator};
use crate::error::LifecycleError;
use crate::models::{Event, EventStatus};
use crate::store::{EventStore, VenueStore};

/// Who proposed an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposer {
    /// Proposing user.
    pub user_id: String,
    /// Whether the user's proposals are approved on creation.
    pub privileged: bool,
}

impl Proposer {
    /// A regular user; proposals start pending.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            privileged: false,
        }
    }

    /// A privileged user; proposals are approved on creation.
    pub fn privileged(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            privileged: true,
        }
    }
}

/// Review decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    /// The event was approved.
    Approve,
    /// The event was rejected.
    Reject,
}

/// One entry of the approval history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    /// Reviewed event.
    pub event_id: String,
    /// Reviewer.
    pub actor: String,
    /// Decision.
    pub action: ApprovalAction,
    /// Reason given, if any.
    pub reason: Option<String>,
}

/// Field changes to apply to an event. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventUpdate {
    /// New title.
    pub title: Option<String>,
    /// New start time (ms).
    pub start_ms: Option<i64>,
    /// New end time; `Some(None)` removes it.
    pub end_ms: Option<Option<i64>>,
    /// New expected attendance.
    pub expected_attendees: Option<u32>,
    /// New requested venue; `Some(None)` removes it.
    pub venue_id: Option<Option<String>>,
}

impl EventUpdate {
    /// An update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Moves the start.
    pub fn start(mut self, start_ms: i64) -> Self {
        self.start_ms = Some(start_ms);
        self
    }

    /// Sets or clears the end.
    pub fn end(mut self, end_ms: Option<i64>) -> Self {
        self.end_ms = Some(end_ms);
        self
    }

    /// Changes the expected attendance.
    pub fn attendees(mut self, attendees: u32) -> Self {
        self.expected_attendees = Some(attendees);
        self
    }

    /// Requests a venue, or clears the request.
    pub fn venue(mut self, venue_id: Option<&str>) -> Self {
        self.venue_id = Some(venue_id.map(str::to_string));
        self
    }

    fn apply(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(start_ms) = self.start_ms {
            event.start_ms = start_ms;
        }
        if let Some(end_ms) = self.end_ms {
            event.end_ms = end_ms;
        }
        if let Some(attendees) = self.expected_attendees {
            event.expected_attendees = attendees;
        }
        if let Some(venue_id) = self.venue_id {
            event.venue_id = venue_id;
        }
    }
}

/// Which allocation-relevant fields differ between two event states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventDelta {
    /// Expected attendance changed.
    pub attendees: bool,
    /// Start changed.
    pub start: bool,
    /// End changed.
    pub end: bool,
    /// Requested venue changed.
    pub venue: bool,
    /// Moved from pending to approved.
    pub approved: bool,
}

impl EventDelta {
    /// Compares two states of the same event.
    pub fn between(before: &Event, after: &Event) -> Self {
        Self {
            attendees: before.expected_attendees != after.expected_attendees,
            start: before.start_ms != after.start_ms,
            end: before.end_ms != after.end_ms,
            venue: before.venue_id != after.venue_id,
            approved: !before.is_approved() && after.is_approved(),
        }
    }

    /// Whether a field the booking depends on changed.
    pub fn fields_changed(&self) -> bool {
        self.attendees || self.start || self.end || self.venue
    }

    /// Whether `after` needs a fresh allocation.
    pub fn requires_allocation(&self, after: &Event) -> bool {
        after.is_approved() && (self.approved || self.fields_changed())
    }
}

/// Result of a lifecycle operation.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleOutcome {
    /// Event as stored after the operation.
    pub event: Event,
    /// Allocation result, if allocation ran.
    pub allocation: Option<Allocation>,
    /// Messages to show the user.
    pub warnings: Vec<String>,
}

/// Event write path with allocation triggers.
///
/// # Example
///
/// ```
/// use u_venue::allocator::VenueAllocator;
/// use u_venue::config::{AllocatorConfig, ScoringPolicy};
/// use u_venue::lifecycle::{EventLifecycle, EventUpdate, Proposer};
/// use u_venue::models::{Event, Venue, HOUR_MS};
/// use u_venue::store::MemoryStore;
///
/// let store = MemoryStore::new()
///     .with_venue(Venue::new("A", 50))
///     .with_venue(Venue::new("B", 100));
/// let config = AllocatorConfig::default().with_policy(ScoringPolicy::TightestFit);
/// let mut lifecycle = EventLifecycle::with_allocator(store, VenueAllocator::with_config(config));
///
/// let event = Event::new("E1", 10 * HOUR_MS).with_attendees(40).with_venue("A");
/// let created = lifecycle.create(event, Proposer::privileged("admin")).unwrap();
/// assert_eq!(created.event.venue_id.as_deref(), Some("A"));
///
/// let grown = lifecycle.update("E1", EventUpdate::new().attendees(80)).unwrap();
/// assert_eq!(grown.event.venue_id.as_deref(), Some("B"));
/// ```
#[derive(Debug, Clone)]
pub struct EventLifecycle<S> {
    store: S,
    allocator: VenueAllocator,
    history: Vec<ApprovalRecord>,
}

impl<S> EventLifecycle<S>
where
    S: VenueStore + EventStore,
{
    /// Creates a service with a default allocator.
    pub fn new(store: S) -> Self {
        Self::with_allocator(store, VenueAllocator::new())
    }

    /// Creates a service with the given allocator.
    pub fn with_allocator(store: S, allocator: VenueAllocator) -> Self {
        Self {
            store,
            allocator,
            history: Vec::new(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the service, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Every approval decision, oldest first.
    pub fn history(&self) -> &[ApprovalRecord] {
        &self.history
    }

    /// Approval decisions for one event, oldest first.
    pub fn history_for(&self, event_id: &str) -> Vec<&ApprovalRecord> {
        self.history.iter().filter(|r| r.event_id == event_id).collect()
    }

    /// Stores a new event, approving it if the proposer is privileged.
    ///
    /// Allocates a venue if the stored event is approved.
    pub fn create(&mut self, mut event: Event, proposer: Proposer) -> Result<LifecycleOutcome, LifecycleError> {
        event.proposed_by = Some(proposer.user_id.clone());
        if proposer.privileged && event.status == EventStatus::Pending {
            event.status = EventStatus::Approved;
        }
        info!(event = %event.id, status = ?event.status, "event created");
        self.store.save_event(event.clone());

        if event.is_approved() {
            self.allocate(event)
        } else {
            Ok(LifecycleOutcome {
                event,
                allocation: None,
                warnings: Vec::new(),
            })
        }
    }

    /// Approves an event and allocates a venue for it.
    ///
    /// Approving an already approved event does nothing.
    pub fn approve(&mut self, event_id: &str, actor: &str) -> Result<LifecycleOutcome, LifecycleError> {
        let mut event = self.load(event_id)?;
        if event.is_approved() {
            return Ok(LifecycleOutcome {
                event,
                allocation: None,
                warnings: Vec::new(),
            });
        }

        event.status = EventStatus::Approved;
        self.store.save_event(event.clone());
        self.history.push(ApprovalRecord {
            event_id: event.id.clone(),
            actor: actor.to_string(),
            action: ApprovalAction::Approve,
            reason: None,
        });
        info!(event = %event.id, actor, "event approved");

        self.allocate(event)
    }

    /// Rejects an event and releases its booking.
    pub fn reject(
        &mut self,
        event_id: &str,
        actor: &str,
        reason: Option<&str>,
    ) -> Result<LifecycleOutcome, LifecycleError> {
        let mut event = self.load(event_id)?;
        event.status = EventStatus::Rejected;
        self.store.save_event(event.clone());
        let released = self.allocator.release(&mut self.store, &event.id);
        self.history.push(ApprovalRecord {
            event_id: event.id.clone(),
            actor: actor.to_string(),
            action: ApprovalAction::Reject,
            reason: reason.map(str::to_string),
        });
        info!(event = %event.id, actor, released, "event rejected");

        Ok(LifecycleOutcome {
            event,
            allocation: None,
            warnings: Vec::new(),
        })
    }

    /// Applies field changes, re-allocating if an approved event's
    /// attendance, window or requested venue changed.
    pub fn update(&mut self, event_id: &str, update: EventUpdate) -> Result<LifecycleOutcome, LifecycleError> {
        let before = self.load(event_id)?;
        let mut after = before.clone();
        update.apply(&mut after);
        self.store.save_event(after.clone());

        let delta = EventDelta::between(&before, &after);
        if delta.requires_allocation(&after) {
            info!(event = %after.id, ?delta, "allocation-relevant fields changed");
            self.allocate(after)
        } else {
            Ok(LifecycleOutcome {
                event: after,
                allocation: None,
                warnings: Vec::new(),
            })
        }
    }

    fn load(&self, event_id: &str) -> Result<Event, LifecycleError> {
        self.store
            .event(event_id)
            .ok_or_else(|| LifecycleError::UnknownEvent(event_id.to_string()))
    }

    fn allocate(&mut self, mut event: Event) -> Result<LifecycleOutcome, LifecycleError> {
        let previous = self.store.booking_for_event(&event.id).map(|b| b.venue_id);
        // A venue equal to the current booking was resolved, not requested
        let requested = event.venue_id.clone().filter(|v| previous.as_ref() != Some(v));

        let allocation = match self.allocator.allocate(&mut self.store, &mut event) {
            Err(e) if e.is_booking_conflict() => {
                warn!(event = %event.id, error = %e, "venue taken concurrently, retrying once");
                self.allocator.allocate(&mut self.store, &mut event)?
            }
            other => other?,
        };

        let mut warnings = Vec::new();
        match (&allocation, requested.as_deref()) {
            (Allocation::Unavailable, _) => {
                warnings.push(format!("No suitable venue available for {}.", label(&event)));
            }
            (Allocation::Booked { venue_id, .. }, Some(requested)) => {
                if venue_id != requested {
                    warnings.push(format!(
                        "Requested venue {requested} could not host {}; booked {venue_id} instead.",
                        label(&event)
                    ));
                }
            }
            (Allocation::Booked { venue_id, .. }, None) => {
                if let Some(previous) = previous.filter(|p| p != venue_id) {
                    warnings.push(format!("{} moved from venue {previous} to {venue_id}.", label(&event)));
                }
            }
        }

        Ok(LifecycleOutcome {
            event,
            allocation: Some(allocation),
            warnings,
        })
    }
}

/// Title for messages, falling back to the ID.
fn label(event: &Event) -> &str {
    if event.title.is_empty() {
        &event.id
    } else {
        &event.title
    }
}
