//! Volunteer and task models.
//!
//! Volunteers sign up for an event and, once approved, can be handed
//! tasks. A volunteer's workload is the number of incomplete tasks
//! currently assigned to them for their event.

use serde::{Deserialize, Serialize};

/// A volunteer signed up for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volunteer {
    /// Unique volunteer identifier.
    pub id: String,
    /// Underlying user (keys participation history).
    pub user_id: String,
    /// Event the volunteer signed up for.
    pub event_id: String,
    /// Whether the host approved the sign-up.
    pub is_approved: bool,
}

impl Volunteer {
    /// Creates an approved volunteer.
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        event_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            event_id: event_id.into(),
            is_approved: true,
        }
    }

    /// Sets the approval flag.
    pub fn with_approval(mut self, is_approved: bool) -> Self {
        self.is_approved = is_approved;
        self
    }
}

/// A piece of work on an event's task board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Owning event.
    pub event_id: String,
    /// What needs doing.
    pub description: String,
    /// Assigned volunteer, if any.
    pub volunteer_id: Option<String>,
    /// Whether the task is done.
    pub completed: bool,
}

impl Task {
    /// Creates an unassigned, incomplete task.
    pub fn new(id: impl Into<String>, event_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            event_id: event_id.into(),
            description: String::new(),
            volunteer_id: None,
            completed: false,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Assigns a volunteer.
    pub fn assigned_to(mut self, volunteer_id: impl Into<String>) -> Self {
        self.volunteer_id = Some(volunteer_id.into());
        self
    }

    /// Marks the task complete.
    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Whether no volunteer holds this task.
    #[inline]
    pub fn is_unassigned(&self) -> bool {
        self.volunteer_id.is_none()
    }
}
