//! Volunteer task-assignment advice.
//!
//! Two independent tools for a host looking at an event's task board:
//!
//! - [`TaskAdvisor::suggest`]: greedy load balancing. Each unassigned task
//!   goes to the volunteer with the fewest open tasks, counting the
//!   suggestions already made.
//! - [`TaskAdvisor::spanning_tree`]: a minimum spanning tree over
//!   volunteers, weighted by how cheaply each pair can coordinate. Pairs of
//!   experienced volunteers are cheapest.
//!
//! The spanning tree does not feed into `suggest`. Suggestions are advisory:
//! nothing here mutates task state.
//!
//! # Reference
//! Kruskal (1956), "On the shortest spanning subtree of a graph"

mod union_find;

pub use union_find::UnionFind;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::AdvisorConfig;
use crate::models::{Event, Task, Volunteer};

/// Past participation counts per user.
pub trait ParticipationHistory {
    /// Number of events the user has taken part in.
    fn participation_count(&self, user_id: &str) -> u32;
}

impl ParticipationHistory for HashMap<String, u32> {
    fn participation_count(&self, user_id: &str) -> u32 {
        self.get(user_id).copied().unwrap_or(0)
    }
}

/// A suggested task → volunteer pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Task to assign.
    pub task_id: String,
    /// Suggested volunteer.
    pub volunteer_id: String,
}

/// Suggestions in task order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSuggestions {
    /// Pairings, one per unassigned task.
    pub suggestions: Vec<Suggestion>,
}

impl TaskSuggestions {
    /// Suggested volunteer for a task.
    pub fn volunteer_for(&self, task_id: &str) -> Option<&str> {
        self.suggestions
            .iter()
            .find(|s| s.task_id == task_id)
            .map(|s| s.volunteer_id.as_str())
    }

    /// Number of suggestions.
    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    /// Whether there are no suggestions.
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// Iterates over the pairings.
    pub fn iter(&self) -> impl Iterator<Item = &Suggestion> {
        self.suggestions.iter()
    }

    /// Task ID → volunteer ID map.
    pub fn to_map(&self) -> HashMap<String, String> {
        self.suggestions
            .iter()
            .map(|s| (s.task_id.clone(), s.volunteer_id.clone()))
            .collect()
    }
}

/// An edge of the volunteer spanning tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEdge {
    /// First volunteer.
    pub from: String,
    /// Second volunteer.
    pub to: String,
    /// Coordination cost (1..=3).
    pub cost: u8,
}

/// Minimum spanning tree over volunteers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanningTree {
    /// Tree edges in the order Kruskal accepted them.
    pub edges: Vec<TreeEdge>,
}

impl SpanningTree {
    /// Sum of edge costs.
    pub fn total_cost(&self) -> u32 {
        self.edges.iter().map(|e| u32::from(e.cost)).sum()
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the tree has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Coordination cost of a volunteer pair.
///
/// | Experienced | Cost |
/// |-------------|------|
/// | both | 1 |
/// | one | 2 |
/// | neither | 3 |
///
/// A volunteer is experienced with more than `threshold` participations.
pub fn communication_cost(a_participations: u32, b_participations: u32, threshold: u32) -> u8 {
    match (a_participations > threshold, b_participations > threshold) {
        (true, true) => 1,
        (true, false) | (false, true) => 2,
        (false, false) => 3,
    }
}

/// Produces task-assignment advice for an event.
///
/// # Example
///
/// ```
/// use u_venue::advisor::TaskAdvisor;
/// use u_venue::models::{Event, Task, Volunteer};
///
/// let event = Event::new("E1", 0);
/// let volunteers = vec![
///     Volunteer::new("V1", "ann", "E1"),
///     Volunteer::new("V2", "ben", "E1"),
/// ];
/// let tasks = vec![
///     Task::new("T1", "E1").assigned_to("V1"),
///     Task::new("T2", "E1"),
/// ];
///
/// let suggestions = TaskAdvisor::new().suggest(&volunteers, &tasks, &event);
/// assert_eq!(suggestions.volunteer_for("T2"), Some("V2"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskAdvisor {
    config: AdvisorConfig,
}

impl TaskAdvisor {
    /// Creates an advisor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an advisor with the given settings.
    pub fn with_config(config: AdvisorConfig) -> Self {
        Self { config }
    }

    /// Suggests a volunteer for every unassigned task of `event`.
    ///
    /// # Algorithm
    /// 1. Eligible volunteers: approved and signed up for `event`.
    /// 2. Workload = incomplete tasks of `event` assigned to the volunteer.
    /// 3. For each unassigned task in input order, pick the lowest workload
    ///    (first in `volunteers` order on ties) and count the suggestion
    ///    towards that volunteer's workload.
    ///
    /// # Complexity
    /// O(t * v) where t = tasks and v = volunteers.
    pub fn suggest(&self, volunteers: &[Volunteer], tasks: &[Task], event: &Event) -> TaskSuggestions {
        let eligible: Vec<&Volunteer> = volunteers
            .iter()
            .filter(|v| v.is_approved && v.event_id == event.id)
            .collect();
        if eligible.is_empty() || tasks.is_empty() {
            return TaskSuggestions::default();
        }

        let mut workload: Vec<usize> = eligible
            .iter()
            .map(|v| {
                tasks
                    .iter()
                    .filter(|t| {
                        t.event_id == event.id
                            && !t.completed
                            && t.volunteer_id.as_deref() == Some(v.id.as_str())
                    })
                    .count()
            })
            .collect();

        let mut suggestions = Vec::new();
        for task in tasks
            .iter()
            .filter(|t| t.event_id == event.id && t.is_unassigned())
        {
            let Some(pick) = least_loaded(&workload) else {
                break;
            };
            workload[pick] += 1;
            suggestions.push(Suggestion {
                task_id: task.id.clone(),
                volunteer_id: eligible[pick].id.clone(),
            });
        }

        TaskSuggestions { suggestions }
    }

    /// Builds the minimum-cost coordination tree over `volunteers`.
    ///
    /// Edges are sorted by (cost, i, j) and accepted unless they close a
    /// cycle. With fewer than two volunteers the tree is empty.
    pub fn spanning_tree<H>(&self, volunteers: &[Volunteer], history: &H) -> SpanningTree
    where
        H: ParticipationHistory + ?Sized,
    {
        let n = volunteers.len();
        if n < 2 {
            return SpanningTree::default();
        }

        let counts: Vec<u32> = volunteers
            .iter()
            .map(|v| history.participation_count(&v.user_id))
            .collect();
        let threshold = self.config.experienced_threshold;

        let mut edges: Vec<(u8, usize, usize)> = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push((communication_cost(counts[i], counts[j], threshold), i, j));
            }
        }
        edges.sort_unstable();

        let mut sets = UnionFind::new(n);
        let mut tree = Vec::with_capacity(n - 1);
        for (cost, i, j) in edges {
            if sets.union(i, j) {
                tree.push(TreeEdge {
                    from: volunteers[i].id.clone(),
                    to: volunteers[j].id.clone(),
                    cost,
                });
                if tree.len() == n - 1 {
                    break;
                }
            }
        }

        SpanningTree { edges: tree }
    }
}

/// Index of the smallest workload; first wins ties.
fn least_loaded(workload: &[usize]) -> Option<usize> {
    workload
        .iter()
        .enumerate()
        .min_by_key(|&(_, load)| *load)
        .map(|(i, _)| i)
}
