//! Capacity conflict detection by event-point partitioning.
//!
//! # Algorithm
//! 1. Collect every task `start` and `end`, deduplicate, sort ascending.
//! 2. For each consecutive pair `(p_i, p_{i+1})`, sum `demand` over tasks
//!    with `start <= p_i` and `end >= p_{i+1}` (tasks covering the whole
//!    sub-interval).
//! 3. Report intervals whose usage exceeds the capacity.
//!
//! Between two consecutive event points no task starts or ends, so each
//! sub-interval has constant demand and the check is exact for integer
//! times.
//!
//! # Complexity
//! O(p × n) where p = event points, n = tasks.

use serde::{Deserialize, Serialize};

use crate::models::Task;

/// An interval `[start, end)` where summed demand exceeds capacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Interval start (inclusive).
    pub start: i64,
    /// Interval end (exclusive).
    pub end: i64,
    /// Summed demand over the interval.
    pub usage: f64,
}

impl Conflict {
    /// Interval length.
    #[inline]
    pub fn length(&self) -> i64 {
        self.end - self.start
    }

    /// Demand above the capacity ceiling.
    pub fn excess(&self, capacity: f64) -> f64 {
        self.usage - capacity
    }
}

/// Sorted, deduplicated start and end points of a task set.
pub fn event_points<'a, I>(tasks: I) -> Vec<i64>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut points: Vec<i64> = tasks
        .into_iter()
        .flat_map(|t| [t.start, t.end()])
        .collect();
    points.sort_unstable();
    points.dedup();
    points
}

/// Finds the earliest interval whose usage exceeds `capacity`.
///
/// Short-circuits on the first violation in ascending time order.
/// Returns `None` when the task set fits under the ceiling everywhere.
pub fn find_conflict<'a, I>(tasks: I, capacity: f64) -> Option<Conflict>
where
    I: IntoIterator<Item = &'a Task>,
{
    let tasks: Vec<&Task> = tasks.into_iter().collect();
    let found = intervals(&tasks).find(|c| c.usage > capacity);
    found
}

/// Finds every interval whose usage exceeds `capacity`, in time order.
pub fn find_conflicts<'a, I>(tasks: I, capacity: f64) -> Vec<Conflict>
where
    I: IntoIterator<Item = &'a Task>,
{
    let tasks: Vec<&Task> = tasks.into_iter().collect();
    let found = intervals(&tasks).filter(|c| c.usage > capacity).collect();
    found
}

/// Yields every event interval with its usage.
fn intervals<'t>(tasks: &'t [&'t Task]) -> impl Iterator<Item = Conflict> + 't {
    let points = event_points(tasks.iter().copied());
    (0..points.len().saturating_sub(1)).map(move |i| {
        let (lo, hi) = (points[i], points[i + 1]);
        let usage = tasks
            .iter()
            .filter(|t| t.start <= lo && t.end() >= hi)
            .map(|t| t.demand)
            .sum();
        Conflict {
            start: lo,
            end: hi,
            usage,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_points_sorted_unique() {
        let tasks = vec![
            Task::spanning("A", 5, 10, 1.0),
            Task::spanning("B", 0, 5, 1.0),
            Task::spanning("C", 3, 10, 1.0),
        ];
        assert_eq!(event_points(&tasks), vec![0, 3, 5, 10]);
    }

    #[test]
    fn test_no_conflict_under_capacity() {
        let tasks = vec![
            Task::spanning("A", 0, 5, 2.0),
            Task::spanning("B", 3, 7, 2.0),
        ];
        assert!(find_conflict(&tasks, 4.0).is_none());
    }

    #[test]
    fn test_first_conflict_reported() {
        let tasks = vec![
            Task::spanning("A", 0, 10, 2.0),
            Task::spanning("B", 2, 4, 3.0),
            Task::spanning("C", 6, 8, 5.0),
        ];
        let c = find_conflict(&tasks, 4.0).unwrap();
        assert_eq!((c.start, c.end), (2, 4));
        assert!((c.usage - 5.0).abs() < 1e-10);
        assert!((c.excess(4.0) - 1.0).abs() < 1e-10);
        assert_eq!(c.length(), 2);
    }

    #[test]
    fn test_all_conflicts_reported() {
        let tasks = vec![
            Task::spanning("A", 0, 10, 2.0),
            Task::spanning("B", 2, 4, 3.0),
            Task::spanning("C", 6, 8, 5.0),
        ];
        let all = find_conflicts(&tasks, 4.0);
        assert_eq!(all.len(), 2);
        assert_eq!((all[1].start, all[1].end), (6, 8));
        assert!((all[1].usage - 7.0).abs() < 1e-10);
    }

    #[test]
    fn test_touching_tasks_do_not_overlap() {
        // A ends exactly where B starts.
        let tasks = vec![
            Task::spanning("A", 0, 5, 4.0),
            Task::spanning("B", 5, 9, 4.0),
        ];
        assert!(find_conflict(&tasks, 4.0).is_none());
    }

    #[test]
    fn test_usage_equal_to_capacity_is_allowed() {
        let tasks = vec![
            Task::spanning("A", 0, 5, 2.0),
            Task::spanning("B", 0, 5, 2.0),
        ];
        assert!(find_conflict(&tasks, 4.0).is_none());
        assert!(find_conflict(&tasks, 3.9).is_some());
    }

    #[test]
    fn test_empty_set_has_no_conflict() {
        let none: Vec<Task> = Vec::new();
        assert!(find_conflict(&none, 0.0).is_none());
        assert!(event_points(&none).is_empty());
    }

    #[test]
    fn test_accepts_chained_candidate() {
        let placed = vec![Task::spanning("A", 0, 5, 3.0)];
        let candidate = Task::spanning("B", 4, 6, 2.0);
        let c = find_conflict(placed.iter().chain(std::iter::once(&candidate)), 4.0).unwrap();
        assert_eq!((c.start, c.end), (4, 5));
    }
}
