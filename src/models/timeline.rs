//! Discrete project timeline.
//!
//! A timeline is a contiguous run of day markers `[start, end]`, both ends
//! inclusive. The final marker sits on the exclusive end of the latest
//! task, so it always carries zero demand for the placement it was built
//! from.

use serde::{Deserialize, Serialize};

use super::Task;

/// Inclusive range of day markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// First marker (inclusive).
    pub start: i64,
    /// Last marker (inclusive).
    pub end: i64,
}

impl Timeline {
    /// Creates a timeline over `[start, end]`.
    ///
    /// An `end` before `start` yields an empty timeline.
    pub fn spanning(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Builds the timeline covering `min(start)..=max(end)` of a task set.
    ///
    /// Returns `None` for an empty set.
    pub fn covering<'a, I>(tasks: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut bounds: Option<(i64, i64)> = None;
        for task in tasks {
            bounds = Some(match bounds {
                None => (task.start, task.end()),
                Some((lo, hi)) => (lo.min(task.start), hi.max(task.end())),
            });
        }
        bounds.map(|(lo, hi)| Self::spanning(lo, hi))
    }

    /// Project duration: `end - start`.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    /// Number of markers.
    #[inline]
    pub fn len(&self) -> usize {
        let markers = i128::from(self.end) - i128::from(self.start) + 1;
        usize::try_from(markers.max(0)).unwrap_or(usize::MAX)
    }

    /// Whether the timeline has no markers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates markers in ascending order.
    pub fn units(&self) -> impl Iterator<Item = i64> {
        self.start..=self.end
    }

    /// Position of `t` in the timeline, if it is a marker.
    pub fn index_of(&self, t: i64) -> Option<usize> {
        if t < self.start || t > self.end {
            None
        } else {
            usize::try_from(i128::from(t) - i128::from(self.start)).ok()
        }
    }

    /// Whether `t` is a marker of this timeline.
    #[inline]
    pub fn contains(&self, t: i64) -> bool {
        self.index_of(t).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_basics() {
        let tl = Timeline::spanning(0, 10);
        assert_eq!(tl.duration(), 10);
        assert_eq!(tl.len(), 11);
        assert!(tl.contains(0));
        assert!(tl.contains(10));
        assert!(!tl.contains(11));
        assert_eq!(tl.index_of(7), Some(7));
        assert_eq!(tl.index_of(-1), None);
        assert_eq!(tl.units().count(), 11);
    }

    #[test]
    fn test_timeline_covering() {
        let tasks = vec![
            Task::spanning("A", 3, 5, 1.0),
            Task::spanning("B", 1, 4, 1.0),
            Task::spanning("C", 6, 9, 1.0),
        ];
        let tl = Timeline::covering(&tasks).unwrap();
        assert_eq!(tl, Timeline::spanning(1, 9));
    }

    #[test]
    fn test_timeline_empty() {
        let none: Vec<Task> = Vec::new();
        assert!(Timeline::covering(&none).is_none());
        let tl = Timeline::spanning(5, 4);
        assert!(tl.is_empty());
        assert_eq!(tl.units().count(), 0);
    }

    #[test]
    fn test_timeline_full_range_does_not_overflow() {
        let tl = Timeline::spanning(i64::MIN, i64::MAX);
        assert_eq!(tl.duration(), i64::MAX);
        assert!(tl.len() > 0);
        assert!(!tl.is_empty());
        assert!(tl.contains(0));
    }
}
