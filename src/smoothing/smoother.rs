//! Variance-minimizing resource smoothing.
//!
//! # Algorithm
//!
//! 1. Place every task at its earliest start. The span of this placement
//!    fixes the timeline and the project duration bound.
//! 2. Keep critical (zero-slack) tasks where they are.
//! 3. Visit non-critical tasks by slack, largest first (stable on ties).
//! 4. For each start `d` in `[earliest_start, latest_start]`, skip `d` if
//!    the project would end past the bound; otherwise compute the full
//!    demand curve with the task at `d` and its variance.
//! 5. Commit the `d` with the strictly smallest variance (earliest wins
//!    ties) before visiting the next task.
//!
//! Each candidate is an immutable snapshot; committed positions change only
//! when a winner is chosen. Because the committed start is itself a
//! candidate, the variance never increases from one task to the next.
//!
//! # Complexity
//! O(k × w × n × T) where k = non-critical tasks, w = window size,
//! n = tasks, T = timeline length.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::SmoothingResult;
use crate::error::{RescheduleError, Result};
use crate::models::{DemandCurve, Task, Timeline};
use crate::validation::{validate_windows, ValidationError};

/// Smoothing configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Wall-clock limit, checked between tasks.
    pub time_limit: Option<Duration>,
}

/// A scored start for one task.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    start: i64,
    variance: f64,
}

/// Greedy, sequential demand-variance minimizer.
///
/// # Example
///
/// ```
/// use u_leveling::models::Task;
/// use u_leveling::smoothing::ResourceSmoother;
///
/// let tasks = vec![
///     Task::new("base", 6, 2.0).with_window(0, 0),
///     Task::new("a", 3, 1.0).with_window(0, 0),
///     Task::new("b", 3, 1.0).with_window(0, 3),
/// ];
/// let result = ResourceSmoother::new().smooth(&tasks).unwrap();
/// assert_eq!(result.optimized_task("b").unwrap().start, 3);
/// assert!(result.variance_reduction() > 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResourceSmoother {
    config: SmoothingConfig,
}

impl ResourceSmoother {
    /// Creates a smoother with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: SmoothingConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets a wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.config.time_limit = Some(limit);
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Smooths the demand curve without extending the project.
    ///
    /// `start` on the input is ignored: the original placement is every
    /// task at its earliest start.
    ///
    /// # Errors
    /// - `Validation` for an empty set, bad durations/demands, or inverted
    ///   windows.
    /// - `TimeLimitExceeded` if the configured limit elapses.
    pub fn smooth(&self, tasks: &[Task]) -> Result<SmoothingResult> {
        validate_windows(tasks)?;

        let started = Instant::now();
        let original: Vec<Task> = tasks
            .iter()
            .map(|t| t.placed_at(t.earliest_start))
            .collect();

        let timeline = Timeline::covering(&original)
            .ok_or_else(|| RescheduleError::from(vec![ValidationError::empty_task_set()]))?;
        let project_start = timeline.start;
        let project_duration = timeline.duration();
        let latest_allowed_end = project_start + project_duration;

        let original_demand = DemandCurve::compute(&original, &timeline);

        let mut order: Vec<usize> = (0..original.len())
            .filter(|&i| !original[i].is_critical())
            .collect();
        order.sort_by(|&a, &b| original[b].slack().cmp(&original[a].slack()));

        let mut committed = original.clone();
        for (done, &idx) in order.iter().enumerate() {
            self.check_time_limit(started, done, order.len())?;

            if let Some(best) = best_start(&committed, idx, &timeline, latest_allowed_end) {
                debug!(
                    "event=smooth_task module=smoothing status=committed task_id={} start={} variance={:.4}",
                    committed[idx].id, best.start, best.variance
                );
                committed[idx] = committed[idx].placed_at(best.start);
            }
        }

        let optimized_demand = DemandCurve::compute(&committed, &timeline);
        let optimized_end = committed.iter().map(Task::end).max().unwrap_or(project_start);

        info!(
            "event=smooth module=smoothing status=ok tasks={} movable={} variance_before={:.4} variance_after={:.4} elapsed_ms={}",
            committed.len(),
            order.len(),
            original_demand.variance(),
            optimized_demand.variance(),
            started.elapsed().as_millis()
        );

        Ok(SmoothingResult {
            original_tasks: original,
            optimized_tasks: committed,
            original_demand,
            optimized_demand,
            timeline,
            project_duration,
            optimized_project_duration: optimized_end - project_start,
        })
    }

    fn check_time_limit(&self, started: Instant, completed: usize, total: usize) -> Result<()> {
        match self.config.time_limit {
            Some(limit) if started.elapsed() >= limit => {
                warn!(
                    "event=smooth module=smoothing status=timeout completed={completed} total={total}"
                );
                Err(RescheduleError::TimeLimitExceeded { completed, total })
            }
            _ => Ok(()),
        }
    }
}

/// Scans the window of `committed[idx]` and returns the lowest-variance start.
///
/// Other tasks stay at their committed positions. Returns `None` only if
/// every start in the window breaks the duration bound.
fn best_start(
    committed: &[Task],
    idx: usize,
    timeline: &Timeline,
    latest_allowed_end: i64,
) -> Option<Candidate> {
    let task = &committed[idx];
    let others_end = committed
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != idx)
        .map(|(_, t)| t.end())
        .max();

    // Starts past this end beyond the bound on their own.
    let last = task
        .latest_start
        .min(latest_allowed_end.saturating_sub(task.duration));

    let mut best: Option<Candidate> = None;
    for d in task.earliest_start..=last {
        let candidate = task.placed_at(d);
        let project_end = others_end.map_or(candidate.end(), |e| e.max(candidate.end()));
        if project_end > latest_allowed_end {
            continue;
        }

        let trial = committed
            .iter()
            .enumerate()
            .map(|(i, t)| if i == idx { &candidate } else { t });
        let variance = DemandCurve::compute(trial, timeline).variance();

        if best.map_or(true, |b| variance < b.variance) {
            best = Some(Candidate { start: d, variance });
        }
    }
    best
}

/// Smooths tasks with the default configuration.
///
/// See [`ResourceSmoother::smooth`].
pub fn smooth(tasks: &[Task]) -> Result<SmoothingResult> {
    ResourceSmoother::new().smooth(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    /// Two critical tasks and two movable ones, day 0 = 2025-06-11.
    fn canonical_tasks() -> Vec<Task> {
        vec![
            Task::new("1", 5, 3.0).with_window(0, 0),
            Task::new("2", 5, 3.0).with_window(5, 5),
            Task::new("3", 4, 2.0).with_window(0, 3),
            Task::new("4", 4, 2.0).with_window(2, 5),
        ]
    }

    fn random_tasks(rng: &mut SmallRng, n: usize) -> Vec<Task> {
        (0..n)
            .map(|i| {
                let es = rng.random_range(0..10);
                let slack = rng.random_range(0..5);
                let duration = rng.random_range(1..6);
                let demand = rng.random_range(1..5) as f64;
                Task::new(format!("T{i}"), duration, demand).with_window(es, es + slack)
            })
            .collect()
    }

    #[test]
    fn test_canonical_scenario() {
        let result = smooth(&canonical_tasks()).unwrap();

        assert_eq!(result.timeline, Timeline::spanning(0, 10));
        assert_eq!(result.project_duration, 10);
        assert_eq!(result.optimized_project_duration, 10);

        assert_eq!(
            result.original_demand.values(),
            &[5.0, 5.0, 7.0, 7.0, 5.0, 5.0, 3.0, 3.0, 3.0, 3.0, 0.0]
        );
        assert_eq!(
            result.optimized_demand.values(),
            &[5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 3.0, 3.0, 0.0]
        );

        assert_eq!(result.optimized_task("3").unwrap().start, 0);
        // Days 4 and 5 tie for task 4; the earlier one wins.
        assert_eq!(result.optimized_task("4").unwrap().start, 4);
        assert_eq!(result.moved_task_ids(), vec!["4"]);

        assert!((result.original_stats().variance - 458.0 / 121.0).abs() < 1e-10);
        assert!((result.optimized_stats().variance - 282.0 / 121.0).abs() < 1e-10);
        assert!(result.variance_reduction() > 0.0);
    }

    #[test]
    fn test_critical_tasks_stay_put() {
        let result = smooth(&canonical_tasks()).unwrap();
        for id in ["1", "2"] {
            let before = result.original_tasks.iter().find(|t| t.id == id).unwrap();
            let after = result.optimized_task(id).unwrap();
            assert!(after.is_critical());
            assert_eq!(before.start, after.start);
        }
    }

    #[test]
    fn test_output_keeps_input_order() {
        let result = smooth(&canonical_tasks()).unwrap();
        let ids: Vec<&str> = result.optimized_tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_input_start_is_ignored() {
        let mut tasks = canonical_tasks();
        tasks[2].start = 3;
        let result = smooth(&tasks).unwrap();
        assert_eq!(result.original_tasks[2].start, 0);
    }

    #[test]
    fn test_duration_bound_skips_candidates() {
        // Moving "b" to day 8 would flatten the curve but end past day 10.
        let tasks = vec![
            Task::new("a", 10, 1.0).with_window(0, 0),
            Task::new("b", 3, 1.0).with_window(0, 9),
        ];
        let result = smooth(&tasks).unwrap();
        let b = result.optimized_task("b").unwrap();
        assert!(b.start <= 7);
        assert!(b.end() <= 10);
        assert_eq!(result.optimized_project_duration, 10);
    }

    #[test]
    fn test_larger_slack_visited_first() {
        // "wide" is visited first and claims the quiet tail, so "narrow"
        // keeps its earliest start.
        let tasks = vec![
            Task::new("base", 6, 2.0).with_window(0, 0),
            Task::new("narrow", 3, 1.0).with_window(0, 1),
            Task::new("wide", 3, 1.0).with_window(0, 3),
        ];
        let result = smooth(&tasks).unwrap();
        assert_eq!(result.optimized_task("wide").unwrap().start, 3);
        assert_eq!(result.optimized_task("narrow").unwrap().start, 0);
    }

    #[test]
    fn test_all_critical_is_identity() {
        let tasks = vec![
            Task::new("a", 2, 1.0).with_window(0, 0),
            Task::new("b", 2, 1.0).with_window(1, 1),
        ];
        let result = smooth(&tasks).unwrap();
        assert_eq!(result.original_tasks, result.optimized_tasks);
        assert_eq!(result.original_demand, result.optimized_demand);
    }

    #[test]
    fn test_validation_errors() {
        assert!(smooth(&[]).unwrap_err().validation_errors().is_some());

        let tasks = vec![Task::new("a", 2, 1.0).with_window(3, 1)];
        let err = smooth(&tasks).unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap()[0].kind,
            ValidationErrorKind::InvertedWindow
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        let tasks = vec![Task::new("a", i64::MAX, 1.0).with_window(1, 2)];
        let err = smooth(&tasks).unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap()[0].kind,
            ValidationErrorKind::OutOfRange
        );
    }

    #[test]
    fn test_wide_window_is_bounded_by_project_end() {
        let tasks = vec![
            Task::new("base", 6, 2.0).with_window(0, 0),
            Task::new("free", 2, 1.0).with_window(0, i64::MAX - 10),
        ];
        let result = smooth(&tasks).unwrap();
        assert!(result.optimized_task("free").unwrap().end() <= 6);
    }

    #[test]
    fn test_random_sets_respect_bounds() {
        let mut rng = SmallRng::seed_from_u64(2025);
        for _ in 0..50 {
            let tasks = random_tasks(&mut rng, 7);
            let result = smooth(&tasks).unwrap();
            let limit = result.project_start() + result.project_duration;

            assert!(result.optimized_project_duration <= result.project_duration);
            assert!(result.optimized_demand.variance() <= result.original_demand.variance());

            for (before, after) in result.original_tasks.iter().zip(&result.optimized_tasks) {
                assert!(after.end() <= limit);
                assert!(after.is_within_window());
                assert_eq!(before.duration, after.duration);
                if before.is_critical() {
                    assert_eq!(before.start, after.start);
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let mut rng = SmallRng::seed_from_u64(99);
        let tasks = random_tasks(&mut rng, 9);
        let a = smooth(&tasks).unwrap();
        let b = smooth(&tasks).unwrap();
        assert_eq!(a.optimized_tasks, b.optimized_tasks);
        assert_eq!(a.optimized_demand, b.optimized_demand);
    }

    #[test]
    fn test_time_limit_between_tasks() {
        let smoother = ResourceSmoother::new().with_time_limit(Duration::ZERO);
        assert_eq!(smoother.config().time_limit, Some(Duration::ZERO));
        assert!(matches!(
            smoother.smooth(&canonical_tasks()),
            Err(RescheduleError::TimeLimitExceeded {
                completed: 0,
                total: 2
            })
        ));

        let relaxed = ResourceSmoother::new().with_time_limit(Duration::from_secs(60));
        assert_eq!(
            relaxed.smooth(&canonical_tasks()).unwrap().optimized_task("4").unwrap().start,
            4
        );

        let config: SmoothingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SmoothingConfig::default());
    }
}
