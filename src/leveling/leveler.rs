//! Greedy resource leveling.
//!
//! # Algorithm
//!
//! 1. Stable-sort tasks by original start (ties keep input order).
//! 2. For each task, try `start = original start`.
//! 3. Check `placed ∪ {candidate}` with the conflict detector.
//! 4. On conflict, shift the candidate one unit later and retry.
//! 5. Commit the first conflict-free start; fail once the candidate passes
//!    `max(original start) + max_offset`.
//!
//! Tasks never move earlier than their original start. Durations and
//! demands are preserved.
//!
//! # Complexity
//! O(n × s × p × n) where s = shifts per task, p = event points.

use std::iter;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::find_conflict;
use crate::error::{RescheduleError, Result};
use crate::models::{DemandCurve, Task, Timeline};
use crate::validation::validate_leveling;

/// Default shift allowance past the latest original start.
pub const DEFAULT_MAX_OFFSET: i64 = 100;

/// Leveling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelingConfig {
    /// How far past the latest original start a task may be pushed.
    /// Must be non-negative.
    pub max_offset: i64,
    /// Wall-clock limit, checked between tasks.
    pub time_limit: Option<Duration>,
}

impl Default for LevelingConfig {
    fn default() -> Self {
        Self {
            max_offset: DEFAULT_MAX_OFFSET,
            time_limit: None,
        }
    }
}

/// Tasks before and after leveling, with their demand curves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelingResult {
    /// Input tasks, in input order.
    pub original_tasks: Vec<Task>,
    /// Leveled tasks, in placement order (ascending original start).
    pub leveled_tasks: Vec<Task>,
    /// Demand over `timeline` for the input placement.
    pub original_demand: DemandCurve,
    /// Demand over `timeline` for the leveled placement.
    pub leveled_demand: DemandCurve,
    /// Timeline covering both placements.
    pub timeline: Timeline,
    /// Capacity ceiling used.
    pub capacity: f64,
}

impl LevelingResult {
    /// Latest end after leveling minus latest end before.
    pub fn makespan_increase(&self) -> i64 {
        latest_end(&self.leveled_tasks) - latest_end(&self.original_tasks)
    }

    /// Finds a leveled task by ID.
    pub fn leveled_task(&self, id: &str) -> Option<&Task> {
        self.leveled_tasks.iter().find(|t| t.id == id)
    }
}

fn latest_end(tasks: &[Task]) -> i64 {
    tasks.iter().map(Task::end).max().unwrap_or(0)
}

/// Greedy forward-shifting leveler.
///
/// # Example
///
/// ```
/// use u_leveling::leveling::ResourceLeveler;
/// use u_leveling::models::Task;
///
/// let tasks = vec![
///     Task::spanning("A", 0, 4, 3.0),
///     Task::spanning("B", 2, 5, 2.0),
/// ];
/// let leveled = ResourceLeveler::new().level(&tasks, 4.0).unwrap();
/// assert_eq!(leveled[1].start, 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResourceLeveler {
    config: LevelingConfig,
}

impl ResourceLeveler {
    /// Creates a leveler with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: LevelingConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the shift allowance past the latest original start.
    pub fn with_max_offset(mut self, max_offset: i64) -> Self {
        self.config.max_offset = max_offset;
        self
    }

    /// Sets a wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.config.time_limit = Some(limit);
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &LevelingConfig {
        &self.config
    }

    /// Repositions tasks so summed demand never exceeds `capacity`.
    ///
    /// Returns tasks in placement order.
    ///
    /// # Errors
    /// - `Validation` for an empty set, bad durations/demands, bad capacity,
    ///   a negative offset, or a horizon past the supported range.
    /// - `Scheduling` naming the first task that cannot be placed before
    ///   the horizon.
    /// - `TimeLimitExceeded` if the configured limit elapses.
    pub fn level(&self, tasks: &[Task], capacity: f64) -> Result<Vec<Task>> {
        validate_leveling(tasks, capacity, self.config.max_offset)?;

        let started = Instant::now();
        let horizon = tasks
            .iter()
            .map(|t| t.start)
            .max()
            .unwrap_or(0)
            .saturating_add(self.config.max_offset);

        let mut order: Vec<&Task> = tasks.iter().collect();
        order.sort_by_key(|t| t.start);

        let mut placed: Vec<Task> = Vec::with_capacity(tasks.len());
        for (done, task) in order.into_iter().enumerate() {
            self.check_time_limit(started, done, tasks.len())?;

            let mut candidate = task.clone();
            while find_conflict(placed.iter().chain(iter::once(&candidate)), capacity).is_some() {
                candidate = candidate.placed_at(candidate.start + 1);
                if candidate.start > horizon {
                    warn!(
                        "event=level_task module=leveling status=error task_id={} horizon={}",
                        task.id, horizon
                    );
                    return Err(RescheduleError::Scheduling {
                        task_id: task.id.clone(),
                        horizon,
                    });
                }
            }

            debug!(
                "event=level_task module=leveling status=placed task_id={} start={} shift={}",
                candidate.id,
                candidate.start,
                candidate.start - task.start
            );
            placed.push(candidate);
        }

        info!(
            "event=level module=leveling status=ok tasks={} capacity={} elapsed_ms={}",
            placed.len(),
            capacity,
            started.elapsed().as_millis()
        );
        Ok(placed)
    }

    /// Levels tasks and reports both placements with their demand curves.
    pub fn level_with_report(&self, tasks: &[Task], capacity: f64) -> Result<LevelingResult> {
        let leveled = self.level(tasks, capacity)?;

        // Leveling only pushes forward, so the union spans both placements.
        let timeline = Timeline::covering(tasks.iter().chain(leveled.iter()))
            .unwrap_or_else(|| Timeline::spanning(0, 0));

        Ok(LevelingResult {
            original_demand: DemandCurve::compute(tasks, &timeline),
            leveled_demand: DemandCurve::compute(&leveled, &timeline),
            original_tasks: tasks.to_vec(),
            leveled_tasks: leveled,
            timeline,
            capacity,
        })
    }

    fn check_time_limit(&self, started: Instant, completed: usize, total: usize) -> Result<()> {
        match self.config.time_limit {
            Some(limit) if started.elapsed() >= limit => {
                warn!(
                    "event=level module=leveling status=timeout completed={completed} total={total}"
                );
                Err(RescheduleError::TimeLimitExceeded { completed, total })
            }
            _ => Ok(()),
        }
    }
}

/// Levels tasks with the default configuration.
///
/// See [`ResourceLeveler::level`].
pub fn level(tasks: &[Task], capacity: f64) -> Result<Vec<Task>> {
    ResourceLeveler::new().level(tasks, capacity)
}
