//! Smoothing output.

use serde::{Deserialize, Serialize};

use crate::models::{DemandCurve, DemandStats, Task, Timeline};

/// Tasks and demand curves before and after smoothing.
///
/// Both curves are computed over the same fixed `timeline`, so they can be
/// compared point by point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingResult {
    /// Input tasks, each placed at its earliest start, in input order.
    pub original_tasks: Vec<Task>,
    /// Optimized tasks, in input order.
    pub optimized_tasks: Vec<Task>,
    /// Demand of the original placement.
    pub original_demand: DemandCurve,
    /// Demand of the optimized placement.
    pub optimized_demand: DemandCurve,
    /// Fixed project timeline `[project_start, project_end]`.
    pub timeline: Timeline,
    /// Duration of the original placement; the optimization bound.
    pub project_duration: i64,
    /// Duration of the optimized placement (never above `project_duration`).
    pub optimized_project_duration: i64,
}

impl SmoothingResult {
    /// First day of the project.
    pub fn project_start(&self) -> i64 {
        self.timeline.start
    }

    /// Statistics of the original demand curve.
    pub fn original_stats(&self) -> DemandStats {
        self.original_demand.stats()
    }

    /// Statistics of the optimized demand curve.
    pub fn optimized_stats(&self) -> DemandStats {
        self.optimized_demand.stats()
    }

    /// Original variance minus optimized variance.
    pub fn variance_reduction(&self) -> f64 {
        self.original_demand.variance() - self.optimized_demand.variance()
    }

    /// Finds an optimized task by ID.
    pub fn optimized_task(&self, id: &str) -> Option<&Task> {
        self.optimized_tasks.iter().find(|t| t.id == id)
    }

    /// IDs of tasks whose start changed.
    pub fn moved_task_ids(&self) -> Vec<&str> {
        self.original_tasks
            .iter()
            .zip(&self.optimized_tasks)
            .filter(|(before, after)| before.start != after.start)
            .map(|(before, _)| before.id.as_str())
            .collect()
    }
}
