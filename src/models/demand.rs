//! Demand curve and its summary statistics.
//!
//! # Definition
//! For every timeline marker `u`, the curve holds the sum of `demand` over
//! tasks with `start <= u < end`. Values are summed in task order and no
//! rounding is applied.
//!
//! # Variance
//! Population variance (mean of squared deviations from the mean), reduced
//! in ascending marker order so repeated evaluations compare bit-for-bit.

use serde::{Deserialize, Serialize};

use super::{Task, Timeline};

/// Per-unit aggregate resource demand over a timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemandCurve(Vec<f64>);

impl DemandCurve {
    /// Computes the demand curve of `tasks` over `timeline`.
    ///
    /// Accepts any iterator of task references so callers can evaluate a
    /// candidate placement alongside committed tasks without copying them.
    ///
    /// # Complexity
    /// O(tasks × timeline length).
    pub fn compute<'a, I>(tasks: I, timeline: &Timeline) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut values = vec![0.0; timeline.len()];
        for task in tasks {
            for (slot, unit) in values.iter_mut().zip(timeline.units()) {
                if task.is_active_at(unit) {
                    *slot += task.demand;
                }
            }
        }
        Self(values)
    }

    /// Wraps precomputed values.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Demand values, one per marker.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Consumes the curve, returning its values.
    pub fn into_values(self) -> Vec<f64> {
        self.0
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the curve has no markers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Mean demand (0.0 for an empty curve).
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.total() / self.0.len() as f64
    }

    /// Population variance (0.0 for an empty curve).
    pub fn variance(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let sum_sq: f64 = self.0.iter().map(|v| (v - mean) * (v - mean)).sum();
        sum_sq / self.0.len() as f64
    }

    /// Highest single-unit demand (0.0 for an empty curve).
    pub fn peak(&self) -> f64 {
        self.0.iter().copied().fold(0.0, f64::max)
    }

    /// Summary statistics of this curve.
    pub fn stats(&self) -> DemandStats {
        DemandStats::of(self)
    }
}

/// Summary statistics of a demand curve.
///
/// | Field | Definition |
/// |-------|-----------|
/// | mean | total / markers |
/// | variance | population variance |
/// | std_dev | sqrt(variance) |
/// | peak | max single-unit demand |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandStats {
    /// Mean demand per marker.
    pub mean: f64,
    /// Population variance.
    pub variance: f64,
    /// Standard deviation.
    pub std_dev: f64,
    /// Peak demand.
    pub peak: f64,
}

impl DemandStats {
    /// Computes statistics for a curve.
    pub fn of(curve: &DemandCurve) -> Self {
        let variance = curve.variance();
        Self {
            mean: curve.mean(),
            variance,
            std_dev: variance.sqrt(),
            peak: curve.peak(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_sums_active_tasks() {
        let tasks = vec![
            Task::spanning("A", 0, 3, 2.0),
            Task::spanning("B", 2, 5, 1.5),
        ];
        let curve = DemandCurve::compute(&tasks, &Timeline::spanning(0, 5));
        assert_eq!(curve.values(), &[2.0, 2.0, 3.5, 1.5, 1.5, 0.0]);
    }

    #[test]
    fn test_compute_ignores_units_outside_timeline() {
        let tasks = vec![Task::spanning("A", -2, 8, 1.0)];
        let curve = DemandCurve::compute(&tasks, &Timeline::spanning(0, 3));
        assert_eq!(curve.values(), &[1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_variance_population() {
        // [5,5,7,7,5,5,3,3,3,3,0]: total 46, sum of squares 234,
        // variance = 234/11 - (46/11)^2 = 458/121
        let curve =
            DemandCurve::from_values(vec![5.0, 5.0, 7.0, 7.0, 5.0, 5.0, 3.0, 3.0, 3.0, 3.0, 0.0]);
        assert!((curve.total() - 46.0).abs() < 1e-10);
        assert!((curve.mean() - 46.0 / 11.0).abs() < 1e-10);
        assert!((curve.variance() - 458.0 / 121.0).abs() < 1e-10);
        assert!((curve.peak() - 7.0).abs() < 1e-10);
    }

    #[test]
    fn test_flat_curve_has_zero_variance() {
        let curve = DemandCurve::from_values(vec![4.0; 6]);
        assert!(curve.variance().abs() < 1e-10);
    }

    #[test]
    fn test_empty_curve() {
        let curve = DemandCurve::default();
        assert!(curve.is_empty());
        assert!((curve.mean() - 0.0).abs() < 1e-10);
        assert!((curve.variance() - 0.0).abs() < 1e-10);
        assert!((curve.peak() - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_stats() {
        let stats = DemandCurve::from_values(vec![1.0, 3.0]).stats();
        assert!((stats.mean - 2.0).abs() < 1e-10);
        assert!((stats.variance - 1.0).abs() < 1e-10);
        assert!((stats.std_dev - 1.0).abs() < 1e-10);
        assert!((stats.peak - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_curve_serializes_as_array() {
        let curve = DemandCurve::from_values(vec![1.0, 2.5]);
        let json = serde_json::to_string(&curve).unwrap();
        assert_eq!(json, "[1.0,2.5]");
    }
}
