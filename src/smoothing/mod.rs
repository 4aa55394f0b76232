//! Resource smoothing.
//!
//! Smoothing moves only non-critical tasks, each within its own
//! `[earliest_start, latest_start]` window, to flatten the aggregate demand
//! curve. The project span measured from the earliest-start placement is a
//! hard upper bound: no move may finish the project later.
//!
//! # Objective
//!
//! Population variance of the demand curve over the fixed timeline. With
//! the timeline and total work fixed, the mean is constant, so minimizing
//! variance is minimizing the sum of squared demand.
//!
//! # References
//!
//! - Harris (1978), "Packing Method for Resource Leveling (PACK)"
//! - PMI (2021), "PMBOK Guide", §6.5.2.3: Resource Optimization

mod result;
mod smoother;

pub use result::SmoothingResult;
pub use smoother::{smooth, ResourceSmoother, SmoothingConfig};
