//! Rescheduling domain models.
//!
//! Provides the data types shared by the leveling and smoothing engines:
//! tasks with a duration, a constant demand and a start window; the
//! discrete project timeline; and the aggregate demand curve.
//!
//! # Domain Mappings
//!
//! | u-leveling | Construction | Software | Events |
//! |------------|--------------|----------|--------|
//! | Task | Work package | Story | Setup job |
//! | demand | Crew size | Engineers | Staff |
//! | Timeline | Site calendar | Sprint days | Build days |
//! | DemandCurve | Crew histogram | Staffing plan | Rota load |

mod demand;
mod task;
mod timeline;

pub use demand::{DemandCurve, DemandStats};
pub use task::Task;
pub use timeline::Timeline;
