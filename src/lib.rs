//! Resource leveling and smoothing for project schedules.
//!
//! Repositions tasks in time either to remove resource over-allocation
//! (leveling) or to flatten the aggregate demand curve without extending
//! the project (smoothing). Both engines are pure, synchronous functions:
//! each call owns its task copies and returns new placements plus the
//! demand curves before and after.
//!
//! # Modules
//!
//! - **`models`**: Domain types (`Task`, `Timeline`, `DemandCurve`, `DemandStats`)
//! - **`leveling`**: Conflict detection and the greedy forward-shifting leveler
//! - **`smoothing`**: Variance-minimizing smoother bounded by the project span
//! - **`records`**: Serializable request/response shapes with calendar dates
//! - **`validation`**: Input integrity checks (empty sets, IDs, durations, windows)
//! - **`error`**: Crate error type
//!
//! # Example
//!
//! ```
//! use u_leveling::leveling::level;
//! use u_leveling::models::Task;
//!
//! let tasks = vec![
//!     Task::spanning("1", 0, 5, 2.0),
//!     Task::spanning("2", 5, 10, 3.0),
//!     Task::spanning("3", 3, 7, 2.0),
//!     Task::spanning("4", 5, 9, 2.0),
//! ];
//! let leveled = level(&tasks, 4.0).unwrap();
//! assert!(u_leveling::leveling::find_conflict(&leveled, 4.0).is_none());
//! ```
//!
//! # Logging
//!
//! Engines emit `key=value` events through the `log` facade; install any
//! `log` backend to see them.
//!
//! # References
//!
//! - Kerzner (2017), "Project Management: A Systems Approach", Ch. 12
//! - Neumann, Schwindt & Zimmermann (2003), "Project Scheduling with Time
//!   Windows and Scarce Resources"

pub mod error;
pub mod leveling;
pub mod models;
pub mod records;
pub mod smoothing;
pub mod validation;

pub use error::{RescheduleError, Result};
