//! Resource leveling and capacity conflict detection.
//!
//! Leveling moves tasks later in time until aggregate demand never exceeds
//! a hard capacity ceiling. There is no start window: a task may slide
//! forward arbitrarily far (up to a configurable safety horizon), never
//! backward.
//!
//! # Algorithm
//!
//! `ResourceLeveler` is greedy and order-sensitive: tasks are placed one at
//! a time in ascending original start, each at the first conflict-free
//! start found by unit forward shifts. It is not optimal; later tasks may
//! absorb all of the delay.
//!
//! # References
//!
//! - Kerzner (2017), "Project Management", Ch. 12: Resource Leveling
//! - Neumann, Schwindt & Zimmermann (2003), "Project Scheduling with Time
//!   Windows and Scarce Resources"

mod conflict;
mod leveler;

pub use conflict::{event_points, find_conflict, find_conflicts, Conflict};
pub use leveler::{level, LevelingConfig, LevelingResult, ResourceLeveler, DEFAULT_MAX_OFFSET};
