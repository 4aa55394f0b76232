//! Serializable request and response records.
//!
//! These are the shapes exchanged with outer layers (an HTTP service, a
//! CLI, a file import). Identifiers may be numbers or strings; smoothing
//! dates use the fixed `YYYY-MM-DD` format and are converted to day ticks
//! relative to the earliest `earliestStart` before any computation.
//!
//! # JSON
//!
//! ```text
//! // leveling request
//! {"tasks": [{"id": 1, "start": 0, "end": 5, "demand": 2}], "capacity": 4}
//!
//! // smoothing request ("es"/"ls" are accepted as aliases)
//! [{"id": 1, "duration": 5, "demand": 3,
//!   "earliestStart": "2025-06-11", "latestStart": "2025-06-11"}]
//! ```

use std::collections::HashMap;
use std::fmt;

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{RescheduleError, Result};
use crate::leveling::ResourceLeveler;
use crate::models::Task;
use crate::smoothing::{ResourceSmoother, SmoothingResult};
use crate::validation::ValidationError;

/// Date format for all calendar fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A task identifier as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric identifier.
    Number(i64),
    /// Textual identifier.
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl RecordId {
    /// Engine task ID for this record.
    ///
    /// Numbers render as digits. Text renders as itself unless it would
    /// read as a number or starts with a quote, in which case it is quoted
    /// and escaped. Distinct record IDs therefore never share a key, so
    /// `1` and `"1"` are two different tasks.
    pub fn task_key(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) if s.parse::<i64>().is_ok() || s.starts_with('"') => format!("{s:?}"),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

// ================================
// Leveling
// ================================

/// A task occupying `[start, end)` with a constant demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelingTaskRecord {
    pub id: RecordId,
    pub start: i64,
    pub end: i64,
    pub demand: f64,
}

/// Leveling input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelingRequest {
    pub tasks: Vec<LevelingTaskRecord>,
    pub capacity: f64,
}

/// A leveled task rendered onto calendar days.
///
/// `finish` is the last occupied day, so a task over `[0, 5)` from
/// 2025-06-11 runs 2025-06-11 through 2025-06-15.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedAssignment {
    pub id: RecordId,
    pub start: NaiveDate,
    pub finish: NaiveDate,
}

impl LevelingTaskRecord {
    /// Creates a record.
    pub fn new(id: impl Into<RecordId>, start: i64, end: i64, demand: f64) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            demand,
        }
    }

    /// Renders this record onto the calendar starting at `origin` (t=0).
    pub fn on_calendar(&self, origin: NaiveDate) -> Result<DatedAssignment> {
        Ok(DatedAssignment {
            id: self.id.clone(),
            start: date_at(origin, self.start)?,
            finish: date_at(origin, self.end.saturating_sub(1))?,
        })
    }

    fn to_task(&self) -> Task {
        Task::spanning(self.id.task_key(), self.start, self.end, self.demand)
    }
}

impl LevelingRequest {
    /// Creates a request.
    pub fn new(tasks: Vec<LevelingTaskRecord>, capacity: f64) -> Self {
        Self { tasks, capacity }
    }
}

/// Levels a request with the default leveler.
///
/// Output records are in placement order (ascending original start).
pub fn level_records(request: &LevelingRequest) -> Result<Vec<LevelingTaskRecord>> {
    level_records_with(&ResourceLeveler::new(), request)
}

/// Levels a request with a configured leveler.
pub fn level_records_with(
    leveler: &ResourceLeveler,
    request: &LevelingRequest,
) -> Result<Vec<LevelingTaskRecord>> {
    let tasks: Vec<Task> = request.tasks.iter().map(LevelingTaskRecord::to_task).collect();
    let leveled = leveler.level(&tasks, request.capacity)?;

    // Validation rejected duplicate keys, so the lookup is one-to-one.
    let ids: HashMap<String, &RecordId> = request
        .tasks
        .iter()
        .map(|r| (r.id.task_key(), &r.id))
        .collect();

    Ok(leveled
        .into_iter()
        .map(|t| LevelingTaskRecord {
            id: ids
                .get(&t.id)
                .map(|id| (*id).clone())
                .unwrap_or_else(|| RecordId::Text(t.id.clone())),
            start: t.start,
            end: t.end(),
            demand: t.demand,
        })
        .collect())
}

// ================================
// Smoothing
// ================================

/// A smoothing input task with calendar-date start window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmoothingTaskRecord {
    pub id: RecordId,
    pub duration: i64,
    pub demand: f64,
    #[serde(alias = "es")]
    pub earliest_start: String,
    #[serde(alias = "ls")]
    pub latest_start: String,
}

/// A task placement in a smoothing report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTaskRecord {
    pub id: RecordId,
    pub duration: i64,
    pub demand: f64,
    pub start: NaiveDate,
    pub latest_start: NaiveDate,
    pub is_critical: bool,
}

/// Smoothing output on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmoothingReport {
    pub original_tasks: Vec<ScheduledTaskRecord>,
    pub optimized_tasks: Vec<ScheduledTaskRecord>,
    pub original_demand: Vec<f64>,
    pub optimized_demand: Vec<f64>,
    pub timeline: Vec<NaiveDate>,
    pub project_duration: i64,
    pub optimized_project_duration: i64,
}

impl SmoothingTaskRecord {
    /// Creates a record.
    pub fn new(
        id: impl Into<RecordId>,
        duration: i64,
        demand: f64,
        earliest_start: impl Into<String>,
        latest_start: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            duration,
            demand,
            earliest_start: earliest_start.into(),
            latest_start: latest_start.into(),
        }
    }
}

/// Smooths calendar records with the default smoother.
pub fn smooth_records(records: &[SmoothingTaskRecord]) -> Result<SmoothingReport> {
    smooth_records_with(&ResourceSmoother::new(), records)
}

/// Smooths calendar records with a configured smoother.
///
/// All dates are parsed before any computation; the first malformed date
/// fails the whole call.
pub fn smooth_records_with(
    smoother: &ResourceSmoother,
    records: &[SmoothingTaskRecord],
) -> Result<SmoothingReport> {
    let windows = records
        .iter()
        .map(|r| -> Result<(NaiveDate, NaiveDate)> {
            Ok((
                parse_date("earliestStart", &r.earliest_start)?,
                parse_date("latestStart", &r.latest_start)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let origin = windows
        .iter()
        .map(|(es, _)| *es)
        .min()
        .ok_or_else(|| RescheduleError::from(vec![ValidationError::empty_task_set()]))?;

    let tasks: Vec<Task> = records
        .iter()
        .zip(&windows)
        .map(|(r, (es, ls))| {
            Task::new(r.id.task_key(), r.duration, r.demand)
                .with_window(day_offset(origin, *es), day_offset(origin, *ls))
        })
        .collect();

    let result = smoother.smooth(&tasks)?;
    to_report(&result, records, origin)
}

fn to_report(
    result: &SmoothingResult,
    records: &[SmoothingTaskRecord],
    origin: NaiveDate,
) -> Result<SmoothingReport> {
    Ok(SmoothingReport {
        original_tasks: render_tasks(records, &result.original_tasks, origin)?,
        optimized_tasks: render_tasks(records, &result.optimized_tasks, origin)?,
        original_demand: result.original_demand.values().to_vec(),
        optimized_demand: result.optimized_demand.values().to_vec(),
        timeline: result
            .timeline
            .units()
            .map(|t| date_at(origin, t))
            .collect::<Result<Vec<_>>>()?,
        project_duration: result.project_duration,
        optimized_project_duration: result.optimized_project_duration,
    })
}

// The smoother preserves input order, so records and tasks zip index-wise.
fn render_tasks(
    records: &[SmoothingTaskRecord],
    tasks: &[Task],
    origin: NaiveDate,
) -> Result<Vec<ScheduledTaskRecord>> {
    records
        .iter()
        .zip(tasks)
        .map(|(r, t)| -> Result<ScheduledTaskRecord> {
            Ok(ScheduledTaskRecord {
                id: r.id.clone(),
                duration: t.duration,
                demand: t.demand,
                start: date_at(origin, t.start)?,
                latest_start: date_at(origin, t.latest_start)?,
                is_critical: t.is_critical(),
            })
        })
        .collect()
}

/// Parses a `YYYY-MM-DD` date, naming the field on failure.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| RescheduleError::Parse {
        field,
        value: value.to_string(),
        source,
    })
}

/// Whole days from `origin` to `date`.
pub fn day_offset(origin: NaiveDate, date: NaiveDate) -> i64 {
    date.signed_duration_since(origin).num_days()
}

/// The calendar date `tick` days after `origin`.
pub fn date_at(origin: NaiveDate, tick: i64) -> Result<NaiveDate> {
    TimeDelta::try_days(tick)
        .and_then(|delta| origin.checked_add_signed(delta))
        .ok_or(RescheduleError::DateOutOfRange { tick })
}
