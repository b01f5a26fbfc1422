//! Task model.
//!
//! A task is the atomic schedulable unit of a project schedule. It has a
//! fixed duration in whole calendar days, at most one predecessor, and an
//! optional pinned start date. Its scheduled dates are outputs of the
//! propagation engine and are never edited by hand.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Relationship between a predecessor's dates and its successor's dates.
///
/// # Arithmetic
/// With predecessor `P`, successor `T`, lag `L` and `T`'s duration `d`:
///
/// | Type | `T.start` |
/// |------|-----------|
/// | FS | `P.end + L` |
/// | SS | `P.start + L` |
/// | FF | `P.end + L - d` |
/// | SF | `P.start + L - d` |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyType {
    /// Finish-to-Start.
    #[default]
    FS,
    /// Start-to-Start.
    SS,
    /// Finish-to-Finish.
    FF,
    /// Start-to-Finish.
    SF,
}

impl DependencyType {
    /// All dependency types.
    pub const ALL: [DependencyType; 4] = [Self::FS, Self::SS, Self::FF, Self::SF];

    /// Short code (`"FS"`, `"SS"`, `"FF"`, `"SF"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FS => "FS",
            Self::SS => "SS",
            Self::FF => "FF",
            Self::SF => "SF",
        }
    }

    /// Offset in days from the predecessor's anchor date to the successor's
    /// start date, excluding lag.
    ///
    /// Returns `(anchor_is_end, offset)`: the anchor is the predecessor's end
    /// for FS/FF and its start for SS/SF; FF/SF back-compute the start from
    /// the successor's own duration.
    pub(crate) fn anchor(&self, duration_days: i32) -> (bool, i64) {
        match self {
            Self::FS => (true, 0),
            Self::SS => (false, 0),
            Self::FF => (true, -i64::from(duration_days)),
            Self::SF => (false, -i64::from(duration_days)),
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyType {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FS" => Ok(Self::FS),
            "SS" => Ok(Self::SS),
            "FF" => Ok(Self::FF),
            "SF" => Ok(Self::SF),
            _ => Err(ScheduleError::InvalidDependencyType(s.to_string())),
        }
    }
}

/// How a task's duration was determined. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationType {
    /// Entered directly.
    #[default]
    Fixed,
    /// Derived from other inputs by the caller.
    Calculated,
}

/// Workflow status of a task.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not yet begun.
    #[default]
    NotStarted,
    /// Work under way.
    InProgress,
    /// Finished.
    Completed,
    /// Running behind its scheduled dates.
    Delayed,
    /// Waiting on something outside the schedule.
    Blocked,
}

/// A schedulable task.
///
/// # Date Model
/// All dates are whole calendar days. `scheduled_start` and `scheduled_end`
/// are owned by the propagation engine: they are `None` until the first
/// recomputation, and afterwards always satisfy
/// `scheduled_end == scheduled_start + duration_days`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Owning schedule.
    pub schedule_id: String,
    /// Owning phase. Only `None` while a task is being constructed.
    pub phase_id: Option<String>,
    /// Display name.
    pub name: String,

    /// Duration in calendar days (0 for milestones).
    pub duration_days: i32,
    /// Informational duration origin.
    #[serde(default)]
    pub duration_type: DurationType,
    /// Task whose dates this task is scheduled relative to.
    pub predecessor_id: Option<String>,
    /// Relationship to the predecessor. Treated as FS when unset.
    pub predecessor_type: Option<DependencyType>,
    /// Signed day offset applied on top of the dependency arithmetic.
    #[serde(default)]
    pub lag_days: i32,
    /// Whether `fixed_date` pins the start.
    #[serde(default)]
    pub is_date_fixed: bool,
    /// Pinned start date, used when `is_date_fixed` is set.
    pub fixed_date: Option<NaiveDate>,

    /// Computed start date.
    pub scheduled_start: Option<NaiveDate>,
    /// Computed end date.
    pub scheduled_end: Option<NaiveDate>,

    /// Workflow status.
    #[serde(default)]
    pub status: TaskStatus,
    /// Completion percentage (0-100).
    #[serde(default)]
    pub percent_complete: u8,
    /// Milestone marker.
    #[serde(default)]
    pub is_milestone: bool,
    /// Critical-path marker. Assigned externally, never derived here.
    #[serde(default)]
    pub is_critical_path: bool,
    /// Recorded actual start.
    pub actual_start: Option<NaiveDate>,
    /// Recorded actual end.
    pub actual_end: Option<NaiveDate>,
    /// Display and processing order.
    #[serde(default)]
    pub sort_order: i32,
    /// Owner display name.
    pub assigned_to_name: Option<String>,
}

impl Task {
    /// Creates a task with the given id in the given schedule.
    pub fn new(id: impl Into<String>, schedule_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            schedule_id: schedule_id.into(),
            phase_id: None,
            name: String::new(),
            duration_days: 0,
            duration_type: DurationType::Fixed,
            predecessor_id: None,
            predecessor_type: None,
            lag_days: 0,
            is_date_fixed: false,
            fixed_date: None,
            scheduled_start: None,
            scheduled_end: None,
            status: TaskStatus::NotStarted,
            percent_complete: 0,
            is_milestone: false,
            is_critical_path: false,
            actual_start: None,
            actual_end: None,
            sort_order: 0,
            assigned_to_name: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Attaches the task to a phase.
    pub fn in_phase(mut self, phase_id: impl Into<String>) -> Self {
        self.phase_id = Some(phase_id.into());
        self
    }

    /// Sets the duration in days.
    pub fn with_duration(mut self, days: i32) -> Self {
        self.duration_days = days;
        self
    }

    /// Sets the predecessor and dependency type.
    pub fn after(mut self, predecessor_id: impl Into<String>, kind: DependencyType) -> Self {
        self.predecessor_id = Some(predecessor_id.into());
        self.predecessor_type = Some(kind);
        self
    }

    /// Sets the lag (negative for lead time).
    pub fn with_lag(mut self, days: i32) -> Self {
        self.lag_days = days;
        self
    }

    /// Pins the start to a calendar date.
    pub fn fixed_at(mut self, date: NaiveDate) -> Self {
        self.is_date_fixed = true;
        self.fixed_date = Some(date);
        self
    }

    /// Sets the completion percentage.
    pub fn with_percent(mut self, percent: u8) -> Self {
        self.percent_complete = percent;
        self
    }

    /// Sets the workflow status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Marks the task as a milestone.
    pub fn as_milestone(mut self) -> Self {
        self.is_milestone = true;
        self
    }

    /// Marks the task as being on the critical path.
    pub fn on_critical_path(mut self) -> Self {
        self.is_critical_path = true;
        self
    }

    /// Sets the sort order.
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Sets the owner display name.
    pub fn assigned_to(mut self, name: impl Into<String>) -> Self {
        self.assigned_to_name = Some(name.into());
        self
    }

    /// Dependency type in effect (FS when unset).
    pub fn dependency_type(&self) -> DependencyType {
        self.predecessor_type.unwrap_or_default()
    }

    /// The pinned start date, if the task is fixed and has a date.
    pub fn pinned_start(&self) -> Option<NaiveDate> {
        if self.is_date_fixed {
            self.fixed_date
        } else {
            None
        }
    }

    /// Places the task at `start`, deriving `scheduled_end`.
    ///
    /// Returns `false` and leaves the task untouched if the end date is not
    /// representable.
    pub(crate) fn place(&mut self, start: NaiveDate) -> bool {
        match shift_days(start, i64::from(self.duration_days)) {
            Some(end) => {
                self.scheduled_start = Some(start);
                self.scheduled_end = Some(end);
                true
            }
            None => false,
        }
    }

    /// Computed (start, end) pair, if both are set.
    pub fn scheduled_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.scheduled_start?, self.scheduled_end?))
    }

    /// Whether the task has been completed.
    pub fn is_complete(&self) -> bool {
        self.status == TaskStatus::Completed || self.percent_complete >= 100
    }
}

/// Adds a signed number of whole days to a date.
///
/// Returns `None` when the result falls outside chrono's calendar range.
pub(crate) fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_task_builder() {
        let task = Task::new("T2", "S1")
            .with_name("Framing")
            .in_phase("P1")
            .with_duration(10)
            .after("T1", DependencyType::SS)
            .with_lag(-2)
            .with_percent(40)
            .with_status(TaskStatus::InProgress)
            .on_critical_path()
            .with_sort_order(3)
            .assigned_to("Dana");

        assert_eq!(task.id, "T2");
        assert_eq!(task.schedule_id, "S1");
        assert_eq!(task.phase_id.as_deref(), Some("P1"));
        assert_eq!(task.duration_days, 10);
        assert_eq!(task.predecessor_id.as_deref(), Some("T1"));
        assert_eq!(task.dependency_type(), DependencyType::SS);
        assert_eq!(task.lag_days, -2);
        assert_eq!(task.percent_complete, 40);
        assert!(task.is_critical_path);
        assert!(!task.is_milestone);
        assert_eq!(task.assigned_to_name.as_deref(), Some("Dana"));
        assert!(task.scheduled_start.is_none());
    }

    #[test]
    fn test_dependency_type_defaults_to_fs() {
        let task = Task::new("T1", "S1");
        assert_eq!(task.predecessor_type, None);
        assert_eq!(task.dependency_type(), DependencyType::FS);
    }

    #[test]
    fn test_dependency_type_parse() {
        assert_eq!("FS".parse::<DependencyType>().unwrap(), DependencyType::FS);
        assert_eq!(" sf ".parse::<DependencyType>().unwrap(), DependencyType::SF);
        assert!(matches!(
            "XX".parse::<DependencyType>(),
            Err(ScheduleError::InvalidDependencyType(_))
        ));
        for kind in DependencyType::ALL {
            assert_eq!(kind.to_string().parse::<DependencyType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_pinned_start_requires_flag() {
        let mut task = Task::new("T1", "S1").fixed_at(date(2026, 3, 1));
        assert_eq!(task.pinned_start(), Some(date(2026, 3, 1)));

        task.is_date_fixed = false;
        assert_eq!(task.pinned_start(), None);
    }

    #[test]
    fn test_place_derives_end() {
        let mut task = Task::new("T1", "S1").with_duration(5);
        assert!(task.place(date(2026, 1, 30)));
        assert_eq!(task.scheduled_span(), Some((date(2026, 1, 30), date(2026, 2, 4))));

        let mut milestone = Task::new("M", "S1").as_milestone();
        assert!(milestone.place(date(2026, 1, 1)));
        assert_eq!(milestone.scheduled_start, milestone.scheduled_end);
    }

    #[test]
    fn test_place_out_of_range() {
        let mut task = Task::new("T1", "S1").with_duration(10);
        assert!(!task.place(NaiveDate::MAX));
        assert!(task.scheduled_start.is_none());
    }

    #[test]
    fn test_is_complete() {
        assert!(Task::new("a", "S").with_percent(100).is_complete());
        assert!(Task::new("b", "S").with_status(TaskStatus::Completed).is_complete());
        assert!(!Task::new("c", "S").with_percent(99).is_complete());
    }

    #[test]
    fn test_task_wire_format() {
        let task = Task::new("T1", "S1")
            .after("T0", DependencyType::FF)
            .with_status(TaskStatus::NotStarted);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["predecessor_type"], "FF");
        assert_eq!(json["status"], "not_started");
        assert_eq!(json["duration_type"], "fixed");

        let parsed: Task = serde_json::from_str(
            r#"{
                "id": "T9", "schedule_id": "S1", "phase_id": "P1", "name": "Pour",
                "duration_days": 2, "predecessor_id": null, "predecessor_type": null,
                "fixed_date": "2026-05-04", "is_date_fixed": true,
                "scheduled_start": null, "scheduled_end": null,
                "status": "in_progress", "actual_start": null, "actual_end": null,
                "assigned_to_name": null
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.status, TaskStatus::InProgress);
        assert_eq!(parsed.pinned_start(), Some(date(2026, 5, 4)));
        assert_eq!(parsed.lag_days, 0);
    }
}
