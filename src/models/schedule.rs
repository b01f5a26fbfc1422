//! Schedule model.
//!
//! A schedule is the per-project container that phases and tasks belong
//! to. It carries the propagation anchor (`project_start_date`) and the
//! projected end date derived from the latest task end.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Task;

/// Lifecycle status of a schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Created but not yet in use.
    #[default]
    Draft,
    /// Being tracked.
    Active,
    /// Finished.
    Completed,
}

/// A project schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Unique schedule identifier.
    pub id: String,
    /// Owning project (one schedule per project).
    pub project_id: String,
    /// Originating template, if the schedule was created from one.
    pub template_id: Option<String>,
    /// Propagation anchor for tasks without a predecessor.
    pub project_start_date: NaiveDate,
    /// Latest `scheduled_end` across all tasks (derived).
    pub projected_end_date: Option<NaiveDate>,
    /// Recorded completion date.
    pub actual_end_date: Option<NaiveDate>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ScheduleStatus,
}

impl Schedule {
    /// Creates a draft schedule.
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        project_start_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            template_id: None,
            project_start_date,
            projected_end_date: None,
            actual_end_date: None,
            status: ScheduleStatus::Draft,
        }
    }

    /// Records the originating template.
    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    /// Sets the lifecycle status.
    pub fn with_status(mut self, status: ScheduleStatus) -> Self {
        self.status = status;
        self
    }

    /// Refreshes `projected_end_date` from a recomputed task set.
    pub fn refresh_projected_end(&mut self, tasks: &[Task]) {
        self.projected_end_date = projected_end(tasks);
    }

    /// Marks the schedule completed on the given date.
    pub fn complete(&mut self, on: NaiveDate) {
        self.actual_end_date = Some(on);
        self.status = ScheduleStatus::Completed;
    }
}

/// Latest `scheduled_end` across tasks, ignoring unscheduled ones.
pub fn projected_end(tasks: &[Task]) -> Option<NaiveDate> {
    tasks.iter().filter_map(|t| t.scheduled_end).max()
}
