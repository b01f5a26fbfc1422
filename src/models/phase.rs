//! Phase model.
//!
//! A phase is a named, ordered grouping of tasks. Its date span and
//! completion percentage are rollups of its member tasks, refreshed on
//! every recomputation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Task;

/// A named grouping of tasks within a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Unique phase identifier.
    pub id: String,
    /// Owning schedule.
    pub schedule_id: String,
    /// Display name.
    pub name: String,
    /// Display order.
    #[serde(default)]
    pub sort_order: i32,
    /// Earliest scheduled start of member tasks (derived).
    pub start_date: Option<NaiveDate>,
    /// Latest scheduled end of member tasks (derived).
    pub end_date: Option<NaiveDate>,
    /// Duration-weighted completion of member tasks (derived, 0-100).
    #[serde(default)]
    pub percent_complete: f64,
}

impl Phase {
    /// Creates a phase with the given id in the given schedule.
    pub fn new(id: impl Into<String>, schedule_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            schedule_id: schedule_id.into(),
            name: String::new(),
            sort_order: 0,
            start_date: None,
            end_date: None,
            percent_complete: 0.0,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the display order.
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Whether a task belongs to this phase.
    pub fn contains(&self, task: &Task) -> bool {
        task.phase_id.as_deref() == Some(self.id.as_str())
    }

    /// Number of calendar days covered by the derived span.
    pub fn span_days(&self) -> Option<i64> {
        Some((self.end_date? - self.start_date?).num_days())
    }
}

/// Earliest start and latest end over a set of scheduled tasks.
///
/// Tasks without computed dates are ignored. Returns `None` if no task has
/// dates.
pub fn date_span<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Option<(NaiveDate, NaiveDate)> {
    tasks
        .into_iter()
        .filter_map(Task::scheduled_span)
        .fold(None, |acc, (start, end)| match acc {
            None => Some((start, end)),
            Some((lo, hi)) => Some((lo.min(start), hi.max(end))),
        })
}
