//! Schedule summary indicators.
//!
//! Computes display-ready indicators from a recomputed task set.
//!
//! # Indicators
//!
//! | Indicator | Definition |
//! |-----------|-----------|
//! | Earliest start | Minimum `scheduled_start` |
//! | Projected end | Maximum `scheduled_end` |
//! | Status counts | Tasks per [`TaskStatus`] |
//! | Critical path | Tasks flagged `is_critical_path` (stored, not derived) |
//! | Overdue | Not complete and `scheduled_end` before `as_of` |
//! | Overall percent | Duration-weighted completion |

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Task, TaskStatus};
use crate::progress::PhaseProgress;

/// Summary indicators for one schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Earliest scheduled start.
    pub earliest_start: Option<NaiveDate>,
    /// Latest scheduled end.
    pub projected_end: Option<NaiveDate>,
    /// Number of tasks.
    pub task_count: usize,
    /// Task counts per status. Statuses with no tasks are omitted.
    pub status_counts: BTreeMap<TaskStatus, usize>,
    /// IDs of tasks flagged as critical, in input order.
    pub critical_path_ids: Vec<String>,
    /// IDs of milestone tasks, in input order.
    pub milestone_ids: Vec<String>,
    /// IDs of incomplete tasks scheduled to end before `as_of`.
    pub overdue_ids: Vec<String>,
    /// Overall duration-weighted completion (0-100).
    pub overall_percent: f64,
}

impl ScheduleSummary {
    /// Computes indicators for a task set as of a given date.
    pub fn calculate(tasks: &[Task], as_of: NaiveDate) -> Self {
        let mut status_counts = BTreeMap::new();
        let mut critical_path_ids = Vec::new();
        let mut milestone_ids = Vec::new();
        let mut overdue_ids = Vec::new();

        for task in tasks {
            *status_counts.entry(task.status).or_insert(0) += 1;
            if task.is_critical_path {
                critical_path_ids.push(task.id.clone());
            }
            if task.is_milestone {
                milestone_ids.push(task.id.clone());
            }
            if let Some(end) = task.scheduled_end {
                if end < as_of && !task.is_complete() {
                    overdue_ids.push(task.id.clone());
                }
            }
        }

        Self {
            earliest_start: tasks.iter().filter_map(|t| t.scheduled_start).min(),
            projected_end: tasks.iter().filter_map(|t| t.scheduled_end).max(),
            task_count: tasks.len(),
            status_counts,
            critical_path_ids,
            milestone_ids,
            overdue_ids,
            overall_percent: PhaseProgress::of(tasks).percent,
        }
    }

    /// Number of tasks with a given status.
    pub fn count(&self, status: TaskStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    /// Calendar days from earliest start to projected end.
    pub fn span_days(&self) -> Option<i64> {
        Some((self.projected_end? - self.earliest_start?).num_days())
    }

    /// Whether any task is overdue or flagged delayed/blocked.
    pub fn needs_attention(&self) -> bool {
        !self.overdue_ids.is_empty()
            || self.count(TaskStatus::Delayed) > 0
            || self.count(TaskStatus::Blocked) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_schedule;
    use crate::models::DependencyType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Task> {
        let tasks = vec![
            Task::new("A", "S1")
                .with_duration(5)
                .with_percent(100)
                .with_status(TaskStatus::Completed)
                .on_critical_path(),
            Task::new("B", "S1")
                .with_duration(5)
                .with_status(TaskStatus::InProgress)
                .with_percent(20)
                .after("A", DependencyType::FS)
                .on_critical_path(),
            Task::new("C", "S1").with_duration(2),
            Task::new("M", "S1")
                .as_milestone()
                .after("B", DependencyType::FS),
        ];
        compute_schedule(date(2026, 1, 1), &tasks).tasks
    }

    #[test]
    fn test_summary_basic() {
        let s = ScheduleSummary::calculate(&sample(), date(2026, 1, 1));
        assert_eq!(s.task_count, 4);
        assert_eq!(s.earliest_start, Some(date(2026, 1, 1)));
        assert_eq!(s.projected_end, Some(date(2026, 1, 11)));
        assert_eq!(s.span_days(), Some(10));
        assert_eq!(s.count(TaskStatus::NotStarted), 2);
        assert_eq!(s.count(TaskStatus::Completed), 1);
        assert_eq!(s.count(TaskStatus::Blocked), 0);
        assert_eq!(s.critical_path_ids, vec!["A", "B"]);
        assert_eq!(s.milestone_ids, vec!["M"]);
        // (5 + 1) / 12
        assert!((s.overall_percent - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_overdue() {
        let s = ScheduleSummary::calculate(&sample(), date(2026, 1, 8));
        // A ended 01-06 but is complete; C ended 01-03 and is not.
        assert_eq!(s.overdue_ids, vec!["C"]);
        assert!(s.needs_attention());

        let early = ScheduleSummary::calculate(&sample(), date(2026, 1, 2));
        assert!(early.overdue_ids.is_empty());
        assert!(!early.needs_attention());
    }

    #[test]
    fn test_blocked_needs_attention() {
        let tasks = vec![Task::new("A", "S1").with_status(TaskStatus::Blocked)];
        let s = ScheduleSummary::calculate(&tasks, date(2026, 1, 1));
        assert!(s.needs_attention());
    }

    #[test]
    fn test_summary_empty() {
        let s = ScheduleSummary::calculate(&[], date(2026, 1, 1));
        assert_eq!(s.task_count, 0);
        assert_eq!(s.projected_end, None);
        assert_eq!(s.span_days(), None);
        assert!((s.overall_percent - 0.0).abs() < 1e-10);
    }
}
