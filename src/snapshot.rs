//! In-memory schedule snapshot.
//!
//! A [`ScheduleSnapshot`] owns one schedule with its phases and tasks and
//! keeps every derived field consistent: any edit that can move a date
//! recomputes the whole snapshot from the project start, so there is no
//! partial or incremental propagation.
//!
//! # Derived Fields
//!
//! | Field | Source |
//! |-------|--------|
//! | `Task::scheduled_start/end` | [`compute_schedule`] |
//! | `Phase::start_date/end_date` | min/max of member task dates |
//! | `Phase::percent_complete` | [`aggregate_progress`] |
//! | `Schedule::projected_end_date` | max task end |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::engine::{compute_schedule, Diagnostic};
use crate::error::{Result, ScheduleError};
use crate::grouping::{group_by_phase, orphaned_tasks, PhaseGroup};
use crate::models::{date_span, DependencyType, Phase, Schedule, Task, TaskStatus};
use crate::progress::{aggregate_progress, ProgressRollup};
use crate::summary::ScheduleSummary;
use crate::validation::{validate_tasks, ValidationResult};

/// What happens to tasks that depend on a removed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DependentPolicy {
    /// Dependents lose their predecessor and become roots.
    #[default]
    Clear,
    /// Dependents take over the removed task's predecessor, keeping their
    /// own dependency type and lag. Falls back to `Clear` when the removed
    /// task had no predecessor.
    Reassign,
}

/// What happens to the tasks of a removed phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseRemoval {
    /// Move member tasks into another phase.
    ReassignTo(String),
    /// Delete member tasks; their dependents are cleared.
    DeleteTasks,
}

/// A partial edit of one task.
///
/// Scheduling fields (duration, predecessor, lag, pin) trigger a full
/// recompute; tracking fields only refresh phase rollups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    name: Option<String>,
    phase_id: Option<String>,
    duration_days: Option<i32>,
    predecessor: Option<Option<(String, DependencyType)>>,
    lag_days: Option<i32>,
    fixed_date: Option<Option<NaiveDate>>,
    status: Option<TaskStatus>,
    percent_complete: Option<u8>,
    actual_start: Option<NaiveDate>,
    actual_end: Option<NaiveDate>,
    is_critical_path: Option<bool>,
    assigned_to_name: Option<String>,
}

impl TaskUpdate {
    /// An empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the task.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Moves the task to another phase.
    pub fn in_phase(mut self, phase_id: impl Into<String>) -> Self {
        self.phase_id = Some(phase_id.into());
        self
    }

    /// Sets the duration.
    pub fn with_duration(mut self, days: i32) -> Self {
        self.duration_days = Some(days);
        self
    }

    /// Links the task to a predecessor.
    pub fn with_predecessor(mut self, predecessor_id: impl Into<String>, kind: DependencyType) -> Self {
        self.predecessor = Some(Some((predecessor_id.into(), kind)));
        self
    }

    /// Removes the task's predecessor.
    pub fn without_predecessor(mut self) -> Self {
        self.predecessor = Some(None);
        self
    }

    /// Sets the lag.
    pub fn with_lag(mut self, days: i32) -> Self {
        self.lag_days = Some(days);
        self
    }

    /// Pins the start date.
    pub fn pinned_to(mut self, date: NaiveDate) -> Self {
        self.fixed_date = Some(Some(date));
        self
    }

    /// Releases a pinned start date.
    pub fn unpinned(mut self) -> Self {
        self.fixed_date = Some(None);
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the completion percentage (capped at 100).
    pub fn with_percent(mut self, percent: u8) -> Self {
        self.percent_complete = Some(percent.min(100));
        self
    }

    /// Records the actual start.
    pub fn started_on(mut self, date: NaiveDate) -> Self {
        self.actual_start = Some(date);
        self
    }

    /// Records the actual end.
    pub fn finished_on(mut self, date: NaiveDate) -> Self {
        self.actual_end = Some(date);
        self
    }

    /// Sets the stored critical-path flag.
    pub fn with_critical_path(mut self, critical: bool) -> Self {
        self.is_critical_path = Some(critical);
        self
    }

    /// Sets the assignee.
    pub fn assigned_to(mut self, name: impl Into<String>) -> Self {
        self.assigned_to_name = Some(name.into());
        self
    }

    /// Whether applying this update can move any date.
    pub fn moves_dates(&self) -> bool {
        self.duration_days.is_some()
            || self.predecessor.is_some()
            || self.lag_days.is_some()
            || self.fixed_date.is_some()
    }

    fn apply(self, task: &mut Task) {
        if let Some(name) = self.name {
            task.name = name;
        }
        if let Some(phase_id) = self.phase_id {
            task.phase_id = Some(phase_id);
        }
        if let Some(days) = self.duration_days {
            task.duration_days = days;
        }
        match self.predecessor {
            Some(Some((id, kind))) => {
                task.predecessor_id = Some(id);
                task.predecessor_type = Some(kind);
            }
            Some(None) => {
                task.predecessor_id = None;
                task.predecessor_type = None;
            }
            None => {}
        }
        if let Some(days) = self.lag_days {
            task.lag_days = days;
        }
        match self.fixed_date {
            Some(Some(date)) => {
                task.is_date_fixed = true;
                task.fixed_date = Some(date);
            }
            Some(None) => {
                task.is_date_fixed = false;
                task.fixed_date = None;
            }
            None => {}
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(percent) = self.percent_complete {
            task.percent_complete = percent;
        }
        if let Some(date) = self.actual_start {
            task.actual_start = Some(date);
        }
        if let Some(date) = self.actual_end {
            task.actual_end = Some(date);
        }
        if let Some(critical) = self.is_critical_path {
            task.is_critical_path = critical;
        }
        if let Some(name) = self.assigned_to_name {
            task.assigned_to_name = Some(name);
        }
    }
}

/// A schedule with its phases and tasks, kept fully computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    /// The schedule record.
    pub schedule: Schedule,
    /// Phases, in insertion order.
    pub phases: Vec<Phase>,
    /// Tasks, in insertion order.
    pub tasks: Vec<Task>,
    /// Problems found by the last recompute.
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ScheduleSnapshot {
    /// Creates a snapshot and computes every derived field.
    pub fn new(schedule: Schedule, phases: Vec<Phase>, tasks: Vec<Task>) -> Self {
        let mut snapshot = Self {
            schedule,
            phases,
            tasks,
            diagnostics: Vec::new(),
        };
        snapshot.recompute();
        snapshot
    }

    /// Recomputes task dates, phase rollups and the projected end from the
    /// project start. Returns the diagnostics of this run.
    #[instrument(skip_all, fields(schedule_id = %self.schedule.id))]
    pub fn recompute(&mut self) -> &[Diagnostic] {
        let (tasks, mut diagnostics) =
            compute_schedule(self.schedule.project_start_date, &self.tasks).into_input_order();
        self.tasks = tasks;
        diagnostics.extend(orphaned_tasks(&self.tasks, &self.phases));

        self.refresh_rollups();
        self.schedule.refresh_projected_end(&self.tasks);
        self.diagnostics = diagnostics;

        debug!(
            projected_end = ?self.schedule.projected_end_date,
            diagnostics = self.diagnostics.len(),
            "snapshot recomputed"
        );
        &self.diagnostics
    }

    fn refresh_rollups(&mut self) {
        let progress = aggregate_progress(&self.tasks);
        for phase in &mut self.phases {
            let span = date_span(self.tasks.iter().filter(|t| phase.contains(t)));
            phase.start_date = span.map(|(start, _)| start);
            phase.end_date = span.map(|(_, end)| end);
            phase.percent_complete = progress.phase_percent(&phase.id);
        }
    }

    /// Looks up a task by id.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Looks up a phase by id.
    pub fn phase(&self, id: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    fn task_index(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ScheduleError::TaskNotFound(id.to_string()))
    }

    fn require_phase(&self, id: &str) -> Result<()> {
        match self.phase(id) {
            Some(_) => Ok(()),
            None => Err(ScheduleError::PhaseNotFound(id.to_string())),
        }
    }

    fn check_schedule(&self, id: &str, schedule_id: &str) -> Result<()> {
        if schedule_id == self.schedule.id {
            Ok(())
        } else {
            Err(ScheduleError::ScheduleMismatch {
                id: id.to_string(),
                found: schedule_id.to_string(),
                expected: self.schedule.id.clone(),
            })
        }
    }

    /// Moves the project start and recomputes.
    pub fn set_project_start(&mut self, date: NaiveDate) -> &[Diagnostic] {
        self.schedule.project_start_date = date;
        self.recompute()
    }

    /// Adds a task and recomputes.
    ///
    /// # Errors
    /// - `DuplicateTaskId` if the id is taken
    /// - `UnattachedTask` if the task has no phase
    /// - `PhaseNotFound` if its phase is not in this snapshot
    /// - `ScheduleMismatch` if it belongs to another schedule
    pub fn add_task(&mut self, task: Task) -> Result<&[Diagnostic]> {
        if self.task(&task.id).is_some() {
            return Err(ScheduleError::DuplicateTaskId(task.id));
        }
        self.check_schedule(&task.id, &task.schedule_id)?;
        match task.phase_id.as_deref() {
            Some(phase_id) => self.require_phase(phase_id)?,
            None => return Err(ScheduleError::UnattachedTask(task.id)),
        }

        debug!(task_id = %task.id, "task added");
        self.tasks.push(task);
        Ok(self.recompute())
    }

    /// Applies a partial edit to a task.
    ///
    /// # Errors
    /// - `TaskNotFound` if the task or the new predecessor does not exist
    /// - `PhaseNotFound` if the new phase does not exist
    pub fn update_task(&mut self, id: &str, update: TaskUpdate) -> Result<&[Diagnostic]> {
        let idx = self.task_index(id)?;
        if let Some(phase_id) = update.phase_id.as_deref() {
            self.require_phase(phase_id)?;
        }
        if let Some(Some((predecessor_id, _))) = &update.predecessor {
            self.task_index(predecessor_id)?;
        }

        let moves_dates = update.moves_dates();
        update.apply(&mut self.tasks[idx]);

        if moves_dates {
            Ok(self.recompute())
        } else {
            self.refresh_rollups();
            Ok(&self.diagnostics)
        }
    }

    /// Removes a task, repairs its dependents per `policy`, and recomputes.
    ///
    /// # Errors
    /// `TaskNotFound` if the task does not exist.
    pub fn remove_task(&mut self, id: &str, policy: DependentPolicy) -> Result<Task> {
        let idx = self.task_index(id)?;
        let removed = self.tasks.remove(idx);

        let replacement = match policy {
            DependentPolicy::Clear => None,
            DependentPolicy::Reassign => removed.predecessor_id.clone(),
        };
        self.repoint_dependents(&removed.id, replacement.as_deref());

        debug!(task_id = %removed.id, ?policy, "task removed");
        self.recompute();
        Ok(removed)
    }

    fn repoint_dependents(&mut self, removed_id: &str, replacement: Option<&str>) {
        for task in &mut self.tasks {
            if task.predecessor_id.as_deref() != Some(removed_id) {
                continue;
            }
            match replacement {
                Some(id) => task.predecessor_id = Some(id.to_string()),
                None => {
                    task.predecessor_id = None;
                    task.predecessor_type = None;
                }
            }
        }
    }

    /// Adds a phase and recomputes.
    ///
    /// # Errors
    /// `DuplicatePhaseId` if the id is taken, `ScheduleMismatch` if it
    /// belongs to another schedule.
    pub fn add_phase(&mut self, phase: Phase) -> Result<&[Diagnostic]> {
        if self.phase(&phase.id).is_some() {
            return Err(ScheduleError::DuplicatePhaseId(phase.id));
        }
        self.check_schedule(&phase.id, &phase.schedule_id)?;
        self.phases.push(phase);
        Ok(self.recompute())
    }

    /// Removes a phase and recomputes.
    ///
    /// # Errors
    /// `PhaseNotFound` if the phase, or the phase its tasks are reassigned
    /// to, does not exist. `SelfReassignment` if the target is the phase
    /// being removed.
    pub fn remove_phase(&mut self, id: &str, removal: PhaseRemoval) -> Result<Phase> {
        let idx = self
            .phases
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ScheduleError::PhaseNotFound(id.to_string()))?;

        match &removal {
            PhaseRemoval::ReassignTo(target) => {
                if target == id {
                    return Err(ScheduleError::SelfReassignment(target.clone()));
                }
                self.require_phase(target)?;
                for task in &mut self.tasks {
                    if task.phase_id.as_deref() == Some(id) {
                        task.phase_id = Some(target.clone());
                    }
                }
            }
            PhaseRemoval::DeleteTasks => {
                let (deleted, kept): (Vec<Task>, Vec<Task>) = std::mem::take(&mut self.tasks)
                    .into_iter()
                    .partition(|t| t.phase_id.as_deref() == Some(id));
                self.tasks = kept;
                for task in &deleted {
                    self.repoint_dependents(&task.id, None);
                }
                if !deleted.is_empty() {
                    warn!(phase_id = id, tasks = deleted.len(), "phase tasks deleted");
                }
            }
        }

        let removed = self.phases.remove(idx);
        self.recompute();
        Ok(removed)
    }

    /// Overall and per-phase completion.
    pub fn progress(&self) -> ProgressRollup {
        aggregate_progress(&self.tasks)
    }

    /// Tasks grouped under their phases.
    pub fn grouped(&self) -> Vec<PhaseGroup<'_>> {
        group_by_phase(&self.tasks, &self.phases)
    }

    /// Summary indicators as of a date.
    pub fn summary(&self, as_of: NaiveDate) -> ScheduleSummary {
        ScheduleSummary::calculate(&self.tasks, as_of)
    }

    /// Structural validation of the current tasks and phases.
    pub fn validate(&self) -> ValidationResult {
        validate_tasks(&self.schedule.id, &self.tasks, &self.phases)
    }
}
