//! Phase grouping for rollups and presentation.
//!
//! Partitions a task list by `phase_id`. Phases come out in `sort_order`
//! (ties by id); tasks keep the order of the input slice.
//!
//! Tasks whose phase is unknown are left out of every group. They are still
//! scheduled and aggregated; [`orphaned_tasks`] reports them so the caller
//! can flag the data-integrity problem upstream.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::engine::Diagnostic;
use crate::models::{date_span, Phase, Task};
use crate::progress::PhaseProgress;

/// A phase with its member tasks.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseGroup<'a> {
    /// The phase record.
    pub phase: &'a Phase,
    /// Member tasks, in input order.
    pub tasks: Vec<&'a Task>,
}

impl<'a> PhaseGroup<'a> {
    /// Earliest start and latest end of the member tasks.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        date_span(self.tasks.iter().copied())
    }

    /// Duration-weighted progress of the member tasks.
    pub fn progress(&self) -> PhaseProgress {
        PhaseProgress::of(self.tasks.iter().copied())
    }

    /// Whether the phase has no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Groups tasks under their phases.
///
/// Every phase appears exactly once, including phases with no tasks.
pub fn group_by_phase<'a>(tasks: &'a [Task], phases: &'a [Phase]) -> Vec<PhaseGroup<'a>> {
    let mut ordered: Vec<&'a Phase> = phases.iter().collect();
    ordered.sort_by(|a, b| (a.sort_order, &a.id).cmp(&(b.sort_order, &b.id)));

    let mut slot: HashMap<&'a str, usize> = HashMap::with_capacity(ordered.len());
    for (i, &phase) in ordered.iter().enumerate() {
        slot.entry(phase.id.as_str()).or_insert(i);
    }

    let mut groups: Vec<PhaseGroup<'a>> = ordered
        .into_iter()
        .map(|phase| PhaseGroup {
            phase,
            tasks: Vec::new(),
        })
        .collect();

    for task in tasks {
        match task.phase_id.as_deref().and_then(|id| slot.get(id)) {
            Some(&i) => groups[i].tasks.push(task),
            None => warn!(
                task_id = %task.id,
                phase_id = ?task.phase_id,
                "task dropped from phase grouping"
            ),
        }
    }

    groups
}

/// Reports tasks whose `phase_id` is unset or names no supplied phase.
pub fn orphaned_tasks(tasks: &[Task], phases: &[Phase]) -> Vec<Diagnostic> {
    tasks
        .iter()
        .filter(|t| !phases.iter().any(|p| p.contains(t)))
        .map(|t| Diagnostic::MissingPhase {
            task_id: t.id.clone(),
            phase_id: t.phase_id.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_schedule;
    use crate::models::DependencyType;

    fn phases() -> Vec<Phase> {
        vec![
            Phase::new("P-build", "S1").with_name("Build").with_sort_order(2),
            Phase::new("P-design", "S1").with_name("Design").with_sort_order(1),
            Phase::new("P-close", "S1").with_name("Closeout").with_sort_order(3),
        ]
    }

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("T3", "S1").in_phase("P-build").with_duration(4),
            Task::new("T1", "S1").in_phase("P-design").with_duration(2),
            Task::new("T2", "S1").in_phase("P-build").with_duration(1),
            Task::new("T9", "S1").in_phase("P-gone").with_duration(1),
        ]
    }

    #[test]
    fn test_phases_in_sort_order() {
        let (tasks, phases) = (tasks(), phases());
        let groups = group_by_phase(&tasks, &phases);
        let ids: Vec<&str> = groups.iter().map(|g| g.phase.id.as_str()).collect();
        assert_eq!(ids, vec!["P-design", "P-build", "P-close"]);
    }

    #[test]
    fn test_tasks_keep_input_order() {
        let (tasks, phases) = (tasks(), phases());
        let groups = group_by_phase(&tasks, &phases);
        let build: Vec<&str> = groups[1].tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(build, vec!["T3", "T2"]);
    }

    #[test]
    fn test_empty_phase_kept() {
        let (tasks, phases) = (tasks(), phases());
        let groups = group_by_phase(&tasks, &phases);
        assert_eq!(groups.len(), phases.len());
        assert!(groups[2].is_empty());
        assert_eq!(groups[2].span(), None);
    }

    #[test]
    fn test_unknown_phase_dropped_and_reported() {
        let (tasks, phases) = (tasks(), phases());
        let groups = group_by_phase(&tasks, &phases);
        let grouped: usize = groups.iter().map(|g| g.tasks.len()).sum();
        assert_eq!(grouped, 3);

        let orphans = orphaned_tasks(&tasks, &phases);
        assert_eq!(
            orphans,
            vec![Diagnostic::MissingPhase {
                task_id: "T9".into(),
                phase_id: Some("P-gone".into()),
            }]
        );
    }

    #[test]
    fn test_group_span_and_progress() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let input = vec![
            Task::new("A", "S1").in_phase("P-design").with_duration(2).with_percent(100),
            Task::new("B", "S1")
                .in_phase("P-build")
                .with_duration(6)
                .with_percent(50)
                .after("A", DependencyType::FS),
            Task::new("C", "S1")
                .in_phase("P-build")
                .with_duration(2)
                .after("B", DependencyType::FS),
        ];
        let computed = compute_schedule(start, &input).tasks;
        let phases = phases();
        let groups = group_by_phase(&computed, &phases);

        let build = &groups[1];
        assert_eq!(
            build.span(),
            Some((
                NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 11).unwrap()
            ))
        );
        let progress = build.progress();
        assert!((progress.total - 8.0).abs() < 1e-10);
        assert!((progress.percent - 37.5).abs() < 1e-10);
    }

    #[test]
    fn test_no_phases() {
        let tasks = tasks();
        assert!(group_by_phase(&tasks, &[]).is_empty());
        assert_eq!(orphaned_tasks(&tasks, &[]).len(), tasks.len());
    }
}
