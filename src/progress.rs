//! Duration-weighted progress rollups.
//!
//! # Formula
//!
//! | Level | Definition |
//! |-------|-----------|
//! | Task weight | `max(duration_days, 0)` |
//! | Completed weight | `weight × min(percent_complete, 100) / 100` |
//! | Percent | `100 × Σ completed / Σ weight`, 0 when `Σ weight = 0` |
//!
//! Zero-duration tasks (milestones) carry no weight.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Task;

/// Weight totals for one group of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseProgress {
    /// Sum of task weights (days).
    pub total: f64,
    /// Sum of completed weights (days).
    pub completed: f64,
    /// `completed / total` as a percentage (0-100).
    pub percent: f64,
}

impl PhaseProgress {
    /// Totals over any set of tasks.
    pub fn of<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut progress = Self::default();
        for task in tasks {
            progress.add(task);
        }
        progress.finish()
    }

    fn add(&mut self, task: &Task) {
        let weight = f64::from(task.duration_days.max(0));
        let fraction = f64::from(task.percent_complete.min(100)) / 100.0;
        self.total += weight;
        self.completed += weight * fraction;
    }

    fn finish(mut self) -> Self {
        self.percent = percent(self.completed, self.total);
        self
    }

    /// Combines two groups without rescanning their tasks.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            total: self.total + other.total,
            completed: self.completed + other.completed,
            percent: 0.0,
        }
        .finish()
    }
}

/// Overall and per-phase completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressRollup {
    /// Overall completion (0-100).
    pub overall: f64,
    /// Totals over every task, including tasks without a phase.
    pub totals: PhaseProgress,
    /// Per-phase totals keyed by `phase_id`. Tasks without a phase are
    /// counted only in `overall`.
    pub by_phase: BTreeMap<String, PhaseProgress>,
}

impl ProgressRollup {
    /// Completion percentage of a phase (0 for unknown phases).
    pub fn phase_percent(&self, phase_id: &str) -> f64 {
        self.by_phase.get(phase_id).map_or(0.0, |p| p.percent)
    }
}

/// Computes the overall and per-phase completion of a task set.
///
/// Never fails and never mutates its input; every percentage is in
/// `[0, 100]`.
pub fn aggregate_progress(tasks: &[Task]) -> ProgressRollup {
    let mut totals = PhaseProgress::default();
    let mut by_phase: BTreeMap<String, PhaseProgress> = BTreeMap::new();

    for task in tasks {
        totals.add(task);
        if let Some(phase_id) = &task.phase_id {
            by_phase.entry(phase_id.clone()).or_default().add(task);
        }
    }

    let totals = totals.finish();
    ProgressRollup {
        overall: totals.percent,
        totals,
        by_phase: by_phase
            .into_iter()
            .map(|(id, progress)| (id, progress.finish()))
            .collect(),
    }
}

fn percent(completed: f64, total: f64) -> f64 {
    if total <= 0.0 {
        0.0
    } else {
        (completed / total * 100.0).clamp(0.0, 100.0)
    }
}
