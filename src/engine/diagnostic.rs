//! Recoverable conditions reported by the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Stale or incomplete data; the result is still meaningful.
    Warning,
    /// A modelling bug; the affected dates are a tie-break, not a plan.
    Error,
}

/// A non-fatal problem found while computing a schedule.
///
/// Every diagnostic was recovered from locally; the rest of the task set is
/// computed normally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// `predecessor_id` names a task that is not in the set. The task was
    /// anchored to the project start.
    DanglingPredecessor {
        task_id: String,
        predecessor_id: String,
    },
    /// Following `predecessor_id` from `task_id` leads back to a task still
    /// being resolved. The edge to `predecessor_id` was ignored for this pass.
    DependencyCycle {
        task_id: String,
        predecessor_id: String,
    },
    /// `phase_id` names a phase that was not supplied. The task is missing
    /// from grouped output but still scheduled and aggregated.
    MissingPhase {
        task_id: String,
        phase_id: Option<String>,
    },
    /// More than one task carries this id. Predecessor links resolve to the
    /// first one.
    DuplicateTaskId { task_id: String },
    /// Date arithmetic left chrono's calendar range. The task was anchored
    /// to the project start. If its duration alone exceeds the range, the
    /// end saturates at `NaiveDate::MAX` (or `MIN` for negative durations)
    /// and the span is shorter than `duration_days`.
    DateOutOfRange { task_id: String },
}

impl Diagnostic {
    /// The task this diagnostic is about.
    pub fn task_id(&self) -> &str {
        match self {
            Self::DanglingPredecessor { task_id, .. }
            | Self::DependencyCycle { task_id, .. }
            | Self::MissingPhase { task_id, .. }
            | Self::DuplicateTaskId { task_id }
            | Self::DateOutOfRange { task_id } => task_id,
        }
    }

    /// Severity of the condition.
    pub fn severity(&self) -> Severity {
        match self {
            Self::DanglingPredecessor { .. } | Self::MissingPhase { .. } => Severity::Warning,
            Self::DependencyCycle { .. }
            | Self::DuplicateTaskId { .. }
            | Self::DateOutOfRange { .. } => Severity::Error,
        }
    }

    /// Whether this is a dependency cycle.
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::DependencyCycle { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingPredecessor {
                task_id,
                predecessor_id,
            } => write!(
                f,
                "task '{task_id}' references unknown predecessor '{predecessor_id}'"
            ),
            Self::DependencyCycle {
                task_id,
                predecessor_id,
            } => write!(
                f,
                "task '{task_id}' closes a dependency cycle through '{predecessor_id}'"
            ),
            Self::MissingPhase {
                task_id,
                phase_id: Some(phase_id),
            } => write!(f, "task '{task_id}' references unknown phase '{phase_id}'"),
            Self::MissingPhase {
                task_id,
                phase_id: None,
            } => write!(f, "task '{task_id}' is not attached to a phase"),
            Self::DuplicateTaskId { task_id } => write!(f, "duplicate task id '{task_id}'"),
            Self::DateOutOfRange { task_id } => {
                write!(f, "dates for task '{task_id}' are outside the calendar range")
            }
        }
    }
}
