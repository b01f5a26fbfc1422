//! Input validation for schedule task sets.
//!
//! Checks structural integrity of a schedule's tasks and phases before they
//! are stored. The engine never calls this: it tolerates every problem
//! listed here and reports what it had to recover from. Validation is for
//! the layer that constructs records and wants to reject bad input early.
//!
//! Detects:
//! - Duplicate task or phase IDs
//! - Records belonging to another schedule
//! - Dangling, self-referencing and cyclic predecessor links
//! - Incomplete dependency and pinned-date settings
//! - Unknown phase references
//! - Out-of-range durations and percentages
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};

use crate::models::{Phase, Task};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending task or phase ID.
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two tasks or two phases share the same ID.
    DuplicateId,
    /// A record belongs to a different schedule.
    ScheduleMismatch,
    /// A predecessor ID names no task in the set.
    InvalidPredecessor,
    /// A task is its own predecessor.
    SelfPredecessor,
    /// Predecessor links form a cycle.
    CyclicDependency,
    /// `predecessor_id` is set without `predecessor_type`.
    MissingDependencyType,
    /// `is_date_fixed` is set without `fixed_date`.
    MissingFixedDate,
    /// `phase_id` is unset or names no phase in the set.
    InvalidPhaseReference,
    /// `duration_days` is negative.
    NegativeDuration,
    /// `percent_complete` is above 100.
    PercentOutOfRange,
}

impl ValidationError {
    fn new(
        kind: ValidationErrorKind,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

/// Validates one schedule's tasks and phases.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with every detected issue.
pub fn validate_tasks(schedule_id: &str, tasks: &[Task], phases: &[Phase]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut phase_ids = HashSet::new();
    for phase in phases {
        if !phase_ids.insert(phase.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                &phase.id,
                format!("Duplicate phase ID: {}", phase.id),
            ));
        }
        if phase.schedule_id != schedule_id {
            errors.push(ValidationError::new(
                ValidationErrorKind::ScheduleMismatch,
                &phase.id,
                format!(
                    "Phase '{}' belongs to schedule '{}', not '{}'",
                    phase.id, phase.schedule_id, schedule_id
                ),
            ));
        }
    }

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                &task.id,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
    }

    for task in tasks {
        check_task(schedule_id, task, &task_ids, &phase_ids, &mut errors);
    }

    errors.extend(detect_cycles(tasks));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_task(
    schedule_id: &str,
    task: &Task,
    task_ids: &HashSet<&str>,
    phase_ids: &HashSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut push = |kind, message: String| {
        errors.push(ValidationError::new(kind, &task.id, message));
    };

    if task.schedule_id != schedule_id {
        push(
            ValidationErrorKind::ScheduleMismatch,
            format!(
                "Task '{}' belongs to schedule '{}', not '{}'",
                task.id, task.schedule_id, schedule_id
            ),
        );
    }

    match task.phase_id.as_deref() {
        Some(phase_id) if phase_ids.contains(phase_id) => {}
        Some(phase_id) => push(
            ValidationErrorKind::InvalidPhaseReference,
            format!("Task '{}' references unknown phase '{}'", task.id, phase_id),
        ),
        None => push(
            ValidationErrorKind::InvalidPhaseReference,
            format!("Task '{}' is not attached to a phase", task.id),
        ),
    }

    if let Some(pred) = task.predecessor_id.as_deref() {
        if pred == task.id {
            push(
                ValidationErrorKind::SelfPredecessor,
                format!("Task '{}' is its own predecessor", task.id),
            );
        } else if !task_ids.contains(pred) {
            push(
                ValidationErrorKind::InvalidPredecessor,
                format!("Task '{}' references unknown predecessor '{}'", task.id, pred),
            );
        }
        if task.predecessor_type.is_none() {
            push(
                ValidationErrorKind::MissingDependencyType,
                format!("Task '{}' has a predecessor but no dependency type", task.id),
            );
        }
    }

    if task.is_date_fixed && task.fixed_date.is_none() {
        push(
            ValidationErrorKind::MissingFixedDate,
            format!("Task '{}' is date-fixed but has no fixed date", task.id),
        );
    }

    if task.duration_days < 0 {
        push(
            ValidationErrorKind::NegativeDuration,
            format!("Task '{}' has negative duration {}", task.id, task.duration_days),
        );
    }

    if task.percent_complete > 100 {
        push(
            ValidationErrorKind::PercentOutOfRange,
            format!(
                "Task '{}' is {}% complete (maximum 100)",
                task.id, task.percent_complete
            ),
        );
    }
}

/// Detects cycles in the predecessor graph using DFS.
///
/// Self-links are reported separately by [`validate_tasks`] and skipped
/// here. Each cycle is reported once, at the task where it was closed.
///
/// # Algorithm
/// DFS over successor edges. Reaching a node currently on the recursion
/// stack is a back-edge, i.e. a cycle.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(tasks: &[Task]) -> Vec<ValidationError> {
    // predecessor → successors
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut all_ids: Vec<&str> = Vec::new();
    let mut seen = HashSet::new();

    for task in tasks {
        if seen.insert(task.id.as_str()) {
            all_ids.push(&task.id);
        }
        if let Some(pred) = task.predecessor_id.as_deref() {
            if pred != task.id {
                adj.entry(pred).or_default().push(task.id.as_str());
            }
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();
    let mut errors = Vec::new();

    for &node in &all_ids {
        if !visited.contains(node) {
            dfs(node, &adj, &mut visited, &mut in_stack, &mut errors);
        }
    }

    errors
}

/// Depth-first search from `root` on an explicit stack of
/// `(node, next successor)` frames.
fn dfs<'a>(
    root: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
    errors: &mut Vec<ValidationError>,
) {
    visited.insert(root);
    in_stack.insert(root);
    let mut stack: Vec<(&'a str, usize)> = vec![(root, 0)];

    while let Some(frame) = stack.last_mut() {
        let (node, cursor) = *frame;
        let Some(&next) = adj.get(node).and_then(|successors| successors.get(cursor)) else {
            in_stack.remove(node);
            stack.pop();
            continue;
        };
        frame.1 += 1;

        if in_stack.contains(next) {
            errors.push(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                next,
                format!("Circular dependency detected involving task '{next}'"),
            ));
        } else if visited.insert(next) {
            in_stack.insert(next);
            stack.push((next, 0));
        }
    }
}
