//! Forward-pass date propagation.
//!
//! # Algorithm
//!
//! 1. Index tasks by id into an arena (first occurrence wins).
//! 2. For each task in `(sort_order, id)` order, climb its predecessor
//!    chain on an explicit stack, then place the chain top-down so every
//!    predecessor is placed before its dependent. A task starts at its
//!    pinned date, the predecessor's dates, or the project start.
//! 3. `scheduled_end = scheduled_start + duration_days`.
//! 4. Emit tasks in resolution order.
//!
//! Each task carries a visit state (`Pending` → `InProgress` → `Done`).
//! Reaching an `InProgress` predecessor is a back-edge: the edge is dropped
//! for this pass and a [`Diagnostic::DependencyCycle`] is reported, so the
//! traversal always terminates. Visiting in `(sort_order, id)` order rather
//! than input order makes the broken edge independent of how the caller
//! happened to order the slice.
//!
//! # Complexity
//! O(n) time and space; each task is resolved once.
//!
//! # Reference
//! Kelley & Walker (1959), "Critical-Path Planning and Scheduling" (forward pass)

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

use super::Diagnostic;
use crate::models::{projected_end, shift_days, Task};

/// Result of a full-schedule recomputation.
///
/// The task set is only meaningful as a whole: no task's dates should be
/// read before the computation has returned.
#[derive(Debug, Clone)]
pub struct Propagation {
    /// Every input task exactly once, with both scheduled dates set,
    /// in resolution order (predecessors before dependents).
    pub tasks: Vec<Task>,
    /// Recovered problems, in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
    order: Vec<usize>,
}

impl Propagation {
    /// Finds a computed task by id. With duplicate ids, returns the one
    /// that came first in the input.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks
            .iter()
            .zip(&self.order)
            .filter(|(task, _)| task.id == id)
            .min_by_key(|&(_, &idx)| idx)
            .map(|(task, _)| task)
    }

    /// Latest scheduled end across the computed set.
    pub fn projected_end(&self) -> Option<NaiveDate> {
        projected_end(&self.tasks)
    }

    /// Whether any dependency cycle was broken.
    pub fn has_cycles(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_cycle)
    }

    /// Whether the computation needed no recovery.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns the computed tasks rearranged into the input order.
    pub fn into_input_order(self) -> (Vec<Task>, Vec<Diagnostic>) {
        let mut slots: Vec<Option<Task>> = vec![None; self.tasks.len()];
        for (task, idx) in self.tasks.into_iter().zip(self.order) {
            slots[idx] = Some(task);
        }
        (slots.into_iter().flatten().collect(), self.diagnostics)
    }
}

/// Recomputes `scheduled_start`/`scheduled_end` for a whole task set.
///
/// Pure: the input is not modified, and running the computation again on
/// its own output yields the same dates.
///
/// # Rules
/// - Pinned (`is_date_fixed` with a `fixed_date`): start at the fixed date.
/// - With a predecessor: dependency-type arithmetic plus `lag_days`.
/// - Otherwise: start at `project_start`.
///
/// Dangling predecessors and cycles fall back to `project_start` and are
/// reported in [`Propagation::diagnostics`].
#[instrument(skip_all, fields(tasks = tasks.len(), start = %project_start))]
pub fn compute_schedule(project_start: NaiveDate, tasks: &[Task]) -> Propagation {
    let mut visit_order: Vec<usize> = (0..tasks.len()).collect();
    visit_order.sort_by(|&a, &b| {
        (tasks[a].sort_order, &tasks[a].id).cmp(&(tasks[b].sort_order, &tasks[b].id))
    });

    let mut traversal = Traversal::new(project_start, tasks);
    for idx in visit_order {
        traversal.resolve(idx);
    }
    let result = traversal.finish();

    debug!(
        tasks = result.tasks.len(),
        diagnostics = result.diagnostics.len(),
        projected_end = ?result.projected_end(),
        "schedule recomputed"
    );
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    InProgress,
    Done,
}

/// How a task's predecessor stands during the current climb.
#[derive(Debug, Clone, Copy)]
enum Link {
    /// No usable predecessor: none set, dangling, or a back-edge.
    Unlinked,
    /// Already placed.
    Ready(usize),
    /// Not yet visited; climb into it.
    Pending(usize),
}

/// Arena-indexed traversal state for one recomputation.
struct Traversal<'a> {
    project_start: NaiveDate,
    tasks: &'a [Task],
    index: HashMap<&'a str, usize>,
    state: Vec<Visit>,
    placed: Vec<Option<Task>>,
    order: Vec<usize>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Traversal<'a> {
    fn new(project_start: NaiveDate, tasks: &'a [Task]) -> Self {
        let mut index = HashMap::with_capacity(tasks.len());
        let mut diagnostics = Vec::new();
        for (idx, task) in tasks.iter().enumerate() {
            if index.contains_key(task.id.as_str()) {
                warn!(task_id = %task.id, "duplicate task id");
                diagnostics.push(Diagnostic::DuplicateTaskId {
                    task_id: task.id.clone(),
                });
            } else {
                index.insert(task.id.as_str(), idx);
            }
        }

        Self {
            project_start,
            tasks,
            index,
            state: vec![Visit::Pending; tasks.len()],
            placed: vec![None; tasks.len()],
            order: Vec::with_capacity(tasks.len()),
            diagnostics,
        }
    }

    /// Resolves `root` and every pending task on its predecessor chain.
    ///
    /// Climbs the chain with an explicit stack, marking each task
    /// `InProgress`, then places the tasks top-down as they are popped.
    fn resolve(&mut self, root: usize) {
        if self.state[root] != Visit::Pending {
            return;
        }
        self.state[root] = Visit::InProgress;

        let mut chain: Vec<(usize, Option<usize>)> = Vec::new();
        let mut current = root;
        loop {
            match self.link(current) {
                Link::Pending(pred) => {
                    chain.push((current, Some(pred)));
                    self.state[pred] = Visit::InProgress;
                    current = pred;
                }
                Link::Ready(pred) => {
                    chain.push((current, Some(pred)));
                    break;
                }
                Link::Unlinked => {
                    chain.push((current, None));
                    break;
                }
            }
        }

        while let Some((idx, predecessor)) = chain.pop() {
            self.place(idx, predecessor);
        }
    }

    /// Classifies the predecessor link of the task at `idx`, reporting
    /// dangling links and back-edges.
    fn link(&mut self, idx: usize) -> Link {
        let tasks = self.tasks;
        let task = &tasks[idx];
        let Some(pred_id) = task.predecessor_id.as_deref() else {
            return Link::Unlinked;
        };
        let Some(&pred) = self.index.get(pred_id) else {
            self.report(Diagnostic::DanglingPredecessor {
                task_id: task.id.clone(),
                predecessor_id: pred_id.to_string(),
            });
            return Link::Unlinked;
        };

        match self.state[pred] {
            Visit::InProgress => {
                self.report(Diagnostic::DependencyCycle {
                    task_id: task.id.clone(),
                    predecessor_id: pred_id.to_string(),
                });
                Link::Unlinked
            }
            Visit::Pending => Link::Pending(pred),
            Visit::Done => Link::Ready(pred),
        }
    }

    /// Places one task whose predecessor, if any, is already placed.
    fn place(&mut self, idx: usize, predecessor: Option<usize>) {
        let tasks = self.tasks;
        let task = &tasks[idx];
        let start = match (task.pinned_start(), predecessor) {
            (Some(date), _) => Some(date),
            (None, Some(pred)) => self.start_after(task, pred),
            (None, None) => Some(self.project_start),
        };

        let mut out = task.clone();
        let placed = match start {
            Some(start) => out.place(start),
            None => false,
        };
        if !placed {
            self.report(Diagnostic::DateOutOfRange {
                task_id: task.id.clone(),
            });
            self.place_at_anchor(&mut out);
        }

        self.state[idx] = Visit::Done;
        self.placed[idx] = Some(out);
        self.order.push(idx);
    }

    /// Start date implied by the dependency on an already-resolved task.
    fn start_after(&self, task: &Task, pred: usize) -> Option<NaiveDate> {
        let (pred_start, pred_end) = self.placed[pred].as_ref()?.scheduled_span()?;
        let (anchor_is_end, offset) = task.dependency_type().anchor(task.duration_days);
        let anchor = if anchor_is_end { pred_end } else { pred_start };
        shift_days(anchor, i64::from(task.lag_days) + offset)
    }

    /// Fallback placement for tasks whose dates left the calendar range.
    fn place_at_anchor(&self, task: &mut Task) {
        if task.place(self.project_start) {
            return;
        }
        // Only reachable with durations spanning chrono's whole range. The
        // end saturates, so the span is not `duration_days` long.
        task.scheduled_start = Some(self.project_start);
        task.scheduled_end = Some(if task.duration_days >= 0 {
            NaiveDate::MAX
        } else {
            NaiveDate::MIN
        });
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!(task_id = %diagnostic.task_id(), "{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    fn finish(self) -> Propagation {
        let mut placed = self.placed;
        let tasks = self
            .order
            .iter()
            .filter_map(|&idx| placed[idx].take())
            .collect();
        Propagation {
            tasks,
            diagnostics: self.diagnostics,
            order: self.order,
        }
    }
}
