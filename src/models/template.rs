//! Template (blueprint) model.
//!
//! A template is a read-only phase/task skeleton for one project type.
//! It is consumed once, when a schedule is created, and has no runtime
//! relationship to the engine afterwards.

use serde::{Deserialize, Serialize};

use super::DependencyType;

/// A schedule blueprint for one project type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Template identifier (recorded on created schedules).
    pub id: String,
    /// Project type this template seeds.
    pub project_type: String,
    /// Display name.
    pub name: String,
    /// Ordered phases.
    pub phases: Vec<PhaseTemplate>,
}

/// A phase skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTemplate {
    /// Phase name.
    pub name: String,
    /// Ordered task skeletons.
    pub tasks: Vec<TaskTemplate>,
}

/// A task skeleton.
///
/// `predecessor_type` and `lag_days` describe the link to the task that
/// precedes this one in template order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTemplate {
    /// Task name.
    pub name: String,
    /// Duration in calendar days (0 for milestones).
    pub duration_days: i32,
    /// Link type to the previous task (FS when omitted).
    #[serde(default)]
    pub predecessor_type: DependencyType,
    /// Offset in days added to the link. Ignored for the first task.
    #[serde(default)]
    pub lag_days: i32,
    /// Whether the task marks a milestone.
    #[serde(default)]
    pub is_milestone: bool,
    /// Initial critical-path flag.
    #[serde(default)]
    pub is_critical_path: bool,
}

impl Template {
    /// Creates an empty template.
    pub fn new(
        id: impl Into<String>,
        project_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            project_type: project_type.into(),
            name: name.into(),
            phases: Vec::new(),
        }
    }

    /// Appends a phase.
    pub fn with_phase(mut self, phase: PhaseTemplate) -> Self {
        self.phases.push(phase);
        self
    }

    /// Total number of task skeletons.
    pub fn task_count(&self) -> usize {
        self.phases.iter().map(|p| p.tasks.len()).sum()
    }

    /// Sum of all skeleton durations (an upper bound for a pure FS chain
    /// without lag).
    pub fn total_duration_days(&self) -> i64 {
        self.phases
            .iter()
            .flat_map(|p| &p.tasks)
            .map(|t| i64::from(t.duration_days))
            .sum()
    }

    /// Task skeletons in template order, paired with their phase index.
    pub fn tasks_in_order(&self) -> impl Iterator<Item = (usize, &TaskTemplate)> {
        self.phases
            .iter()
            .enumerate()
            .flat_map(|(i, p)| p.tasks.iter().map(move |t| (i, t)))
    }
}

impl PhaseTemplate {
    /// Creates an empty phase skeleton.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    /// Appends a task skeleton.
    pub fn with_task(mut self, task: TaskTemplate) -> Self {
        self.tasks.push(task);
        self
    }
}

impl TaskTemplate {
    /// Creates an FS-linked task skeleton with no lag.
    pub fn new(name: impl Into<String>, duration_days: i32) -> Self {
        Self {
            name: name.into(),
            duration_days,
            predecessor_type: DependencyType::FS,
            lag_days: 0,
            is_milestone: false,
            is_critical_path: false,
        }
    }

    /// Creates a zero-duration milestone skeleton.
    pub fn milestone(name: impl Into<String>) -> Self {
        Self {
            is_milestone: true,
            ..Self::new(name, 0)
        }
    }

    /// Sets the link to the previous task.
    pub fn linked(mut self, kind: DependencyType, lag_days: i32) -> Self {
        self.predecessor_type = kind;
        self.lag_days = lag_days;
        self
    }

    /// Marks the skeleton as critical.
    pub fn critical(mut self) -> Self {
        self.is_critical_path = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Template {
        Template::new("tpl-1", "demo", "Demo")
            .with_phase(
                PhaseTemplate::new("Design")
                    .with_task(TaskTemplate::new("Sketch", 3))
                    .with_task(TaskTemplate::new("Review", 2).linked(DependencyType::SS, 1)),
            )
            .with_phase(PhaseTemplate::new("Build").with_task(TaskTemplate::new("Build", 10).critical()))
            .with_phase(PhaseTemplate::new("Close").with_task(TaskTemplate::milestone("Handover")))
    }

    #[test]
    fn test_template_counts() {
        let t = sample();
        assert_eq!(t.task_count(), 4);
        assert_eq!(t.total_duration_days(), 15);
    }

    #[test]
    fn test_tasks_in_order() {
        let t = sample();
        let order: Vec<(usize, &str)> = t.tasks_in_order().map(|(i, s)| (i, s.name.as_str())).collect();
        assert_eq!(order, vec![(0, "Sketch"), (0, "Review"), (1, "Build"), (2, "Handover")]);
    }

    #[test]
    fn test_milestone_skeleton() {
        let m = TaskTemplate::milestone("Done");
        assert!(m.is_milestone);
        assert_eq!(m.duration_days, 0);
        assert_eq!(m.predecessor_type, DependencyType::FS);
    }

    #[test]
    fn test_task_template_defaults_from_json() {
        let t: TaskTemplate = serde_json::from_str(r#"{"name": "Permit", "duration_days": 14}"#).unwrap();
        assert_eq!(t.predecessor_type, DependencyType::FS);
        assert_eq!(t.lag_days, 0);
        assert!(!t.is_milestone);
    }
}
