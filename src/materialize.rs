//! Schedule creation from templates.
//!
//! Turns a template's phase/task skeleton into concrete [`Phase`] and
//! [`Task`] records for one schedule, links consecutive tasks through
//! `predecessor_id`, and runs the propagation engine once so the new
//! schedule comes back with every date populated.
//!
//! # ID Scheme
//! Phase ids are `"{schedule_id}-p{n}"` and task ids `"{schedule_id}-t{n}"`,
//! 1-based in template order.

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::error::Result;
use crate::models::{DurationType, Phase, Schedule, ScheduleStatus, Task, Template};
use crate::snapshot::ScheduleSnapshot;
use crate::templates::TemplateCatalog;

/// Input for creating a schedule from a template.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    /// Id for the new schedule.
    pub schedule_id: String,
    /// Project the schedule belongs to.
    pub project_id: String,
    /// Project type used to pick the template.
    pub project_type: String,
    /// Propagation anchor.
    pub project_start_date: NaiveDate,
}

impl NewSchedule {
    /// Creates a request.
    pub fn new(
        schedule_id: impl Into<String>,
        project_id: impl Into<String>,
        project_type: impl Into<String>,
        project_start_date: NaiveDate,
    ) -> Self {
        Self {
            schedule_id: schedule_id.into(),
            project_id: project_id.into(),
            project_type: project_type.into(),
            project_start_date,
        }
    }

    /// Sets the project type.
    pub fn with_project_type(mut self, project_type: impl Into<String>) -> Self {
        self.project_type = project_type.into();
        self
    }

    /// Sets the start date.
    pub fn starting(mut self, date: NaiveDate) -> Self {
        self.project_start_date = date;
        self
    }
}

/// Creates a schedule for `request.project_type` from the catalog.
///
/// # Errors
/// [`ScheduleError::UnknownTemplate`](crate::ScheduleError::UnknownTemplate)
/// if the catalog has no template for the project type.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use project_schedule::materialize::{create_schedule, NewSchedule};
/// use project_schedule::templates::TemplateLibrary;
///
/// let catalog = TemplateLibrary::builtin();
/// let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let request = NewSchedule::new("S1", "PRJ-1", "renovation", start);
///
/// let snapshot = create_schedule(&catalog, &request).unwrap();
/// assert_eq!(snapshot.tasks[0].scheduled_start, Some(start));
/// assert!(snapshot.schedule.projected_end_date.unwrap() > start);
/// ```
#[instrument(skip_all, fields(schedule_id = %request.schedule_id, project_type = %request.project_type))]
pub fn create_schedule(
    catalog: &impl TemplateCatalog,
    request: &NewSchedule,
) -> Result<ScheduleSnapshot> {
    let template = catalog.require(&request.project_type)?;
    let (phases, tasks) = materialize(template, &request.schedule_id);

    let schedule = Schedule::new(
        request.schedule_id.as_str(),
        request.project_id.as_str(),
        request.project_start_date,
    )
    .with_template(template.id.as_str())
    .with_status(ScheduleStatus::Draft);

    let snapshot = ScheduleSnapshot::new(schedule, phases, tasks);
    info!(
        phases = snapshot.phases.len(),
        tasks = snapshot.tasks.len(),
        projected_end = ?snapshot.schedule.projected_end_date,
        "schedule created from template"
    );
    Ok(snapshot)
}

/// Builds unscheduled phase and task records from a template.
///
/// Every task except the first (in template order) takes the previous task
/// as its predecessor, using its own skeleton's dependency type and lag.
pub fn materialize(template: &Template, schedule_id: &str) -> (Vec<Phase>, Vec<Task>) {
    let phases: Vec<Phase> = template
        .phases
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Phase::new(phase_id(schedule_id, i), schedule_id)
                .with_name(p.name.as_str())
                .with_sort_order(to_order(i))
        })
        .collect();

    let mut tasks: Vec<Task> = Vec::with_capacity(template.task_count());
    for (n, (phase_idx, skeleton)) in template.tasks_in_order().enumerate() {
        let mut task = Task::new(task_id(schedule_id, n), schedule_id)
            .with_name(skeleton.name.as_str())
            .in_phase(phase_id(schedule_id, phase_idx))
            .with_duration(skeleton.duration_days)
            .with_lag(skeleton.lag_days)
            .with_sort_order(to_order(n));
        task.duration_type = DurationType::Fixed;
        task.is_milestone = skeleton.is_milestone;
        task.is_critical_path = skeleton.is_critical_path;

        if let Some(previous) = tasks.last() {
            task = task.after(previous.id.as_str(), skeleton.predecessor_type);
        } else {
            task.lag_days = 0;
        }
        tasks.push(task);
    }

    (phases, tasks)
}

fn phase_id(schedule_id: &str, index: usize) -> String {
    format!("{schedule_id}-p{}", index + 1)
}

fn task_id(schedule_id: &str, index: usize) -> String {
    format!("{schedule_id}-t{}", index + 1)
}

fn to_order(index: usize) -> i32 {
    i32::try_from(index + 1).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use crate::models::{DependencyType, PhaseTemplate, TaskTemplate};
    use crate::templates::TemplateLibrary;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn small_template() -> Template {
        Template::new("tpl-small", "small", "Small")
            .with_phase(
                PhaseTemplate::new("Design")
                    .with_task(TaskTemplate::new("Sketch", 3).linked(DependencyType::SS, 9))
                    .with_task(TaskTemplate::new("Review", 2).linked(DependencyType::SS, 1)),
            )
            .with_phase(PhaseTemplate::new("Empty"))
            .with_phase(
                PhaseTemplate::new("Build")
                    .with_task(TaskTemplate::new("Build", 5).critical())
                    .with_task(TaskTemplate::milestone("Done").linked(DependencyType::FS, 2)),
            )
    }

    #[test]
    fn test_materialize_ids_and_links() {
        let (phases, tasks) = materialize(&small_template(), "S1");

        let phase_ids: Vec<&str> = phases.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(phase_ids, vec!["S1-p1", "S1-p2", "S1-p3"]);
        assert_eq!(phases[2].sort_order, 3);

        let task_ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(task_ids, vec!["S1-t1", "S1-t2", "S1-t3", "S1-t4"]);

        assert_eq!(tasks[0].predecessor_id, None);
        assert_eq!(tasks[0].lag_days, 0);
        assert_eq!(tasks[1].predecessor_id.as_deref(), Some("S1-t1"));
        assert_eq!(tasks[1].predecessor_type, Some(DependencyType::SS));
        // Links cross phase boundaries.
        assert_eq!(tasks[2].predecessor_id.as_deref(), Some("S1-t2"));
        assert_eq!(tasks[2].phase_id.as_deref(), Some("S1-p3"));
        assert!(tasks[2].is_critical_path);
        assert!(tasks[3].is_milestone);
        assert!(tasks.iter().all(|t| t.scheduled_start.is_none()));
    }

    #[test]
    fn test_create_schedule_populates_dates() {
        let catalog = TemplateLibrary::new(vec![small_template()]);
        let request = NewSchedule::new("S1", "PRJ-1", "small", date(2026, 1, 1));
        let snapshot = create_schedule(&catalog, &request).unwrap();

        assert_eq!(snapshot.schedule.template_id.as_deref(), Some("tpl-small"));
        assert_eq!(snapshot.schedule.status, ScheduleStatus::Draft);
        assert!(snapshot.diagnostics.is_empty());

        let span = |id: &str| snapshot.task(id).unwrap().scheduled_span().unwrap();
        assert_eq!(span("S1-t1"), (date(2026, 1, 1), date(2026, 1, 4)));
        assert_eq!(span("S1-t2"), (date(2026, 1, 2), date(2026, 1, 4)));
        assert_eq!(span("S1-t3"), (date(2026, 1, 4), date(2026, 1, 9)));
        assert_eq!(span("S1-t4"), (date(2026, 1, 11), date(2026, 1, 11)));
        assert_eq!(snapshot.schedule.projected_end_date, Some(date(2026, 1, 11)));

        let empty = snapshot.phase("S1-p2").unwrap();
        assert_eq!(empty.start_date, None);
    }

    #[test]
    fn test_create_schedule_unknown_type() {
        let catalog = TemplateLibrary::builtin();
        let request = NewSchedule::new("S1", "PRJ-1", "spaceport", date(2026, 1, 1));
        assert!(matches!(
            create_schedule(&catalog, &request),
            Err(ScheduleError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn test_every_builtin_template_materializes_cleanly() {
        let catalog = TemplateLibrary::builtin();
        for project_type in catalog.project_types() {
            let request = NewSchedule::new("S", "P", project_type, date(2026, 4, 1));
            let snapshot = create_schedule(&catalog, &request).unwrap();
            assert!(snapshot.diagnostics.is_empty(), "{project_type}");
            assert!(snapshot.tasks.iter().all(|t| t.scheduled_end.is_some()));
            assert!(crate::validation::validate_tasks("S", &snapshot.tasks, &snapshot.phases).is_ok());
        }
    }

    #[test]
    fn test_request_builder() {
        let r = NewSchedule::new("S1", "PRJ", "a", date(2026, 1, 1))
            .with_project_type("renovation")
            .starting(date(2026, 2, 1));
        assert_eq!(r.project_type, "renovation");
        assert_eq!(r.project_start_date, date(2026, 2, 1));
    }
}
