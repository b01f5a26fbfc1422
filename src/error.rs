//! Errors for fallible schedule construction and editing.
//!
//! The propagation, aggregation and grouping operations never fail; they
//! report recoverable problems as [`Diagnostic`](crate::engine::Diagnostic)
//! values instead. `ScheduleError` covers the operations that can be asked
//! to do something impossible: look up an unknown template, edit a task
//! that does not exist, parse a malformed catalog.

use thiserror::Error;

/// Errors returned by template lookup, catalog parsing and snapshot edits.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// No template is registered for the requested project type.
    #[error("no template registered for project type '{0}'")]
    UnknownTemplate(String),

    /// The referenced task does not exist in the snapshot.
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// The referenced phase does not exist in the snapshot.
    #[error("phase not found: {0}")]
    PhaseNotFound(String),

    /// A task with this id already exists.
    #[error("duplicate task id: {0}")]
    DuplicateTaskId(String),

    /// A phase with this id already exists.
    #[error("duplicate phase id: {0}")]
    DuplicatePhaseId(String),

    /// A phase's tasks were to be reassigned to the phase itself.
    #[error("cannot reassign the tasks of phase '{0}' to itself")]
    SelfReassignment(String),

    /// A task was added without a phase.
    #[error("task '{0}' is not attached to a phase")]
    UnattachedTask(String),

    /// A record was added to a snapshot of another schedule.
    #[error("'{id}' belongs to schedule '{found}', expected '{expected}'")]
    ScheduleMismatch {
        id: String,
        found: String,
        expected: String,
    },

    /// A dependency type string is not one of `FS`, `SS`, `FF`, `SF`.
    #[error("invalid dependency type '{0}' (expected FS, SS, FF or SF)")]
    InvalidDependencyType(String),

    /// A template catalog could not be parsed.
    #[error("template catalog error: {0}")]
    Catalog(#[from] serde_json::Error),
}

/// Convenience alias for results carrying a [`ScheduleError`].
pub type Result<T> = std::result::Result<T, ScheduleError>;
