//! Date propagation engine.
//!
//! Recomputes every task's `scheduled_start`/`scheduled_end` from the
//! project start date, predecessor links, dependency types, lag and pinned
//! dates. One predecessor per task; fixed durations; whole calendar days
//! with no working-day calendar.
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use project_schedule::engine::compute_schedule;
//! use project_schedule::models::{DependencyType, Task};
//!
//! let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
//! let tasks = vec![
//!     Task::new("A", "S1").with_duration(5),
//!     Task::new("B", "S1").with_duration(3).after("A", DependencyType::FS),
//! ];
//!
//! let result = compute_schedule(start, &tasks);
//! let b = result.task("B").unwrap();
//! assert_eq!(b.scheduled_start, NaiveDate::from_ymd_opt(2026, 1, 6));
//! assert_eq!(b.scheduled_end, NaiveDate::from_ymd_opt(2026, 1, 9));
//! assert!(result.diagnostics.is_empty());
//! ```
//!
//! Edits to any scheduling input (duration, predecessor, dependency type,
//! lag, pinned date) invalidate the whole set; always recompute all tasks.

mod diagnostic;
mod propagation;

pub use diagnostic::{Diagnostic, Severity};
pub use propagation::{compute_schedule, Propagation};
