//! Date propagation and progress tracking for construction project schedules.
//!
//! Schedules are seeded from templates, then kept consistent as tasks are
//! edited: every task's dates are derived from the project start, its
//! predecessor link (FS/SS/FF/SF plus lag), or a pinned date.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Schedule`, `Phase`, `Task`, `Template`
//! - **`engine`**: Dependency-driven date propagation and its diagnostics
//! - **`progress`**: Duration-weighted overall and per-phase completion
//! - **`grouping`**: Tasks grouped under ordered phases
//! - **`summary`**: Display indicators (projected end, overdue, critical)
//! - **`templates`**: Template catalog and the built-in project types
//! - **`materialize`**: Schedule creation from a template
//! - **`snapshot`**: An editable schedule kept fully recomputed
//! - **`validation`**: Input integrity checks (duplicate IDs, cycles, references)
//! - **`error`**: Errors for fallible lookups and edits
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use project_schedule::materialize::{create_schedule, NewSchedule};
//! use project_schedule::snapshot::{DependentPolicy, TaskUpdate};
//! use project_schedule::templates::TemplateLibrary;
//!
//! let start = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
//! let request = NewSchedule::new("S1", "PRJ-1", "renovation", start);
//! let mut snapshot = create_schedule(&TemplateLibrary::builtin(), &request).unwrap();
//! let before = snapshot.schedule.projected_end_date.unwrap();
//!
//! snapshot
//!     .update_task("S1-t1", TaskUpdate::new().with_duration(10))
//!     .unwrap();
//! assert!(snapshot.schedule.projected_end_date.unwrap() > before);
//!
//! snapshot.remove_task("S1-t2", DependentPolicy::Reassign).unwrap();
//! assert!(snapshot.diagnostics.is_empty());
//! ```

pub mod engine;
pub mod error;
pub mod grouping;
pub mod materialize;
pub mod models;
pub mod progress;
pub mod snapshot;
pub mod summary;
pub mod templates;
pub mod validation;

pub use engine::{compute_schedule, Diagnostic, Propagation};
pub use error::{Result, ScheduleError};
pub use grouping::group_by_phase;
pub use progress::aggregate_progress;
pub use snapshot::ScheduleSnapshot;
