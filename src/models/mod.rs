//! Schedule domain models.
//!
//! Provides the data contracts exchanged with the record store: the
//! schedule container, its phases and tasks, and the read-only templates
//! schedules are seeded from.
//!
//! # Ownership
//!
//! | Type | Owned by | Derived fields |
//! |------|----------|----------------|
//! | Schedule | project | `projected_end_date` |
//! | Phase | schedule | `start_date`, `end_date`, `percent_complete` |
//! | Task | schedule + phase | `scheduled_start`, `scheduled_end` |
//! | Template | catalog | none (read-only) |

mod phase;
mod schedule;
mod task;
mod template;

pub use phase::{date_span, Phase};
pub use schedule::{projected_end, Schedule, ScheduleStatus};
pub use task::{DependencyType, DurationType, Task, TaskStatus};
pub use template::{PhaseTemplate, TaskTemplate, Template};

pub(crate) use task::shift_days;
