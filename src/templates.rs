//! Template library.
//!
//! Read-only catalog of schedule blueprints keyed by project type. Schedule
//! creation receives a catalog as an explicit input (see
//! [`create_schedule`](crate::materialize::create_schedule)); nothing here
//! is global or mutable.
//!
//! # Built-in Catalog
//!
//! | Project type | Phases |
//! |--------------|--------|
//! | `new_construction` | Pre-construction, Site Work, Structure, Finishes, Closeout |
//! | `renovation` | Planning, Demolition, Rough-in, Finishes, Closeout |
//! | `land_development` | Due Diligence, Entitlements, Infrastructure, Lot Delivery |

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::models::{DependencyType, PhaseTemplate, TaskTemplate, Template};

/// Lookup of templates by project type.
pub trait TemplateCatalog {
    /// Returns the template for a project type, if one is registered.
    fn template(&self, project_type: &str) -> Option<&Template>;

    /// Returns the template for a project type or an error naming it.
    fn require(&self, project_type: &str) -> Result<&Template> {
        self.template(project_type)
            .ok_or_else(|| ScheduleError::UnknownTemplate(project_type.to_string()))
    }
}

/// An in-memory template catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateLibrary {
    templates: Vec<Template>,
}

impl TemplateLibrary {
    /// Creates a catalog from templates. Later duplicates of a project type
    /// are shadowed by earlier ones.
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// Parses a catalog from a JSON array of templates.
    pub fn from_json(json: &str) -> Result<Self> {
        let templates: Vec<Template> = serde_json::from_str(json)?;
        Ok(Self::new(templates))
    }

    /// Serializes the catalog as a JSON array of templates.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.templates)?)
    }

    /// The default catalog.
    pub fn builtin() -> Self {
        Self::new(vec![new_construction(), renovation(), land_development()])
    }

    /// Registered project types, in catalog order.
    pub fn project_types(&self) -> Vec<&str> {
        self.templates
            .iter()
            .map(|t| t.project_type.as_str())
            .collect()
    }

    /// All templates.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateCatalog for TemplateLibrary {
    fn template(&self, project_type: &str) -> Option<&Template> {
        self.templates
            .iter()
            .find(|t| t.project_type == project_type)
    }
}

fn new_construction() -> Template {
    use DependencyType::*;
    Template::new("tpl-new-construction", "new_construction", "New Construction")
        .with_phase(
            PhaseTemplate::new("Pre-construction")
                .with_task(TaskTemplate::new("Design development", 20).critical())
                .with_task(TaskTemplate::new("Permit application", 30).critical())
                .with_task(TaskTemplate::new("Contractor bidding", 15).linked(SS, 10))
                .with_task(TaskTemplate::milestone("Permit issued").linked(FF, 0).critical()),
        )
        .with_phase(
            PhaseTemplate::new("Site Work")
                .with_task(TaskTemplate::new("Clearing and grading", 7).critical())
                .with_task(TaskTemplate::new("Utilities", 10).linked(SS, 3))
                .with_task(TaskTemplate::new("Foundation", 14).critical()),
        )
        .with_phase(
            PhaseTemplate::new("Structure")
                .with_task(TaskTemplate::new("Framing", 21).critical())
                .with_task(TaskTemplate::new("Roofing", 7).critical())
                .with_task(TaskTemplate::new("Windows and doors", 5).linked(SS, 2)),
        )
        .with_phase(
            PhaseTemplate::new("Finishes")
                .with_task(TaskTemplate::new("MEP rough-in", 14).linked(FS, 0).critical())
                .with_task(TaskTemplate::new("Drywall", 10).critical())
                .with_task(TaskTemplate::new("Interior finishes", 21).critical())
                .with_task(TaskTemplate::new("Exterior finishes", 14).linked(SS, 5)),
        )
        .with_phase(
            PhaseTemplate::new("Closeout")
                .with_task(TaskTemplate::new("Punch list", 7).linked(FS, 0).critical())
                .with_task(TaskTemplate::new("Final inspection", 2).linked(FS, 1).critical())
                .with_task(TaskTemplate::milestone("Certificate of occupancy").critical()),
        )
}

fn renovation() -> Template {
    use DependencyType::*;
    Template::new("tpl-renovation", "renovation", "Renovation")
        .with_phase(
            PhaseTemplate::new("Planning")
                .with_task(TaskTemplate::new("Scope and budget", 5).critical())
                .with_task(TaskTemplate::new("Permits", 14).critical()),
        )
        .with_phase(
            PhaseTemplate::new("Demolition")
                .with_task(TaskTemplate::new("Demo", 5).critical())
                .with_task(TaskTemplate::new("Haul-off", 2).linked(FF, 1)),
        )
        .with_phase(
            PhaseTemplate::new("Rough-in")
                .with_task(TaskTemplate::new("Framing repairs", 5).critical())
                .with_task(TaskTemplate::new("Plumbing and electrical", 7).linked(SS, 2).critical())
                .with_task(TaskTemplate::new("Rough-in inspection", 1).critical()),
        )
        .with_phase(
            PhaseTemplate::new("Finishes")
                .with_task(TaskTemplate::new("Drywall and paint", 10).critical())
                .with_task(TaskTemplate::new("Cabinets and fixtures", 7).critical())
                .with_task(TaskTemplate::new("Flooring", 5).linked(SS, 3)),
        )
        .with_phase(
            PhaseTemplate::new("Closeout")
                .with_task(TaskTemplate::new("Punch list", 3).critical())
                .with_task(TaskTemplate::milestone("Owner walkthrough").critical()),
        )
}

fn land_development() -> Template {
    use DependencyType::*;
    Template::new("tpl-land-development", "land_development", "Land Development")
        .with_phase(
            PhaseTemplate::new("Due Diligence")
                .with_task(TaskTemplate::new("Survey and title", 14).critical())
                .with_task(TaskTemplate::new("Environmental review", 21).linked(SS, 0))
                .with_task(TaskTemplate::milestone("Acquisition close").linked(FF, 5).critical()),
        )
        .with_phase(
            PhaseTemplate::new("Entitlements")
                .with_task(TaskTemplate::new("Site plan approval", 60).critical())
                .with_task(TaskTemplate::new("Plat recording", 10).critical()),
        )
        .with_phase(
            PhaseTemplate::new("Infrastructure")
                .with_task(TaskTemplate::new("Mass grading", 20).critical())
                .with_task(TaskTemplate::new("Wet utilities", 30).linked(SS, 10).critical())
                .with_task(TaskTemplate::new("Paving", 15).critical()),
        )
        .with_phase(
            PhaseTemplate::new("Lot Delivery")
                .with_task(TaskTemplate::new("Final acceptance", 10).critical())
                .with_task(TaskTemplate::milestone("Lots delivered").critical()),
        )
}
