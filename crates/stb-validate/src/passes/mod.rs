//! Validation passes
//!
//! Each pass reads the snapshot and appends issues; no pass looks at
//! another's output. `PASSES` fixes the order issues appear in the report.

mod axes;
mod elements;
mod geometry;
mod nodes;
mod references;
mod sections;
mod stories;
mod structure;

pub(crate) use stories::{height_key, synthesized_story_name};

use crate::issue::ValidationIssue;
use crate::rules::ValidationRules;
use crate::section::SectionValidator;
use crate::validator::ValidationOptions;
use stb_model::ModelSnapshot;

/// Everything a pass may read
pub struct PassContext<'s, 'a> {
    pub snapshot: &'s ModelSnapshot<'a>,
    pub rules: &'s ValidationRules,
    pub sections: &'s dyn SectionValidator,
}

type PassFn = fn(&PassContext<'_, '_>, &mut Vec<ValidationIssue>);

pub struct Pass {
    pub name: &'static str,
    pub enabled: fn(&ValidationOptions) -> bool,
    pub run: PassFn,
}

fn always(_: &ValidationOptions) -> bool {
    true
}

fn references_enabled(options: &ValidationOptions) -> bool {
    options.validate_references
}

fn sections_enabled(options: &ValidationOptions) -> bool {
    options.validate_sections
}

fn geometry_enabled(options: &ValidationOptions) -> bool {
    options.validate_geometry
}

pub const PASSES: [Pass; 8] = [
    Pass {
        name: "structure",
        enabled: always,
        run: structure::check,
    },
    Pass {
        name: "nodes",
        enabled: always,
        run: nodes::check,
    },
    Pass {
        name: "stories",
        enabled: always,
        run: stories::check,
    },
    Pass {
        name: "axes",
        enabled: always,
        run: axes::check,
    },
    Pass {
        name: "elements",
        enabled: always,
        run: elements::check,
    },
    Pass {
        name: "references",
        enabled: references_enabled,
        run: references::check,
    },
    Pass {
        name: "sections",
        enabled: sections_enabled,
        run: sections::check,
    },
    Pass {
        name: "geometry",
        enabled: geometry_enabled,
        run: geometry::check,
    },
];

/// Format a millimetre value without trailing noise
pub(crate) fn mm(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}
