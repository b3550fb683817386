//! STB Validate - Validation and auto-repair for ST-Bridge models
//!
//! Validation runs an ordered set of independent passes over a
//! `ModelSnapshot` and collects classified issues into a report. The repair
//! engine then removes or default-fixes the repairable subset on a working
//! copy of the document.

mod format;
mod issue;
mod passes;
mod repair;
mod report;
mod rules;
mod section;
mod validator;

pub use format::{format_repair_report, format_validation_report};
pub use issue::{Category, IssueCode, Severity, ValidationIssue};
pub use repair::{
    auto_repair_document, RepairAction, RepairEngine, RepairOptions, RepairOutcome, RepairReport,
    RepairStatus, RepairStrategy, SkipReason,
};
pub use report::{
    get_issues_by_category, get_issues_by_element_type, get_repairable_issues, Statistics,
    ValidationReport,
};
pub use rules::ValidationRules;
pub use section::{DimensionalSectionValidator, SectionFinding, SectionFindings, SectionValidator};
pub use validator::{validate_stb_document, ValidationOptions, Validator};
