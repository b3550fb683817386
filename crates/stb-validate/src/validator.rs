//! Validation engine

use crate::issue::{IssueCode, Severity, ValidationIssue};
use crate::passes::{PassContext, PASSES};
use crate::report::{Statistics, ValidationReport};
use crate::rules::ValidationRules;
use crate::section::{DimensionalSectionValidator, SectionValidator};
use serde::{Deserialize, Serialize};
use stb_model::{ModelSnapshot, StbDocument};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Which optional passes run and whether Info issues are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    pub validate_references: bool,
    pub validate_geometry: bool,
    pub validate_sections: bool,
    pub include_info: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            validate_references: true,
            validate_geometry: true,
            validate_sections: true,
            include_info: false,
        }
    }
}

/// Runs the validation passes over a document
pub struct Validator<'a> {
    rules: &'a ValidationRules,
    section_validator: &'a dyn SectionValidator,
    options: ValidationOptions,
}

impl<'a> Validator<'a> {
    pub fn new(
        rules: &'a ValidationRules,
        section_validator: &'a dyn SectionValidator,
        options: ValidationOptions,
    ) -> Self {
        Self {
            rules,
            section_validator,
            options,
        }
    }

    /// Run every enabled pass and return a fresh report
    pub fn validate(&self, document: &StbDocument) -> ValidationReport {
        let model = match &document.model {
            Some(model) => model,
            None => {
                let issue = ValidationIssue::error(
                    IssueCode::MissingModel,
                    "StbModel",
                    "Document has no StbModel element",
                )
                .with_expected("StbModel root element");
                let issues = vec![issue];
                let statistics = Statistics::tally(&issues, BTreeMap::new());
                return ValidationReport::new(issues, statistics);
            }
        };

        let snapshot = ModelSnapshot::build(model);
        let ctx = PassContext {
            snapshot: &snapshot,
            rules: self.rules,
            sections: self.section_validator,
        };

        let mut issues = Vec::new();
        for pass in PASSES.iter() {
            if !(pass.enabled)(&self.options) {
                debug!(pass = pass.name, "pass disabled");
                continue;
            }
            let before = issues.len();
            (pass.run)(&ctx, &mut issues);
            debug!(pass = pass.name, found = issues.len() - before, "pass complete");
        }

        let statistics = Statistics::tally(&issues, snapshot.element_counts());
        if !self.options.include_info {
            issues.retain(|i| i.severity != Severity::Info);
        }

        let report = ValidationReport::new(issues, statistics);
        info!(
            valid = report.valid,
            errors = report.statistics.error_count,
            warnings = report.statistics.warning_count,
            repairable = report.statistics.repairable_count,
            "validation finished"
        );
        report
    }
}

/// Validate with default rules and the default section validator
pub fn validate_stb_document(document: &StbDocument, options: &ValidationOptions) -> ValidationReport {
    let rules = ValidationRules::default();
    let sections = DimensionalSectionValidator::from_rules(&rules);
    Validator::new(&rules, &sections, *options).validate(document)
}
