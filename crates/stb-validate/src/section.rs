//! Section data validation
//!
//! Dimensional rules for cross-sections live behind `SectionValidator` so a
//! caller with richer section knowledge can substitute its own checks.

use crate::rules::ValidationRules;
use stb_model::{NumericValue, SectionDef, SectionFamily};

/// One finding about a section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionFinding {
    pub message: String,
    /// Dimension the finding is about, when it is about one
    pub attribute: Option<String>,
    pub value: Option<String>,
}

impl SectionFinding {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attribute: None,
            value: None,
        }
    }

    pub fn on(mut self, attribute: impl Into<String>, value: Option<String>) -> Self {
        self.attribute = Some(attribute.into());
        self.value = value;
        self
    }
}

/// Errors and warnings for one section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionFindings {
    pub errors: Vec<SectionFinding>,
    pub warnings: Vec<SectionFinding>,
}

impl SectionFindings {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Checks the numeric content of a section definition
pub trait SectionValidator {
    fn validate(&self, section: &SectionDef, family: SectionFamily) -> SectionFindings;
}

/// Default checks: every dimension must be a finite positive number of
/// plausible size.
///
/// Non-numeric and non-finite values are errors; non-positive and oversized
/// values are warnings.
#[derive(Debug, Clone)]
pub struct DimensionalSectionValidator {
    max_dimension: f64,
}

impl DimensionalSectionValidator {
    pub fn new(max_dimension: f64) -> Self {
        Self { max_dimension }
    }

    pub fn from_rules(rules: &ValidationRules) -> Self {
        Self::new(rules.max_section_dimension)
    }
}

impl Default for DimensionalSectionValidator {
    fn default() -> Self {
        Self::from_rules(&ValidationRules::default())
    }
}

impl SectionValidator for DimensionalSectionValidator {
    fn validate(&self, section: &SectionDef, _family: SectionFamily) -> SectionFindings {
        let mut findings = SectionFindings::default();

        for (name, raw) in &section.dimensions {
            let text = Some(raw.as_text());
            match NumericValue::of(Some(raw)) {
                NumericValue::Missing => findings.errors.push(
                    SectionFinding::new(format!("dimension '{}' is empty", name)).on(name, text),
                ),
                NumericValue::NotNumeric(s) => findings.errors.push(
                    SectionFinding::new(format!("dimension '{}' is not a number: '{}'", name, s))
                        .on(name, text),
                ),
                NumericValue::NonFinite(n) => findings.errors.push(
                    SectionFinding::new(format!("dimension '{}' is not finite: {}", name, n))
                        .on(name, text),
                ),
                NumericValue::Finite(n) if n <= 0.0 => findings.warnings.push(
                    SectionFinding::new(format!("dimension '{}' must be positive, got {}", name, n))
                        .on(name, text),
                ),
                NumericValue::Finite(n) if n > self.max_dimension => findings.warnings.push(
                    SectionFinding::new(format!(
                        "dimension '{}' = {} exceeds {} mm",
                        name, n, self.max_dimension
                    ))
                    .on(name, text),
                ),
                NumericValue::Finite(_) => {}
            }
        }

        findings
    }
}
