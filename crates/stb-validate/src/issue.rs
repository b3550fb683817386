//! Issue vocabulary shared by every pass and the repair engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Data unusable for downstream consumers
    Error,
    /// Usable but suspect
    Warning,
    /// Informational, hidden unless requested
    Info,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Error, Severity::Warning, Severity::Info];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "{}", s)
    }
}

/// What part of the model an issue is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Structure,
    Reference,
    Data,
    Geometry,
    Duplicate,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Structure,
        Category::Reference,
        Category::Data,
        Category::Geometry,
        Category::Duplicate,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Structure => "structure",
            Category::Reference => "reference",
            Category::Data => "data",
            Category::Geometry => "geometry",
            Category::Duplicate => "duplicate",
        };
        write!(f, "{}", s)
    }
}

/// The exact rule that produced an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    MissingModel,
    MissingGroup,
    EmptyNodes,
    DuplicateId,
    InvalidCoordinate,
    CoordinateMagnitude,
    DuplicateStoryHeight,
    MissingStoryName,
    DuplicateAxisDistance,
    NegativeAxisDistance,
    MissingElementId,
    MissingSectionRef,
    MissingNodeRef,
    ZeroLength,
    DanglingNodeRef,
    DanglingSectionRef,
    SectionData,
    MemberTooShort,
    MemberTooLong,
}

impl IssueCode {
    pub fn category(&self) -> Category {
        match self {
            IssueCode::MissingModel | IssueCode::MissingGroup | IssueCode::EmptyNodes => {
                Category::Structure
            }
            IssueCode::DuplicateId
            | IssueCode::DuplicateStoryHeight
            | IssueCode::DuplicateAxisDistance => Category::Duplicate,
            IssueCode::InvalidCoordinate
            | IssueCode::CoordinateMagnitude
            | IssueCode::MissingStoryName
            | IssueCode::NegativeAxisDistance
            | IssueCode::MissingElementId
            | IssueCode::MissingSectionRef
            | IssueCode::MissingNodeRef
            | IssueCode::SectionData => Category::Data,
            IssueCode::ZeroLength | IssueCode::MemberTooShort | IssueCode::MemberTooLong => {
                Category::Geometry
            }
            IssueCode::DanglingNodeRef | IssueCode::DanglingSectionRef => Category::Reference,
        }
    }
}

/// A single classified finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub category: Category,
    pub code: IssueCode,
    pub message: String,
    /// STB tag of the offending entity (`StbNode`, `StbGirder`, ...)
    pub element_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    pub repairable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair_suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(
        code: IssueCode,
        severity: Severity,
        element_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: code.category(),
            code,
            message: message.into(),
            element_type: element_type.into(),
            element_id: None,
            attribute: None,
            value: None,
            expected: None,
            repairable: false,
            repair_suggestion: None,
        }
    }

    pub fn error(code: IssueCode, element_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, element_type, message)
    }

    pub fn warning(code: IssueCode, element_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warning, element_type, message)
    }

    pub fn info(code: IssueCode, element_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Info, element_type, message)
    }

    pub fn with_element_id(mut self, id: impl Into<String>) -> Self {
        self.element_id = Some(id.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Mark the issue repairable with a human-readable suggestion
    pub fn with_repair(mut self, suggestion: impl Into<String>) -> Self {
        self.repairable = true;
        self.repair_suggestion = Some(suggestion.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_follows_code() {
        let issue = ValidationIssue::error(IssueCode::DanglingNodeRef, "StbColumn", "dangling");
        assert_eq!(issue.category, Category::Reference);
        assert_eq!(IssueCode::ZeroLength.category(), Category::Geometry);
        assert_eq!(IssueCode::DuplicateStoryHeight.category(), Category::Duplicate);
        assert_eq!(IssueCode::EmptyNodes.category(), Category::Structure);
        assert_eq!(IssueCode::SectionData.category(), Category::Data);
    }

    #[test]
    fn test_builder_fields() {
        let issue = ValidationIssue::warning(IssueCode::MissingStoryName, "StbStory", "no name")
            .with_element_id("S1")
            .with_attribute("name")
            .with_repair("Synthesize a name");

        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.element_id.as_deref(), Some("S1"));
        assert!(issue.repairable);
        assert_eq!(issue.repair_suggestion.as_deref(), Some("Synthesize a name"));
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("Reference"), Some(Category::Reference));
        assert_eq!(Category::parse(" geometry "), Some(Category::Geometry));
        assert_eq!(Category::parse("layout"), None);
    }

    #[test]
    fn test_serialized_shape() {
        let issue = ValidationIssue::error(IssueCode::DuplicateId, "StbNode", "dup")
            .with_element_id("N1");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["severity"], "error");
        assert_eq!(json["category"], "duplicate");
        assert_eq!(json["code"], "duplicate_id");
        assert!(json.get("attribute").is_none());
    }
}
