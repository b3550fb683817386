//! Validation thresholds, loadable from a TOML rules file

use serde::{Deserialize, Serialize};
use stb_core::{Result, StbError};
use stb_model::ElementKind;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Rules file looked up by `load_from_directory`
pub const RULES_FILE_NAME: &str = "stb-rules.toml";

/// Numeric thresholds used by the data, section and geometry passes.
///
/// Lengths are millimetres. Every field has a default, so a rules file only
/// needs to name what it changes:
///
/// ```toml
/// min_member_length = 50.0
///
/// [max_member_length]
/// column = 20000.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Members shorter than this are flagged as suspicious
    pub min_member_length: f64,
    /// Coordinates with a larger magnitude are flagged
    pub coordinate_magnitude_limit: f64,
    /// Section dimensions larger than this are flagged
    pub max_section_dimension: f64,
    /// Per-kind overrides of the kind table's maximum length, keyed by kind key
    pub max_member_length: BTreeMap<String, f64>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_member_length: 100.0,
            coordinate_magnitude_limit: 1e9,
            max_section_dimension: 10_000.0,
            max_member_length: BTreeMap::new(),
        }
    }
}

impl ValidationRules {
    /// Load `stb-rules.toml` from a directory, falling back to defaults
    pub fn load_from_directory<P: AsRef<Path>>(path: P) -> Result<Self> {
        let rules_path = path.as_ref().join(RULES_FILE_NAME);
        if rules_path.exists() {
            Self::load_file(rules_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::load_string(&content)
    }

    pub fn load_string(content: &str) -> Result<Self> {
        let rules: ValidationRules = toml::from_str(content).map_err(|e| {
            StbError::RulesLoadError(format!("Failed to parse rules TOML: {}", e))
        })?;
        rules.check()?;
        Ok(rules)
    }

    fn check(&self) -> Result<()> {
        for (key, value) in &self.max_member_length {
            if ElementKind::from_key(key).is_none() {
                return Err(StbError::RulesLoadError(format!(
                    "Unknown element kind '{}' in max_member_length",
                    key
                )));
            }
            if !(value.is_finite() && *value > 0.0) {
                return Err(StbError::RulesLoadError(format!(
                    "max_member_length.{} must be a positive number, got {}",
                    key, value
                )));
            }
        }
        let positive = [
            ("min_member_length", self.min_member_length),
            ("coordinate_magnitude_limit", self.coordinate_magnitude_limit),
            ("max_section_dimension", self.max_section_dimension),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(StbError::RulesLoadError(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Longest plausible member of `kind`
    pub fn max_length_for(&self, kind: ElementKind) -> f64 {
        self.max_member_length
            .get(kind.key())
            .copied()
            .unwrap_or(kind.spec().max_length)
    }
}
