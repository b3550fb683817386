//! Document format definitions
//!
//! The layout mirrors the ST-Bridge tree: `model` is `StbModel`, `nodes` is
//! `StbNodes`, `members` is `StbMembers` keyed by the element kind key
//! (`column`, `girder`, ...), `sections` is `StbSections` keyed by section
//! family. Attributes keep their STB names (`id_node_start`, `id_section`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Root of an extracted ST-Bridge document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StbDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// The `StbModel` element; absent when the source had no model root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<StbModelData>,
}

/// Contents of `StbModel`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StbModelData {
    /// `StbNodes`; `None` when the group itself is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<NodeDef>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stories: Vec<StoryDef>,
    #[serde(default, skip_serializing_if = "Axes::is_empty")]
    pub axes: Axes,
    /// `StbMembers`, keyed by element kind key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<BTreeMap<String, Vec<ElementDef>>>,
    /// `StbSections`, keyed by section family key
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sections: BTreeMap<String, Vec<SectionDef>>,
}

/// An `StbNode`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<AttrValue>,
}

impl NodeDef {
    pub fn new(id: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            id: id.into(),
            x: Some(AttrValue::Number(x)),
            y: Some(AttrValue::Number(y)),
            z: Some(AttrValue::Number(z)),
        }
    }

    /// Coordinate attribute by name (`x`, `y` or `z`)
    pub fn coordinate(&self, axis: &str) -> Option<&AttrValue> {
        match axis {
            "x" => self.x.as_ref(),
            "y" => self.y.as_ref(),
            "z" => self.z.as_ref(),
            _ => None,
        }
    }

    pub fn coordinate_mut(&mut self, axis: &str) -> Option<&mut Option<AttrValue>> {
        match axis {
            "x" => Some(&mut self.x),
            "y" => Some(&mut self.y),
            "z" => Some(&mut self.z),
            _ => None,
        }
    }
}

/// An `StbStory`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// `StbAxes`, split into the X and Y parallel-axis groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axes {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub x: Vec<AxisDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub y: Vec<AxisDef>,
}

impl Axes {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.y.is_empty()
    }

    pub fn len(&self) -> usize {
        self.x.len() + self.y.len()
    }
}

/// An `StbParallelAxis`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// A structural member (`StbColumn`, `StbGirder`, ...)
///
/// Everything except `id` is kept as a raw attribute map. The element kind
/// table decides which attributes are node and section references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, AttrValue>,
}

impl ElementDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Attribute rendered as reference text; empty strings count as absent
    pub fn attr_text(&self, name: &str) -> Option<String> {
        self.attributes
            .get(name)
            .map(AttrValue::as_text)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// A cross-section definition (`StbSecColumn_RC`, `StbSecBeam_S`, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    /// Dimensional attributes in millimetres (`width`, `depth`, `thickness`, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dimensions: BTreeMap<String, AttrValue>,
}

impl SectionDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.dimensions.insert(name.into(), value.into());
        self
    }
}

/// A raw attribute value as it came out of the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

/// Interpretation of an attribute that should hold a number
#[derive(Debug, Clone, PartialEq)]
pub enum NumericValue {
    Missing,
    NotNumeric(String),
    NonFinite(f64),
    Finite(f64),
}

impl NumericValue {
    pub fn of(value: Option<&AttrValue>) -> Self {
        let n = match value {
            None => return NumericValue::Missing,
            Some(AttrValue::Number(n)) => *n,
            Some(AttrValue::Text(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return NumericValue::Missing;
                }
                match trimmed.parse::<f64>() {
                    Ok(n) => n,
                    Err(_) => return NumericValue::NotNumeric(s.clone()),
                }
            }
        };

        if n.is_finite() {
            NumericValue::Finite(n)
        } else {
            NumericValue::NonFinite(n)
        }
    }

    pub fn finite(&self) -> Option<f64> {
        match self {
            NumericValue::Finite(n) => Some(*n),
            _ => None,
        }
    }
}

impl AttrValue {
    /// Text form used when the value is an id reference
    pub fn as_text(&self) -> String {
        match self {
            AttrValue::Text(s) => s.clone(),
            AttrValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            AttrValue::Number(n) => n.to_string(),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}
