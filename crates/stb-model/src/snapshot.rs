//! Read-only accessor view over an `StbDocument`
//!
//! A `ModelSnapshot` is built once per validation run and handed to every
//! pass. It resolves the kind table against the raw document so passes never
//! look at attribute names themselves.

use crate::format::{AxisDef, ElementDef, NodeDef, NumericValue, SectionDef, StbModelData, StoryDef};
use crate::kind::{ElementKind, SectionFamily};
use stb_core::Point3;
use std::collections::{BTreeMap, HashMap};

/// Node id to resolved position.
///
/// The position is `None` when any coordinate is missing or not a finite
/// number. For duplicated ids the first occurrence wins.
#[derive(Debug, Default)]
pub struct NodeMap {
    positions: HashMap<String, Option<Point3>>,
}

impl NodeMap {
    pub fn build(nodes: &[NodeDef]) -> Self {
        let mut positions = HashMap::with_capacity(nodes.len());
        for node in nodes {
            positions
                .entry(node.id.clone())
                .or_insert_with(|| resolve_position(node));
        }
        Self { positions }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn position(&self, id: &str) -> Option<Point3> {
        self.positions.get(id).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn resolve_position(node: &NodeDef) -> Option<Point3> {
    let x = NumericValue::of(node.x.as_ref()).finite()?;
    let y = NumericValue::of(node.y.as_ref()).finite()?;
    let z = NumericValue::of(node.z.as_ref()).finite()?;
    Some(Point3::new(x, y, z))
}

/// One reference attribute of an element
#[derive(Debug, Clone, PartialEq)]
pub struct AttrRef {
    pub attribute: &'static str,
    /// `None` when the attribute is absent or blank
    pub value: Option<String>,
}

/// An element as seen through the kind table
#[derive(Debug, Clone)]
pub struct ElementRecord<'a> {
    pub kind: ElementKind,
    /// Position within its member group
    pub index: usize,
    pub def: &'a ElementDef,
    pub node_refs: Vec<AttrRef>,
    pub section_refs: Vec<AttrRef>,
}

impl<'a> ElementRecord<'a> {
    pub fn from_def(kind: ElementKind, index: usize, def: &'a ElementDef) -> Self {
        let spec = kind.spec();
        let node_refs = spec
            .layout
            .attributes(|attr| def.attr_text(attr).is_some())
            .into_iter()
            .map(|attribute| AttrRef {
                attribute,
                value: def.attr_text(attribute),
            })
            .collect();
        let section_refs = spec
            .section_attrs
            .iter()
            .map(|&attribute| AttrRef {
                attribute,
                value: def.attr_text(attribute),
            })
            .collect();

        Self {
            kind,
            index,
            def,
            node_refs,
            section_refs,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.def.id.as_deref()
    }

    /// Id for messages; elements without an id are named by position
    pub fn label(&self) -> String {
        match self.id() {
            Some(id) => id.to_string(),
            None => format!("#{}", self.index + 1),
        }
    }

    pub fn is_two_node(&self) -> bool {
        self.node_refs.len() == 2
    }

    /// Both endpoint ids, when this is a two-node element with both present
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        match self.node_refs.as_slice() {
            [first, second] => Some((first.value.as_deref()?, second.value.as_deref()?)),
            _ => None,
        }
    }
}

/// Which parallel-axis group an axis belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisGroup {
    X,
    Y,
}

impl AxisGroup {
    pub fn tag(&self) -> &'static str {
        match self {
            AxisGroup::X => "StbX_Axis",
            AxisGroup::Y => "StbY_Axis",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            AxisGroup::X => "x",
            AxisGroup::Y => "y",
        }
    }
}

/// Immutable accessor view over one `StbModel`
#[derive(Debug)]
pub struct ModelSnapshot<'a> {
    model: &'a StbModelData,
    node_map: NodeMap,
    elements: BTreeMap<ElementKind, Vec<ElementRecord<'a>>>,
    sections: BTreeMap<SectionFamily, HashMap<&'a str, &'a SectionDef>>,
}

impl<'a> ModelSnapshot<'a> {
    pub fn build(model: &'a StbModelData) -> Self {
        let node_map = NodeMap::build(model.nodes.as_deref().unwrap_or_default());

        let mut elements = BTreeMap::new();
        for kind in ElementKind::ALL {
            let records: Vec<_> = model
                .members
                .as_ref()
                .and_then(|members| members.get(kind.key()))
                .map(|defs| {
                    defs.iter()
                        .enumerate()
                        .map(|(index, def)| ElementRecord::from_def(kind, index, def))
                        .collect()
                })
                .unwrap_or_default();
            elements.insert(kind, records);
        }

        let mut sections = BTreeMap::new();
        for family in SectionFamily::ALL {
            let mut by_id = HashMap::new();
            if let Some(defs) = model.sections.get(family.key()) {
                for def in defs {
                    by_id.entry(def.id.as_str()).or_insert(def);
                }
            }
            sections.insert(family, by_id);
        }

        Self {
            model,
            node_map,
            elements,
            sections,
        }
    }

    pub fn model(&self) -> &'a StbModelData {
        self.model
    }

    /// All `StbNode` entries in document order
    pub fn nodes(&self) -> &'a [NodeDef] {
        self.model.nodes.as_deref().unwrap_or_default()
    }

    pub fn node_map(&self) -> &NodeMap {
        &self.node_map
    }

    pub fn stories(&self) -> &'a [StoryDef] {
        &self.model.stories
    }

    pub fn axes(&self, group: AxisGroup) -> &'a [AxisDef] {
        match group {
            AxisGroup::X => &self.model.axes.x,
            AxisGroup::Y => &self.model.axes.y,
        }
    }

    pub fn elements(&self, kind: ElementKind) -> &[ElementRecord<'a>] {
        self.elements
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every element of every kind, in kind-table order
    pub fn all_elements(&self) -> impl Iterator<Item = &ElementRecord<'a>> {
        self.elements.values().flatten()
    }

    /// Section definitions of a family, in document order
    pub fn sections(&self, family: SectionFamily) -> &'a [SectionDef] {
        self.model
            .sections
            .get(family.key())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Sections an element of `kind` may reference
    pub fn sections_for(&self, kind: ElementKind) -> &'a [SectionDef] {
        self.sections(kind.spec().section_family)
    }

    pub fn has_section(&self, family: SectionFamily, id: &str) -> bool {
        self.sections
            .get(&family)
            .map(|by_id| by_id.contains_key(id))
            .unwrap_or(false)
    }

    /// Resolve a section id against the family used by `kind`
    pub fn section_for(&self, kind: ElementKind, id: &str) -> Option<&'a SectionDef> {
        self.sections
            .get(&kind.spec().section_family)
            .and_then(|by_id| by_id.get(id).copied())
    }

    /// Member group keys that are not in the kind table
    pub fn unknown_member_groups(&self) -> Vec<&'a str> {
        self.model
            .members
            .iter()
            .flat_map(|members| members.keys())
            .filter(|key| ElementKind::from_key(key).is_none())
            .map(String::as_str)
            .collect()
    }

    /// Entity counts keyed by STB tag
    pub fn element_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        counts.insert("StbNode".to_string(), self.nodes().len());
        counts.insert("StbStory".to_string(), self.stories().len());
        for group in [AxisGroup::X, AxisGroup::Y] {
            counts.insert(group.tag().to_string(), self.axes(group).len());
        }
        for (kind, records) in &self.elements {
            if !records.is_empty() {
                counts.insert(kind.tag().to_string(), records.len());
            }
        }
        for family in SectionFamily::ALL {
            let len = self.sections(family).len();
            if len > 0 {
                counts.insert(family.tag().to_string(), len);
            }
        }
        counts
    }
}
