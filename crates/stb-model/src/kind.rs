//! Element kind dispatch table
//!
//! Every per-kind decision the checker makes (which attributes are node
//! references, which are section references, which section family resolves
//! them, how long a member may plausibly be) is read from `KIND_TABLE`.
//! Supporting a new STB member kind means adding one row here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Section reference value meaning "intentionally unset"
pub const SECTION_UNSET: &str = "0";

/// Structural member kinds understood by the checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Column,
    Post,
    Girder,
    Beam,
    Brace,
    Pile,
    Footing,
    FoundationColumn,
}

/// How an element kind references its nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeLayout {
    /// Two endpoint attributes, both required
    Pair(&'static str, &'static str),
    /// One node attribute
    Single(&'static str),
    /// Single-node when `single` is present, otherwise a pair
    SingleOrPair {
        single: &'static str,
        first: &'static str,
        second: &'static str,
    },
}

impl NodeLayout {
    /// Node attributes that apply to an element carrying `has_single`
    pub fn attributes(&self, has_single: impl Fn(&str) -> bool) -> Vec<&'static str> {
        match *self {
            NodeLayout::Pair(first, second) => vec![first, second],
            NodeLayout::Single(attr) => vec![attr],
            NodeLayout::SingleOrPair {
                single,
                first,
                second,
            } => {
                if has_single(single) {
                    vec![single]
                } else {
                    vec![first, second]
                }
            }
        }
    }
}

/// Section groups inside `StbSections`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionFamily {
    Column,
    Beam,
    Brace,
    Pile,
    Foundation,
}

impl SectionFamily {
    pub const ALL: [SectionFamily; 5] = [
        SectionFamily::Column,
        SectionFamily::Beam,
        SectionFamily::Brace,
        SectionFamily::Pile,
        SectionFamily::Foundation,
    ];

    /// Key used under `model.sections`
    pub fn key(&self) -> &'static str {
        match self {
            SectionFamily::Column => "column",
            SectionFamily::Beam => "beam",
            SectionFamily::Brace => "brace",
            SectionFamily::Pile => "pile",
            SectionFamily::Foundation => "foundation",
        }
    }

    /// Element type name used in issues about sections of this family
    pub fn tag(&self) -> &'static str {
        match self {
            SectionFamily::Column => "StbSecColumn",
            SectionFamily::Beam => "StbSecBeam",
            SectionFamily::Brace => "StbSecBrace",
            SectionFamily::Pile => "StbSecPile",
            SectionFamily::Foundation => "StbSecFoundation",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.tag() == tag)
    }
}

/// One row of the kind table
#[derive(Debug, Clone, Copy)]
pub struct KindSpec {
    pub kind: ElementKind,
    /// Key used under `model.members`
    pub key: &'static str,
    /// ST-Bridge element tag
    pub tag: &'static str,
    pub layout: NodeLayout,
    pub section_attrs: &'static [&'static str],
    pub section_family: SectionFamily,
    /// Section reference value treated as "not set" for this kind
    pub unset_sentinel: Option<&'static str>,
    /// Longest plausible member in millimetres
    pub max_length: f64,
}

impl KindSpec {
    /// True when `value` is this kind's "not set" section reference
    pub fn is_unset_section(&self, value: &str) -> bool {
        self.unset_sentinel == Some(value)
    }
}

pub const KIND_TABLE: [KindSpec; 8] = [
    KindSpec {
        kind: ElementKind::Column,
        key: "column",
        tag: "StbColumn",
        layout: NodeLayout::Pair("id_node_bottom", "id_node_top"),
        section_attrs: &["id_section"],
        section_family: SectionFamily::Column,
        unset_sentinel: None,
        max_length: 30_000.0,
    },
    KindSpec {
        kind: ElementKind::Post,
        key: "post",
        tag: "StbPost",
        layout: NodeLayout::Pair("id_node_bottom", "id_node_top"),
        section_attrs: &["id_section"],
        section_family: SectionFamily::Column,
        unset_sentinel: None,
        max_length: 30_000.0,
    },
    KindSpec {
        kind: ElementKind::Girder,
        key: "girder",
        tag: "StbGirder",
        layout: NodeLayout::Pair("id_node_start", "id_node_end"),
        section_attrs: &["id_section"],
        section_family: SectionFamily::Beam,
        unset_sentinel: None,
        max_length: 50_000.0,
    },
    KindSpec {
        kind: ElementKind::Beam,
        key: "beam",
        tag: "StbBeam",
        layout: NodeLayout::Pair("id_node_start", "id_node_end"),
        section_attrs: &["id_section"],
        section_family: SectionFamily::Beam,
        unset_sentinel: None,
        max_length: 50_000.0,
    },
    KindSpec {
        kind: ElementKind::Brace,
        key: "brace",
        tag: "StbBrace",
        layout: NodeLayout::Pair("id_node_start", "id_node_end"),
        section_attrs: &["id_section"],
        section_family: SectionFamily::Brace,
        unset_sentinel: None,
        max_length: 40_000.0,
    },
    KindSpec {
        kind: ElementKind::Pile,
        key: "pile",
        tag: "StbPile",
        layout: NodeLayout::SingleOrPair {
            single: "id_node",
            first: "id_node_bottom",
            second: "id_node_top",
        },
        section_attrs: &["id_section"],
        section_family: SectionFamily::Pile,
        unset_sentinel: None,
        max_length: 50_000.0,
    },
    KindSpec {
        kind: ElementKind::Footing,
        key: "footing",
        tag: "StbFooting",
        layout: NodeLayout::Single("id_node"),
        section_attrs: &["id_section"],
        section_family: SectionFamily::Foundation,
        unset_sentinel: None,
        max_length: 50_000.0,
    },
    KindSpec {
        kind: ElementKind::FoundationColumn,
        key: "foundation_column",
        tag: "StbFoundationColumn",
        layout: NodeLayout::Single("id_node"),
        section_attrs: &["id_section_FD", "id_section_WR"],
        section_family: SectionFamily::Foundation,
        unset_sentinel: Some(SECTION_UNSET),
        max_length: 50_000.0,
    },
];

impl ElementKind {
    pub const ALL: [ElementKind; 8] = [
        ElementKind::Column,
        ElementKind::Post,
        ElementKind::Girder,
        ElementKind::Beam,
        ElementKind::Brace,
        ElementKind::Pile,
        ElementKind::Footing,
        ElementKind::FoundationColumn,
    ];

    pub fn spec(&self) -> &'static KindSpec {
        // KIND_TABLE rows are declared in ALL order
        &KIND_TABLE[*self as usize]
    }

    pub fn key(&self) -> &'static str {
        self.spec().key
    }

    pub fn tag(&self) -> &'static str {
        self.spec().tag
    }

    pub fn from_key(key: &str) -> Option<Self> {
        KIND_TABLE.iter().find(|s| s.key == key).map(|s| s.kind)
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        KIND_TABLE.iter().find(|s| s.tag == tag).map(|s| s.kind)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_enum_order() {
        for kind in ElementKind::ALL {
            assert_eq!(kind.spec().kind, kind);
        }
    }

    #[test]
    fn test_lookup_by_key_and_tag() {
        assert_eq!(ElementKind::from_key("girder"), Some(ElementKind::Girder));
        assert_eq!(
            ElementKind::from_tag("StbFoundationColumn"),
            Some(ElementKind::FoundationColumn)
        );
        assert_eq!(ElementKind::from_key("slab"), None);
        assert_eq!(SectionFamily::from_key("brace"), Some(SectionFamily::Brace));
    }

    #[test]
    fn test_pile_layout_switches_on_single_node() {
        let layout = ElementKind::Pile.spec().layout;
        assert_eq!(layout.attributes(|a| a == "id_node"), vec!["id_node"]);
        assert_eq!(
            layout.attributes(|_| false),
            vec!["id_node_bottom", "id_node_top"]
        );
    }

    #[test]
    fn test_foundation_column_has_two_section_attrs() {
        let spec = ElementKind::FoundationColumn.spec();
        assert_eq!(spec.section_attrs, &["id_section_FD", "id_section_WR"]);
        assert!(spec.is_unset_section("0"));
        assert!(!ElementKind::Column.spec().is_unset_section("0"));
    }

    #[test]
    fn test_only_foundation_column_uses_sentinel() {
        for spec in KIND_TABLE.iter() {
            let expected = spec.kind == ElementKind::FoundationColumn;
            assert_eq!(spec.unset_sentinel.is_some(), expected);
        }
    }

    #[test]
    fn test_max_lengths_within_expected_band() {
        for spec in KIND_TABLE.iter() {
            assert!(spec.max_length >= 30_000.0 && spec.max_length <= 50_000.0);
        }
    }
}
