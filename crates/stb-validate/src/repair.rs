//! Auto-repair engine
//!
//! Repairs run against a clone of the document, one issue at a time in
//! report order. Before acting, every strategy re-checks that the condition
//! behind the issue still holds in the working copy; an issue whose
//! condition is gone is skipped as already resolved. That makes repeated
//! runs with the same report act on nothing.
//!
//! A coordinate default can make a node resolve for the first time. Members
//! ending at that node are then measured, and those below the minimum length
//! are removed by the same action.

use crate::issue::{Category, IssueCode, ValidationIssue};
use crate::passes::{height_key, synthesized_story_name};
use crate::report::ValidationReport;
use serde::{Deserialize, Serialize};
use stb_model::{
    AttrValue, AxisDef, AxisGroup, ElementDef, ElementKind, ElementRecord, NodeMap, NumericValue,
    SectionFamily, StbDocument, StbModelData,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use tracing::{debug, info};

/// Which repairs may run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairOptions {
    /// Allow element removal and duplicate dropping
    pub remove_invalid: bool,
    /// Allow default-value substitution and name synthesis
    pub use_defaults: bool,
    /// Issues in these categories are never acted on
    pub skip_categories: Vec<Category>,
    /// Value written for invalid numeric attributes
    pub default_value: f64,
    /// Per-attribute overrides of `default_value`
    pub attribute_defaults: BTreeMap<String, f64>,
    /// Infinite coordinates are clamped to plus or minus this
    pub clamp_limit: f64,
    /// Members shorter than this (mm) count as too short
    pub min_member_length: f64,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            remove_invalid: true,
            use_defaults: true,
            skip_categories: Vec::new(),
            default_value: 0.0,
            attribute_defaults: BTreeMap::new(),
            clamp_limit: 1e9,
            min_member_length: 100.0,
        }
    }
}

impl RepairOptions {
    fn removes_short_members(&self) -> bool {
        self.remove_invalid && !self.skip_categories.contains(&Category::Geometry)
    }

    fn default_for(&self, attribute: &str) -> f64 {
        self.attribute_defaults
            .get(attribute)
            .copied()
            .unwrap_or(self.default_value)
    }
}

/// How an issue gets fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStrategy {
    /// Overwrite an invalid numeric attribute
    SetDefault,
    /// Give an unnamed story a name
    SynthesizeName,
    /// Remove the owning element
    RemoveElement,
    /// Keep the first story/axis with a value, drop the rest
    DropDuplicate,
}

impl RepairStrategy {
    /// Dispatch on category and issue code
    pub fn for_issue(issue: &ValidationIssue) -> Option<Self> {
        match (issue.category, issue.code) {
            (Category::Data, IssueCode::InvalidCoordinate | IssueCode::SectionData) => {
                Some(RepairStrategy::SetDefault)
            }
            (Category::Data, IssueCode::MissingStoryName) => Some(RepairStrategy::SynthesizeName),
            (Category::Data, IssueCode::MissingSectionRef | IssueCode::MissingNodeRef) => {
                Some(RepairStrategy::RemoveElement)
            }
            (Category::Reference, IssueCode::DanglingNodeRef | IssueCode::DanglingSectionRef) => {
                Some(RepairStrategy::RemoveElement)
            }
            (Category::Geometry, IssueCode::ZeroLength | IssueCode::MemberTooShort) => {
                Some(RepairStrategy::RemoveElement)
            }
            (
                Category::Duplicate,
                IssueCode::DuplicateStoryHeight | IssueCode::DuplicateAxisDistance,
            ) => Some(RepairStrategy::DropDuplicate),
            _ => None,
        }
    }

    /// Option that must be enabled for this strategy to run
    pub fn required_option(&self) -> &'static str {
        match self {
            RepairStrategy::SetDefault | RepairStrategy::SynthesizeName => "use_defaults",
            RepairStrategy::RemoveElement | RepairStrategy::DropDuplicate => "remove_invalid",
        }
    }

    fn enabled(&self, options: &RepairOptions) -> bool {
        match self {
            RepairStrategy::SetDefault | RepairStrategy::SynthesizeName => options.use_defaults,
            RepairStrategy::RemoveElement | RepairStrategy::DropDuplicate => options.remove_invalid,
        }
    }
}

impl fmt::Display for RepairStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RepairStrategy::SetDefault => "set_default",
            RepairStrategy::SynthesizeName => "synthesize_name",
            RepairStrategy::RemoveElement => "remove_element",
            RepairStrategy::DropDuplicate => "drop_duplicate",
        };
        write!(f, "{}", s)
    }
}

/// Why an issue was not acted on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotRepairable,
    CategoryExcluded(Category),
    OptionDisabled(String),
    AlreadyResolved,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotRepairable => write!(f, "issue is not repairable"),
            SkipReason::CategoryExcluded(c) => write!(f, "category '{}' excluded", c),
            SkipReason::OptionDisabled(o) => write!(f, "option '{}' disabled", o),
            SkipReason::AlreadyResolved => write!(f, "already resolved"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStatus {
    Applied,
    Skipped(SkipReason),
}

/// Outcome for one input issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairAction {
    /// Position of the issue in the input report
    pub issue_index: usize,
    pub element_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<RepairStrategy>,
    pub status: RepairStatus,
    pub description: String,
    /// Ids of elements, stories or axes this action removed; elements
    /// without an id appear as `#n`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<String>,
}

impl RepairAction {
    pub fn applied(&self) -> bool {
        self.status == RepairStatus::Applied
    }
}

/// Report of a repair run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepairReport {
    pub actions: Vec<RepairAction>,
    pub success_count: usize,
    pub skipped_count: usize,
    /// Every removed id, in removal order, without repeats
    pub removed_elements: Vec<String>,
}

impl RepairReport {
    fn record(&mut self, action: RepairAction) {
        if action.applied() {
            self.success_count += 1;
            for id in &action.removed {
                if !self.removed_elements.contains(id) {
                    self.removed_elements.push(id.clone());
                }
            }
        } else {
            self.skipped_count += 1;
        }
        self.actions.push(action);
    }

    pub fn applied_actions(&self) -> impl Iterator<Item = &RepairAction> {
        self.actions.iter().filter(|a| a.applied())
    }

    pub fn summary(&self) -> String {
        format!(
            "{} repair(s) applied, {} skipped, {} element(s) removed",
            self.success_count,
            self.skipped_count,
            self.removed_elements.len()
        )
    }
}

/// The repaired working copy plus what was done to it
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    pub document: StbDocument,
    pub report: RepairReport,
}

/// Ids that repairs never change, collected once per run
struct KnownIds {
    nodes: HashSet<String>,
    sections: HashMap<SectionFamily, HashSet<String>>,
}

impl KnownIds {
    fn collect(model: &StbModelData) -> Self {
        let nodes = model
            .nodes
            .iter()
            .flatten()
            .map(|n| n.id.clone())
            .collect();
        let sections = SectionFamily::ALL
            .into_iter()
            .map(|family| {
                let ids = model
                    .sections
                    .get(family.key())
                    .into_iter()
                    .flatten()
                    .map(|s| s.id.clone())
                    .collect();
                (family, ids)
            })
            .collect();
        Self { nodes, sections }
    }

    fn has_section(&self, family: SectionFamily, id: &str) -> bool {
        self.sections
            .get(&family)
            .map(|ids| ids.contains(id))
            .unwrap_or(false)
    }
}

/// What a strategy did
struct Applied {
    description: String,
    removed: Vec<String>,
}

/// Applies repair strategies for the repairable issues of a report
pub struct RepairEngine<'a> {
    options: &'a RepairOptions,
}

impl<'a> RepairEngine<'a> {
    pub fn new(options: &'a RepairOptions) -> Self {
        Self { options }
    }

    /// Repair a clone of `document`; the input is left untouched
    pub fn repair(&self, document: &StbDocument, report: &ValidationReport) -> RepairOutcome {
        let mut working = document.clone();
        let report = self.repair_in_place(&mut working, report);
        RepairOutcome {
            document: working,
            report,
        }
    }

    /// Repair `document` directly
    pub fn repair_in_place(&self, document: &mut StbDocument, report: &ValidationReport) -> RepairReport {
        let mut repair_report = RepairReport::default();
        let known = document.model.as_ref().map(KnownIds::collect);

        for (index, issue) in report.issues.iter().enumerate() {
            let strategy = RepairStrategy::for_issue(issue);
            let status_and_effect = match self.gate(issue, strategy) {
                Err(reason) => Err(reason),
                Ok(strategy) => match (document.model.as_mut(), known.as_ref()) {
                    (Some(model), Some(known)) => self
                        .apply(model, known, issue, strategy)
                        .ok_or(SkipReason::AlreadyResolved),
                    _ => Err(SkipReason::AlreadyResolved),
                },
            };

            let action = match status_and_effect {
                Ok(applied) => {
                    debug!(index, strategy = ?strategy, "{}", applied.description);
                    RepairAction {
                        issue_index: index,
                        element_type: issue.element_type.clone(),
                        element_id: issue.element_id.clone(),
                        strategy,
                        status: RepairStatus::Applied,
                        description: applied.description,
                        removed: applied.removed,
                    }
                }
                Err(reason) => {
                    debug!(index, reason = %reason, "skipped: {}", issue.message);
                    RepairAction {
                        issue_index: index,
                        element_type: issue.element_type.clone(),
                        element_id: issue.element_id.clone(),
                        strategy,
                        description: format!("Skipped ({}): {}", reason, issue.message),
                        status: RepairStatus::Skipped(reason),
                        removed: Vec::new(),
                    }
                }
            };
            repair_report.record(action);
        }

        info!(
            applied = repair_report.success_count,
            skipped = repair_report.skipped_count,
            removed = repair_report.removed_elements.len(),
            "repair finished"
        );
        repair_report
    }

    /// Decide whether an issue may be acted on at all
    fn gate(
        &self,
        issue: &ValidationIssue,
        strategy: Option<RepairStrategy>,
    ) -> Result<RepairStrategy, SkipReason> {
        if !issue.repairable {
            return Err(SkipReason::NotRepairable);
        }
        if self.options.skip_categories.contains(&issue.category) {
            return Err(SkipReason::CategoryExcluded(issue.category));
        }
        let strategy = strategy.ok_or(SkipReason::NotRepairable)?;
        if !strategy.enabled(self.options) {
            return Err(SkipReason::OptionDisabled(strategy.required_option().to_string()));
        }
        Ok(strategy)
    }

    fn apply(
        &self,
        model: &mut StbModelData,
        known: &KnownIds,
        issue: &ValidationIssue,
        strategy: RepairStrategy,
    ) -> Option<Applied> {
        match strategy {
            RepairStrategy::SetDefault if issue.code == IssueCode::InvalidCoordinate => {
                self.fix_coordinate(model, issue)
            }
            RepairStrategy::SetDefault => self.fix_section_dimension(model, issue),
            RepairStrategy::SynthesizeName => synthesize_story_name(model, issue),
            RepairStrategy::RemoveElement => self.remove_element(model, known, issue),
            RepairStrategy::DropDuplicate if issue.code == IssueCode::DuplicateStoryHeight => {
                drop_duplicate_stories(model, issue)
            }
            RepairStrategy::DropDuplicate => drop_duplicate_axes(model, issue),
        }
    }

    fn fix_coordinate(&self, model: &mut StbModelData, issue: &ValidationIssue) -> Option<Applied> {
        let node_id = issue.element_id.as_deref()?;
        let axis = issue.attribute.as_deref()?;
        let mut replacement = None;

        for node in model.nodes.iter_mut().flatten().filter(|n| n.id == node_id) {
            let Some(slot) = node.coordinate_mut(axis) else {
                continue;
            };
            let value = match NumericValue::of(slot.as_ref()) {
                NumericValue::Finite(_) => continue,
                NumericValue::NonFinite(n) if n.is_infinite() => {
                    self.options.clamp_limit.copysign(n)
                }
                _ => self.options.default_for(axis),
            };
            *slot = Some(AttrValue::Number(value));
            replacement = Some(value);
        }

        let value = replacement?;
        let mut description = format!("Set node '{}' {} = {}", node_id, axis, value);

        // The node may only now resolve, which can make its members too short
        let removed = if self.options.removes_short_members() {
            remove_short_members(model, node_id, self.options.min_member_length)
        } else {
            Vec::new()
        };
        if !removed.is_empty() {
            description.push_str(&format!("; removed short member(s) {}", removed.join(", ")));
        }

        Some(Applied { description, removed })
    }

    fn fix_section_dimension(&self, model: &mut StbModelData, issue: &ValidationIssue) -> Option<Applied> {
        let family = SectionFamily::from_tag(&issue.element_type)?;
        let section_id = issue.element_id.as_deref()?;
        let attribute = issue.attribute.as_deref()?;
        let value = self.options.default_for(attribute);
        let mut changed = false;

        for section in model
            .sections
            .get_mut(family.key())
            .into_iter()
            .flatten()
            .filter(|s| s.id == section_id)
        {
            if let Some(slot) = section.dimensions.get_mut(attribute) {
                if NumericValue::of(Some(&*slot)).finite().is_none() {
                    *slot = AttrValue::Number(value);
                    changed = true;
                }
            }
        }

        changed.then(|| Applied {
            description: format!("Set section '{}' {} = {}", section_id, attribute, value),
            removed: Vec::new(),
        })
    }

    /// Remove the element(s) the issue points at, if the condition still holds.
    ///
    /// Issues without an element id address every id-less element of the
    /// kind that shows the same condition; those are reported by position.
    fn remove_element(
        &self,
        model: &mut StbModelData,
        known: &KnownIds,
        issue: &ValidationIssue,
    ) -> Option<Applied> {
        let kind = ElementKind::from_tag(&issue.element_type)?;
        let element_id = issue.element_id.as_deref();
        let nodes = NodeMap::build(model.nodes.as_deref().unwrap_or(&[]));
        let min_length = self.options.min_member_length;
        let elements = model.members.as_mut()?.get_mut(kind.key())?;

        let still_invalid = |def: &ElementDef| -> bool {
            match issue.code {
                IssueCode::MissingSectionRef | IssueCode::MissingNodeRef => issue
                    .attribute
                    .as_deref()
                    .map_or(false, |attr| def.attr_text(attr).is_none()),
                IssueCode::ZeroLength => ElementRecord::from_def(kind, 0, def)
                    .endpoints()
                    .map_or(false, |(start, end)| start == end),
                IssueCode::DanglingNodeRef => match (issue.attribute.as_deref(), issue.value.as_deref()) {
                    (Some(attr), Some(value)) => {
                        def.attr_text(attr).as_deref() == Some(value) && !known.nodes.contains(value)
                    }
                    _ => false,
                },
                IssueCode::DanglingSectionRef => match (issue.attribute.as_deref(), issue.value.as_deref()) {
                    (Some(attr), Some(value)) => {
                        def.attr_text(attr).as_deref() == Some(value)
                            && !known.has_section(kind.spec().section_family, value)
                    }
                    _ => false,
                },
                IssueCode::MemberTooShort => is_short(kind, def, &nodes, min_length),
                _ => false,
            }
        };

        let mut removed = Vec::new();
        let mut index = 0;
        elements.retain(|def| {
            let label = ElementRecord::from_def(kind, index, def).label();
            index += 1;
            if def.id.as_deref() != element_id || !still_invalid(def) {
                return true;
            }
            if !removed.contains(&label) {
                removed.push(label);
            }
            false
        });

        if removed.is_empty() {
            return None;
        }
        Some(Applied {
            description: format!("Removed {} '{}'", kind.tag(), removed.join("', '")),
            removed,
        })
    }
}

/// Both ends resolve to distinct positions closer than `min_length`
fn is_short(kind: ElementKind, def: &ElementDef, nodes: &NodeMap, min_length: f64) -> bool {
    let record = ElementRecord::from_def(kind, 0, def);
    let Some((start, end)) = record.endpoints().filter(|(s, e)| s != e) else {
        return false;
    };
    match (nodes.position(start), nodes.position(end)) {
        (Some(a), Some(b)) => a.distance(&b) < min_length,
        _ => false,
    }
}

/// Remove every two-node member that ends at `node_id` and is now too short
fn remove_short_members(model: &mut StbModelData, node_id: &str, min_length: f64) -> Vec<String> {
    let nodes = NodeMap::build(model.nodes.as_deref().unwrap_or(&[]));
    let mut removed = Vec::new();
    let Some(members) = model.members.as_mut() else {
        return removed;
    };

    for (key, elements) in members.iter_mut() {
        let Some(kind) = ElementKind::from_key(key) else {
            continue;
        };
        let mut index = 0;
        elements.retain(|def| {
            let record = ElementRecord::from_def(kind, index, def);
            index += 1;
            let touches = record
                .endpoints()
                .map_or(false, |(start, end)| start == node_id || end == node_id);
            if !(touches && is_short(kind, def, &nodes, min_length)) {
                return true;
            }
            let label = record.label();
            if !removed.contains(&label) {
                removed.push(label);
            }
            false
        });
    }
    removed
}

fn synthesize_story_name(model: &mut StbModelData, issue: &ValidationIssue) -> Option<Applied> {
    let story_id = issue.element_id.as_deref()?;
    let name = synthesized_story_name(story_id);
    let mut changed = false;

    for story in model.stories.iter_mut().filter(|s| s.id == story_id) {
        if story.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            story.name = Some(name.clone());
            changed = true;
        }
    }

    changed.then(|| Applied {
        description: format!("Named story '{}' as '{}'", story_id, name),
        removed: Vec::new(),
    })
}

fn drop_duplicate_stories(model: &mut StbModelData, issue: &ValidationIssue) -> Option<Applied> {
    let height: f64 = issue.value.as_deref()?.parse().ok()?;
    let key = height_key(height);
    let mut kept = None;
    let mut removed = Vec::new();

    model.stories.retain(|story| {
        if story.height.map(height_key) != Some(key) {
            return true;
        }
        if kept.is_none() {
            kept = Some(story.id.clone());
            return true;
        }
        removed.push(story.id.clone());
        false
    });

    if removed.is_empty() {
        return None;
    }
    Some(Applied {
        description: format!(
            "Kept story '{}', dropped {} with the same height",
            kept.unwrap_or_default(),
            removed.join(", ")
        ),
        removed,
    })
}

fn drop_duplicate_axes(model: &mut StbModelData, issue: &ValidationIssue) -> Option<Applied> {
    let group = [AxisGroup::X, AxisGroup::Y]
        .into_iter()
        .find(|g| g.tag() == issue.element_type)?;
    let distance: f64 = issue.value.as_deref()?.parse().ok()?;
    let key = height_key(distance);

    let axes: &mut Vec<AxisDef> = match group {
        AxisGroup::X => &mut model.axes.x,
        AxisGroup::Y => &mut model.axes.y,
    };
    let mut kept = None;
    let mut removed = Vec::new();

    axes.retain(|axis| {
        if axis.distance.map(height_key) != Some(key) {
            return true;
        }
        if kept.is_none() {
            kept = Some(axis.id.clone());
            return true;
        }
        removed.push(axis.id.clone());
        false
    });

    if removed.is_empty() {
        return None;
    }
    Some(Applied {
        description: format!(
            "Kept axis '{}', dropped {} with the same distance",
            kept.unwrap_or_default(),
            removed.join(", ")
        ),
        removed,
    })
}

/// Repair a clone of `document` using the issues of `report`
pub fn auto_repair_document(
    document: &StbDocument,
    report: &ValidationReport,
    options: &RepairOptions,
) -> RepairOutcome {
    RepairEngine::new(options).repair(document, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::fixture::{model_with, two_node};
    use crate::validator::{validate_stb_document, ValidationOptions};
    use stb_model::{NodeDef, SectionDef, StoryDef};

    fn document() -> StbDocument {
        let mut members = BTreeMap::new();
        members.insert(
            "column".to_string(),
            vec![
                ElementDef::new("C1")
                    .with_attr("id_node_bottom", "N9")
                    .with_attr("id_node_top", "N2")
                    .with_attr("id_section", "SC1"),
                ElementDef::new("C2")
                    .with_attr("id_node_bottom", "N1")
                    .with_attr("id_node_top", "N2")
                    .with_attr("id_section", "SC1"),
            ],
        );
        let mut sections = BTreeMap::new();
        sections.insert(
            "column".to_string(),
            vec![SectionDef::new("SC1").with_dimension("width", "wide")],
        );
        StbDocument {
            version: None,
            model: Some(StbModelData {
                nodes: Some(vec![
                    NodeDef::new("N1", 0.0, 0.0, 0.0),
                    NodeDef {
                        id: "N2".to_string(),
                        x: Some(AttrValue::Number(0.0)),
                        y: Some(AttrValue::Number(f64::NEG_INFINITY)),
                        z: Some(AttrValue::Number(3000.0)),
                    },
                ]),
                stories: vec![
                    StoryDef {
                        id: "S1".to_string(),
                        name: None,
                        height: Some(0.0),
                    },
                    StoryDef {
                        id: "S2".to_string(),
                        name: Some("1FL'".to_string()),
                        height: Some(0.0),
                    },
                ],
                members: Some(members),
                sections,
                ..StbModelData::default()
            }),
        }
    }

    fn model(doc: &StbDocument) -> &StbModelData {
        doc.model.as_ref().unwrap()
    }

    #[test]
    fn test_dispatch_table() {
        let dangling = ValidationIssue::error(IssueCode::DanglingNodeRef, "StbColumn", "m");
        assert_eq!(RepairStrategy::for_issue(&dangling), Some(RepairStrategy::RemoveElement));
        let coord = ValidationIssue::error(IssueCode::InvalidCoordinate, "StbNode", "m");
        assert_eq!(RepairStrategy::for_issue(&coord), Some(RepairStrategy::SetDefault));
        let dup = ValidationIssue::error(IssueCode::DuplicateId, "StbNode", "m");
        assert_eq!(RepairStrategy::for_issue(&dup), None);
        let long = ValidationIssue::warning(IssueCode::MemberTooLong, "StbGirder", "m");
        assert_eq!(RepairStrategy::for_issue(&long), None);
    }

    #[test]
    fn test_repair_leaves_original_untouched() {
        let doc = document();
        let report = validate_stb_document(&doc, &ValidationOptions::default());
        let outcome = auto_repair_document(&doc, &report, &RepairOptions::default());

        assert_eq!(doc, document());
        assert_ne!(outcome.document, doc);
    }

    #[test]
    fn test_every_issue_gets_one_action() {
        let doc = document();
        let report = validate_stb_document(&doc, &ValidationOptions::default());
        let outcome = auto_repair_document(&doc, &report, &RepairOptions::default());

        assert_eq!(outcome.report.actions.len(), report.issues.len());
        assert_eq!(
            outcome.report.success_count + outcome.report.skipped_count,
            report.issues.len()
        );
    }

    #[test]
    fn test_applied_repairs() {
        let doc = document();
        let report = validate_stb_document(&doc, &ValidationOptions::default());
        let outcome = auto_repair_document(&doc, &report, &RepairOptions::default());
        let repaired = model(&outcome.document);

        // Dangling column removed
        let columns = &repaired.members.as_ref().unwrap()["column"];
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].id.as_deref(), Some("C2"));
        assert!(outcome.report.removed_elements.contains(&"C1".to_string()));

        // -inf clamped
        let n2 = &repaired.nodes.as_ref().unwrap()[1];
        assert_eq!(n2.y, Some(AttrValue::Number(-1e9)));

        // Section dimension defaulted
        assert_eq!(
            repaired.sections["column"][0].dimensions["width"],
            AttrValue::Number(0.0)
        );

        // Duplicate story dropped, first story named
        assert_eq!(repaired.stories.len(), 1);
        assert_eq!(repaired.stories[0].name.as_deref(), Some("Story S1"));
        assert!(outcome.report.removed_elements.contains(&"S2".to_string()));
    }

    #[test]
    fn test_disabled_options_skip() {
        let doc = document();
        let report = validate_stb_document(&doc, &ValidationOptions::default());
        let options = RepairOptions {
            remove_invalid: false,
            use_defaults: false,
            ..RepairOptions::default()
        };
        let outcome = auto_repair_document(&doc, &report, &options);

        assert_eq!(outcome.report.success_count, 0);
        assert_eq!(outcome.document, doc);
        assert!(outcome.report.actions.iter().any(|a| a.status
            == RepairStatus::Skipped(SkipReason::OptionDisabled("remove_invalid".to_string()))));
        assert!(outcome.report.actions.iter().any(|a| a.status
            == RepairStatus::Skipped(SkipReason::OptionDisabled("use_defaults".to_string()))));
    }

    #[test]
    fn test_skip_categories() {
        let doc = document();
        let report = validate_stb_document(&doc, &ValidationOptions::default());
        let options = RepairOptions {
            skip_categories: vec![Category::Reference],
            ..RepairOptions::default()
        };
        let outcome = auto_repair_document(&doc, &report, &options);

        let columns = &model(&outcome.document).members.as_ref().unwrap()["column"];
        assert_eq!(columns.len(), 2);
        assert!(outcome.report.actions.iter().any(|a| a.status
            == RepairStatus::Skipped(SkipReason::CategoryExcluded(Category::Reference))));
    }

    #[test]
    fn test_replaying_stale_report_does_nothing() {
        let doc = document();
        let report = validate_stb_document(&doc, &ValidationOptions::default());
        let options = RepairOptions::default();
        let first = auto_repair_document(&doc, &report, &options);
        let second = auto_repair_document(&first.document, &report, &options);

        assert_eq!(second.report.success_count, 0);
        assert_eq!(second.document, first.document);
        assert!(second.report.removed_elements.is_empty());
    }

    #[test]
    fn test_attribute_defaults_override() {
        let doc = document();
        let report = validate_stb_document(&doc, &ValidationOptions::default());
        let mut attribute_defaults = BTreeMap::new();
        attribute_defaults.insert("width".to_string(), 500.0);
        let options = RepairOptions {
            attribute_defaults,
            ..RepairOptions::default()
        };
        let outcome = auto_repair_document(&doc, &report, &options);
        assert_eq!(
            model(&outcome.document).sections["column"][0].dimensions["width"],
            AttrValue::Number(500.0)
        );
    }

    fn beam_document(nodes: Vec<NodeDef>, beams: Vec<ElementDef>) -> StbDocument {
        let members = beams.into_iter().map(|b| ("beam", b)).collect();
        StbDocument {
            version: None,
            model: Some(model_with(
                nodes,
                members,
                vec![("beam", SectionDef::new("SB1").with_dimension("width", 300.0))],
            )),
        }
    }

    fn beams(doc: &StbDocument) -> &[ElementDef] {
        &model(doc).members.as_ref().unwrap()["beam"]
    }

    #[test]
    fn test_short_member_removal_spares_same_id_member() {
        let doc = beam_document(
            vec![
                NodeDef::new("N1", 0.0, 0.0, 0.0),
                NodeDef::new("N2", 50.0, 0.0, 0.0),
                NodeDef::new("N3", 6000.0, 0.0, 0.0),
            ],
            vec![
                two_node("B1", "N1", "N2", "SB1"),
                two_node("B1", "N1", "N3", "SB1"),
            ],
        );
        let report = validate_stb_document(&doc, &ValidationOptions::default());
        assert!(report.issues.iter().any(|i| i.code == IssueCode::MemberTooShort));

        let outcome = auto_repair_document(&doc, &report, &RepairOptions::default());
        let left = beams(&outcome.document);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].attr_text("id_node_end").as_deref(), Some("N3"));
    }

    #[test]
    fn test_short_member_threshold_comes_from_options() {
        let doc = beam_document(
            vec![
                NodeDef::new("N1", 0.0, 0.0, 0.0),
                NodeDef::new("N2", 50.0, 0.0, 0.0),
            ],
            vec![two_node("B1", "N1", "N2", "SB1")],
        );
        let report = validate_stb_document(&doc, &ValidationOptions::default());
        let options = RepairOptions {
            min_member_length: 40.0,
            ..RepairOptions::default()
        };
        let outcome = auto_repair_document(&doc, &report, &options);
        assert_eq!(beams(&outcome.document).len(), 1);
        assert!(outcome.report.actions.iter().any(|a| a.status
            == RepairStatus::Skipped(SkipReason::AlreadyResolved)));
    }

    fn node_missing_x() -> Vec<NodeDef> {
        vec![
            NodeDef::new("N1", 0.0, 0.0, 0.0),
            NodeDef {
                id: "N2".to_string(),
                x: None,
                y: Some(AttrValue::Number(0.0)),
                z: Some(AttrValue::Number(0.0)),
            },
            NodeDef::new("N3", 6000.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_coordinate_default_removes_members_now_too_short() {
        let doc = beam_document(
            node_missing_x(),
            vec![
                two_node("B1", "N1", "N2", "SB1"),
                two_node("B2", "N2", "N3", "SB1"),
            ],
        );
        let options = RepairOptions::default();
        let report = validate_stb_document(&doc, &ValidationOptions::default());
        let first = auto_repair_document(&doc, &report, &options);

        let coordinate = first
            .report
            .applied_actions()
            .find(|a| a.strategy == Some(RepairStrategy::SetDefault))
            .unwrap();
        assert_eq!(coordinate.removed, vec!["B1".to_string()]);
        assert_eq!(first.report.removed_elements, vec!["B1".to_string()]);

        let left = beams(&first.document);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id.as_deref(), Some("B2"));

        let revalidated = validate_stb_document(&first.document, &ValidationOptions::default());
        assert!(revalidated.repairable_issues().is_empty());
        let second = auto_repair_document(&first.document, &revalidated, &options);
        assert_eq!(second.report.success_count, 0);
    }

    #[test]
    fn test_coordinate_default_keeps_short_members_when_removal_disabled() {
        let doc = beam_document(node_missing_x(), vec![two_node("B1", "N1", "N2", "SB1")]);
        let report = validate_stb_document(&doc, &ValidationOptions::default());
        let options = RepairOptions {
            skip_categories: vec![Category::Geometry],
            ..RepairOptions::default()
        };
        let outcome = auto_repair_document(&doc, &report, &options);

        assert_eq!(outcome.report.success_count, 1);
        assert!(outcome.report.removed_elements.is_empty());
        assert_eq!(beams(&outcome.document).len(), 1);
    }

    #[test]
    fn test_element_without_id_removed_by_position() {
        let mut orphan = two_node("unused", "N1", "N9", "SB1");
        orphan.id = None;
        let doc = beam_document(
            vec![
                NodeDef::new("N1", 0.0, 0.0, 0.0),
                NodeDef::new("N3", 6000.0, 0.0, 0.0),
            ],
            vec![two_node("B1", "N1", "N3", "SB1"), orphan],
        );
        let report = validate_stb_document(&doc, &ValidationOptions::default());
        let outcome = auto_repair_document(&doc, &report, &RepairOptions::default());

        let left = beams(&outcome.document);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id.as_deref(), Some("B1"));
        assert_eq!(outcome.report.removed_elements, vec!["#2".to_string()]);

        let missing_id = report
            .issues
            .iter()
            .position(|i| i.code == IssueCode::MissingElementId)
            .unwrap();
        assert_eq!(
            outcome.report.actions[missing_id].status,
            RepairStatus::Skipped(SkipReason::NotRepairable)
        );
    }
}
