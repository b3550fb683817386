//! Reference integrity: node and section ids must resolve

use super::PassContext;
use crate::issue::{IssueCode, ValidationIssue};

pub fn check(ctx: &PassContext<'_, '_>, issues: &mut Vec<ValidationIssue>) {
    let node_map = ctx.snapshot.node_map();

    for record in ctx.snapshot.all_elements() {
        let tag = record.kind.tag();
        let spec = record.kind.spec();
        let label = record.label();
        let mut reported: Vec<&str> = Vec::new();
        let mut reported_sections: Vec<&str> = Vec::new();

        for node_ref in &record.node_refs {
            let Some(node_id) = node_ref.value.as_deref() else {
                continue;
            };
            if node_map.contains(node_id) || reported.contains(&node_id) {
                continue;
            }
            reported.push(node_id);

            let mut issue = ValidationIssue::error(
                IssueCode::DanglingNodeRef,
                tag,
                format!(
                    "{} '{}' references missing node '{}' ({})",
                    tag, label, node_id, node_ref.attribute
                ),
            )
            .with_attribute(node_ref.attribute)
            .with_value(node_id)
            .with_expected("id of an existing StbNode")
            .with_repair(format!("Remove {} '{}'", tag, label));
            if let Some(id) = record.id() {
                issue = issue.with_element_id(id);
            }
            issues.push(issue);
        }

        for section_ref in &record.section_refs {
            let Some(section_id) = section_ref.value.as_deref() else {
                continue;
            };
            if spec.is_unset_section(section_id)
                || ctx.snapshot.section_for(record.kind, section_id).is_some()
                || reported_sections.contains(&section_id)
            {
                continue;
            }
            reported_sections.push(section_id);

            let mut issue = ValidationIssue::error(
                IssueCode::DanglingSectionRef,
                tag,
                format!(
                    "{} '{}' references missing {} section '{}' ({})",
                    tag,
                    label,
                    spec.section_family.key(),
                    section_id,
                    section_ref.attribute
                ),
            )
            .with_attribute(section_ref.attribute)
            .with_value(section_id)
            .with_expected(format!("id of an existing {} section", spec.section_family.tag()))
            .with_repair(format!("Remove {} '{}'", tag, label));
            if let Some(id) = record.id() {
                issue = issue.with_element_id(id);
            }
            issues.push(issue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{Category, Severity};
    use crate::passes::fixture::{model_with, two_node};
    use crate::rules::ValidationRules;
    use crate::section::DimensionalSectionValidator;
    use stb_model::{ElementDef, ModelSnapshot, NodeDef, SectionDef, StbModelData};

    fn run(model: &StbModelData) -> Vec<ValidationIssue> {
        let snapshot = ModelSnapshot::build(model);
        let rules = ValidationRules::default();
        let sections = DimensionalSectionValidator::default();
        let ctx = PassContext {
            snapshot: &snapshot,
            rules: &rules,
            sections: &sections,
        };
        let mut issues = Vec::new();
        check(&ctx, &mut issues);
        issues
    }

    fn nodes() -> Vec<NodeDef> {
        vec![
            NodeDef::new("N1", 0.0, 0.0, 0.0),
            NodeDef::new("N2", 0.0, 0.0, 3000.0),
        ]
    }

    #[test]
    fn test_dangling_column_node() {
        let column = ElementDef::new("C1")
            .with_attr("id_node_bottom", "N9")
            .with_attr("id_node_top", "N2")
            .with_attr("id_section", "SC1");
        let model = model_with(
            nodes(),
            vec![("column", column)],
            vec![("column", SectionDef::new("SC1"))],
        );
        let issues = run(&model);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].category, Category::Reference);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].element_id.as_deref(), Some("C1"));
        assert_eq!(issues[0].value.as_deref(), Some("N9"));
        assert!(issues[0].repairable);
    }

    #[test]
    fn test_repeated_missing_node_reported_once() {
        let model = model_with(
            nodes(),
            vec![("girder", two_node("G1", "N7", "N7", "SG1"))],
            vec![("beam", SectionDef::new("SG1"))],
        );
        let issues = run(&model);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_section_resolves_through_family() {
        // Girders resolve against the beam family, not the column family
        let model = model_with(
            nodes(),
            vec![("girder", two_node("G1", "N1", "N2", "SC1"))],
            vec![("column", SectionDef::new("SC1"))],
        );
        let issues = run(&model);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::DanglingSectionRef);
        assert_eq!(issues[0].attribute.as_deref(), Some("id_section"));
    }

    #[test]
    fn test_foundation_column_sections_checked_independently() {
        let fc = ElementDef::new("FC1")
            .with_attr("id_node", "N1")
            .with_attr("id_section_FD", "SF9")
            .with_attr("id_section_WR", "0");
        let fc2 = ElementDef::new("FC2")
            .with_attr("id_node", "N2")
            .with_attr("id_section_FD", "SF1")
            .with_attr("id_section_WR", "SF8");
        let model = model_with(
            nodes(),
            vec![("foundation_column", fc), ("foundation_column", fc2)],
            vec![("foundation", SectionDef::new("SF1"))],
        );
        let issues = run(&model);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].element_id.as_deref(), Some("FC1"));
        assert_eq!(issues[0].attribute.as_deref(), Some("id_section_FD"));
        assert_eq!(issues[1].element_id.as_deref(), Some("FC2"));
        assert_eq!(issues[1].attribute.as_deref(), Some("id_section_WR"));
    }

    #[test]
    fn test_sentinel_only_applies_to_foundation_columns() {
        let model = model_with(
            nodes(),
            vec![("beam", two_node("B1", "N1", "N2", "0"))],
            Vec::new(),
        );
        let issues = run(&model);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].value.as_deref(), Some("0"));
    }
}
