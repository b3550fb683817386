use stb_core::StbError;
use stb_model::{load_document, save_document, ElementDef, NodeDef, StbDocument, StbModelData};
use stb_validate::{Category, RepairOptions};
use stb_workflow::{EventPayload, Workflow, WorkflowState};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

fn column(id: &str, bottom: &str, top: &str) -> ElementDef {
    ElementDef::new(id)
        .with_attr("id_node_bottom", bottom)
        .with_attr("id_node_top", top)
        .with_attr("id_section", "SC1")
}

fn write_model(dir: &Path) -> std::path::PathBuf {
    let mut members = BTreeMap::new();
    members.insert(
        "column".to_string(),
        vec![column("C1", "N1", "N2"), column("C2", "N9", "N2")],
    );
    let mut sections = BTreeMap::new();
    sections.insert(
        "column".to_string(),
        vec![stb_model::SectionDef::new("SC1").with_dimension("width", 500.0)],
    );
    let doc = StbDocument {
        version: Some("2.0.2".to_string()),
        model: Some(StbModelData {
            nodes: Some(vec![
                NodeDef::new("N1", 0.0, 0.0, 0.0),
                NodeDef::new("N2", 0.0, 0.0, 3500.0),
            ]),
            members: Some(members),
            sections,
            ..StbModelData::default()
        }),
    };

    let path = dir.join("model.toml");
    save_document(&path, &doc).unwrap();
    path
}

#[test]
fn full_cycle_removes_dangling_column_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_model(dir.path());
    let output = dir.path().join("model_repaired.toml");

    let mut workflow = Workflow::new();
    let payloads = Rc::new(RefCell::new(Vec::new()));
    let sink = payloads.clone();
    workflow.on_transition(move |e| sink.borrow_mut().push(e.payload.clone()));

    let report = workflow.load_and_validate(&source).unwrap();
    assert!(!report.valid);
    assert_eq!(report.issues_by_category(Category::Reference).len(), 1);

    let repair = workflow.execute_auto_repair(&RepairOptions::default()).unwrap();
    assert_eq!(repair.removed_elements, vec!["C2".to_string()]);

    let revalidated = workflow.revalidate_repaired().unwrap();
    assert!(revalidated.valid);
    assert!(revalidated.issues.is_empty());

    let bytes = workflow.export(&output).unwrap();
    assert!(bytes > 0);
    assert_eq!(workflow.state(), WorkflowState::Exported);

    // The exported file holds the repaired model; the source is untouched
    let exported = load_document(&output).unwrap();
    let columns = &exported.model.unwrap().members.unwrap()["column"];
    assert_eq!(columns.len(), 1);
    let original = load_document(&source).unwrap();
    assert_eq!(Some(&original), workflow.original_document());
    assert_eq!(original.model.unwrap().members.unwrap()["column"].len(), 2);

    let payloads = payloads.borrow();
    assert!(matches!(payloads[0], EventPayload::Loaded { .. }));
    assert!(matches!(
        payloads[2],
        EventPayload::Repaired { applied: 1, .. }
    ));
    assert!(matches!(payloads[4], EventPayload::Exported { .. }));
}

#[test]
fn repair_can_run_again_after_revalidation() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_model(dir.path());

    let mut workflow = Workflow::new();
    workflow.load_and_validate(&source).unwrap();
    workflow.execute_auto_repair(&RepairOptions::default()).unwrap();
    workflow.revalidate_repaired().unwrap();

    let second = workflow.execute_auto_repair(&RepairOptions::default()).unwrap();
    assert_eq!(second.success_count, 0);
    assert_eq!(workflow.state(), WorkflowState::Repaired);
}

#[test]
fn export_before_revalidation_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_model(dir.path());

    let mut workflow = Workflow::new();
    workflow.load_and_validate(&source).unwrap();
    workflow.execute_auto_repair(&RepairOptions::default()).unwrap();

    let err = workflow.export(dir.path().join("early.toml")).unwrap_err();
    assert!(matches!(err, StbError::InvalidTransition { .. }));
    assert_eq!(workflow.state(), WorkflowState::Repaired);
    assert!(!dir.path().join("early.toml").exists());
}

#[test]
fn unparsable_file_enters_error_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[model\nnodes = ").unwrap();

    let mut workflow = Workflow::new();
    let err = workflow.load_and_validate(&path).unwrap_err();
    assert!(matches!(err, StbError::TomlParseError(_)));
    assert_eq!(workflow.state(), WorkflowState::Error);
    assert!(workflow.original_document().is_none());

    workflow.reset();
    assert_eq!(workflow.state(), WorkflowState::Idle);
    assert!(workflow.last_error().is_none());
}

#[test]
fn download_renders_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_model(dir.path());

    let mut workflow = Workflow::new();
    workflow.load_and_validate(&source).unwrap();
    workflow.execute_auto_repair(&RepairOptions::default()).unwrap();
    workflow.revalidate_repaired().unwrap();

    let file = workflow.download_repaired_file("model_repaired.toml").unwrap();
    assert_eq!(file.name, "model_repaired.toml");
    assert!(file.content.contains("C1"));
    assert!(!file.content.contains("C2"));
}
