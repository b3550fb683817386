#![allow(dead_code)]

use stb_model::{ElementDef, NodeDef, SectionDef, StbDocument, StbModelData, StoryDef};
use std::collections::BTreeMap;

/// A small, valid two-storey frame: four nodes, two columns, one girder
pub fn frame() -> StbModelData {
    let mut members = BTreeMap::new();
    members.insert(
        "column".to_string(),
        vec![
            column("C1", "N1", "N2", "SC1"),
            column("C2", "N3", "N4", "SC1"),
        ],
    );
    members.insert(
        "girder".to_string(),
        vec![girder("G1", "N2", "N4", "SG1")],
    );

    let mut sections = BTreeMap::new();
    sections.insert(
        "column".to_string(),
        vec![SectionDef::new("SC1")
            .with_dimension("width", 600.0)
            .with_dimension("height", 600.0)],
    );
    sections.insert(
        "beam".to_string(),
        vec![SectionDef::new("SG1")
            .with_dimension("width", 400.0)
            .with_dimension("depth", 800.0)],
    );

    StbModelData {
        nodes: Some(vec![
            NodeDef::new("N1", 0.0, 0.0, 0.0),
            NodeDef::new("N2", 0.0, 0.0, 3000.0),
            NodeDef::new("N3", 6000.0, 0.0, 0.0),
            NodeDef::new("N4", 6000.0, 0.0, 3000.0),
        ]),
        stories: vec![story("S1", "1FL", 0.0), story("S2", "2FL", 3000.0)],
        members: Some(members),
        sections,
        ..StbModelData::default()
    }
}

pub fn document(model: StbModelData) -> StbDocument {
    StbDocument {
        version: Some("2.0.2".to_string()),
        model: Some(model),
    }
}

pub fn column(id: &str, bottom: &str, top: &str, section: &str) -> ElementDef {
    ElementDef::new(id)
        .with_attr("id_node_bottom", bottom)
        .with_attr("id_node_top", top)
        .with_attr("id_section", section)
}

pub fn girder(id: &str, start: &str, end: &str, section: &str) -> ElementDef {
    ElementDef::new(id)
        .with_attr("id_node_start", start)
        .with_attr("id_node_end", end)
        .with_attr("id_section", section)
}

pub fn story(id: &str, name: &str, height: f64) -> StoryDef {
    StoryDef {
        id: id.to_string(),
        name: Some(name.to_string()),
        height: Some(height),
    }
}

pub fn members<'m>(model: &'m StbModelData, key: &str) -> &'m [ElementDef] {
    model
        .members
        .as_ref()
        .and_then(|m| m.get(key))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
