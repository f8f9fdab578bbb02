mod common;

use triage_core::models::knowledge::{LinkType, SupportSource};
use triage_knowledge::graph::{GraphExport, graph_tables};
use triage_knowledge::tabular::workbook_tables;
use triage_knowledge::{KnowledgeBaseError, KnowledgeBaseView, KnowledgeIndex};

fn export() -> GraphExport {
    serde_json::from_value(common::graph_export()).unwrap()
}

#[test]
fn graph_export_matches_workbook_scoring_tables() {
    let graph = KnowledgeIndex::build(graph_tables(&export()).unwrap()).unwrap();
    let tabular = KnowledgeIndex::build(workbook_tables(common::workbook()).unwrap()).unwrap();

    for condition in tabular.conditions() {
        let id = &condition.condition_id;
        assert_eq!(graph.supports(id), tabular.supports(id), "supports for {id}");
        assert_eq!(
            graph.condition_red_flags(id),
            tabular.condition_red_flags(id),
            "red flags for {id}"
        );
        assert_eq!(graph.linked(id, LinkType::Lab), tabular.linked(id, LinkType::Lab));
    }
    assert_eq!(
        graph.red_flags_for_symptom("dyspnea"),
        tabular.red_flags_for_symptom("dyspnea")
    );
}

#[test]
fn vital_rule_nodes_become_vital_rule_supports() {
    let tables = graph_tables(&export()).unwrap();
    let vital = tables
        .supports
        .iter()
        .find(|s| s.from_id == "spo2_low")
        .unwrap();
    assert_eq!(vital.from_type, SupportSource::VitalRule);
    assert_eq!(tables.vital_rules.len(), 1);
}

#[test]
fn unknown_relationships_and_endpoints_are_ignored() {
    let tables = graph_tables(&export()).unwrap();
    assert_eq!(tables.condition_links.len(), 2);
}

#[test]
fn missing_supports_relationship_is_fatal() {
    let mut raw = common::graph_export();
    raw["relationships"]
        .as_array_mut()
        .unwrap()
        .retain(|r| r["type"] != "SUPPORTS");
    let export: GraphExport = serde_json::from_value(raw).unwrap();
    match graph_tables(&export) {
        Err(KnowledgeBaseError::MissingRelationship(name)) => assert_eq!(name, "SUPPORTS"),
        other => panic!("expected MissingRelationship, got {other:?}"),
    }
}

#[test]
fn missing_required_label_is_fatal() {
    let mut raw = common::graph_export();
    raw["nodes"]
        .as_array_mut()
        .unwrap()
        .retain(|n| n["labels"][0] != "Template");
    let export: GraphExport = serde_json::from_value(raw).unwrap();
    match graph_tables(&export) {
        Err(KnowledgeBaseError::MissingTable(name)) => assert_eq!(name, "templates"),
        other => panic!("expected MissingTable, got {other:?}"),
    }
}

#[test]
fn catalog_labels_are_required() {
    let mut raw = common::graph_export();
    raw["nodes"]
        .as_array_mut()
        .unwrap()
        .retain(|n| n["labels"][0] != "Specialist");
    let export: GraphExport = serde_json::from_value(raw).unwrap();
    match graph_tables(&export) {
        Err(KnowledgeBaseError::MissingTable(name)) => assert_eq!(name, "specialists"),
        other => panic!("expected MissingTable, got {other:?}"),
    }
}
