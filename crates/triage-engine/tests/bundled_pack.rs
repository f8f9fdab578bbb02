mod common;

use std::path::PathBuf;

use triage_core::models::triage::{Acuity, ConfidenceLabel, SuggestionType};
use triage_knowledge::tabular::workbook_tables;
use triage_knowledge::{KnowledgeBaseView, KnowledgeIndex};

fn bundled() -> KnowledgeIndex {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/knowledge_pack.json");
    let raw = std::fs::read_to_string(path).unwrap();
    KnowledgeIndex::build(workbook_tables(serde_json::from_str(&raw).unwrap()).unwrap()).unwrap()
}

#[test]
fn bundled_pack_loads() {
    let kb = bundled();
    assert!(kb.condition("migraine_possible").is_some());
    assert!(kb.assistant_action_ui("collect_spo2").is_some());
    assert_eq!(
        kb.catalog_entry(
            triage_core::models::knowledge::LinkType::Guide,
            "guide_migraine_selfcare"
        )
        .map(|g| g.name.as_str()),
        Some("Migraine self-care guide")
    );
}

#[test]
fn headache_with_photophobia_ranks_migraine_first() {
    let kb = bundled();
    let mut intake = common::intake(&["headache", "photophobia"]);
    intake.chief_concern = Some("headache".to_string());

    let result = triage_engine::run(&kb, &intake, None, &common::staff()).unwrap();
    let top = &result.top_5_conditions[0];
    assert_eq!(top.condition_id, "migraine_possible");
    assert_eq!(top.confidence_label, ConfidenceLabel::High);
    assert_eq!(result.top_5_conditions[1].condition_id, "tension_headache");
    assert_eq!(result.triage_summary.acuity, Acuity::Routine);

    let guides: Vec<_> = result
        .suggestions
        .iter()
        .filter(|s| s.suggestion_type == SuggestionType::Guides)
        .map(|s| s.suggestion_id.as_str())
        .collect();
    assert!(guides.contains(&"guide_migraine_selfcare"));
}
