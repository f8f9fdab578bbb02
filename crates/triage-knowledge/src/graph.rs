//! Graph knowledge pack: a node/relationship export of the clinical
//! knowledge graph.
//!
//! Nodes carry one label naming their kind and the same properties as the
//! workbook rows. Edges between conditions and everything else are
//! relationships instead of link sheets.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

use triage_core::models::knowledge::{
    ConditionLinkRow, ConditionRedFlagRow, LinkType, SupportRow, SupportSource,
};

use crate::KnowledgeSource;
use crate::error::KnowledgeBaseError;
use crate::tables::{KnowledgeTables, parse_rows, table};

pub mod label {
    pub const CONDITION: &str = "Condition";
    pub const SYMPTOM: &str = "Symptom";
    pub const RED_FLAG: &str = "RedFlag";
    pub const VITAL_RULE: &str = "VitalRule";
    pub const LAB: &str = "Lab";
    pub const SPECIALIST: &str = "Specialist";
    pub const MEDICATION: &str = "Medication";
    pub const ACTION: &str = "Action";
    pub const GUIDE: &str = "Guide";
    pub const TEMPLATE: &str = "Template";
    pub const ASSISTANT_ACTION: &str = "AssistantAction";
    pub const ASSISTANT_ACTION_UI: &str = "AssistantActionUi";
    pub const CHECKLIST_ITEM: &str = "ChecklistItem";
}

pub mod relationship {
    pub const SUPPORTS: &str = "SUPPORTS";
    pub const HAS_RED_FLAG: &str = "HAS_RED_FLAG";
    pub const INDICATES: &str = "INDICATES";
    pub const SUGGESTS_LAB: &str = "SUGGESTS_LAB";
    pub const REFERS_TO: &str = "REFERS_TO";
    pub const SUGGESTS_MEDICATION: &str = "SUGGESTS_MEDICATION";
    pub const REQUIRES_ACTION: &str = "REQUIRES_ACTION";
    pub const HAS_GUIDE: &str = "HAS_GUIDE";
    pub const USES_TEMPLATE: &str = "USES_TEMPLATE";
}

/// Node labels that must appear at least once, mirroring the required sheets.
const REQUIRED_LABELS: [(&str, &str); 11] = [
    (label::CONDITION, table::CONDITIONS),
    (label::SYMPTOM, table::SYMPTOMS),
    (label::RED_FLAG, table::RED_FLAGS),
    (label::LAB, table::LABS),
    (label::SPECIALIST, table::SPECIALISTS),
    (label::MEDICATION, table::MEDICATIONS),
    (label::ACTION, table::ACTIONS),
    (label::GUIDE, table::GUIDES),
    (label::TEMPLATE, table::TEMPLATES),
    (label::ASSISTANT_ACTION_UI, table::ASSISTANT_ACTION_UI_MAP),
    (label::CHECKLIST_ITEM, table::VALIDATION_CHECKLIST),
];

#[derive(Debug, Clone, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub relationships: Vec<GraphRelationship>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphRelationship {
    #[serde(rename = "type")]
    pub rel_type: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// A graph export on disk.
#[derive(Debug, Clone)]
pub struct GraphPack {
    path: PathBuf,
}

impl GraphPack {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl KnowledgeSource for GraphPack {
    fn name(&self) -> &'static str {
        "graph"
    }

    fn load_tables(&self) -> Result<KnowledgeTables, KnowledgeBaseError> {
        let raw = std::fs::read(&self.path).map_err(|source| KnowledgeBaseError::Io {
            path: self.path.clone(),
            source,
        })?;
        let export: GraphExport = serde_json::from_slice(&raw)?;
        let tables = graph_tables(&export)?;
        tracing::info!(
            path = %self.path.display(),
            nodes = export.nodes.len(),
            relationships = export.relationships.len(),
            "loaded graph knowledge pack"
        );
        Ok(tables)
    }
}

/// The property holding a node's business identifier, per label.
fn key_property(label: &str) -> &'static str {
    match label {
        label::CONDITION => "condition_id",
        label::SYMPTOM => "symptom_id",
        label::RED_FLAG => "red_flag_id",
        label::VITAL_RULE => "rule_id",
        label::LAB => "lab_id",
        label::SPECIALIST => "specialist_id",
        label::MEDICATION => "med_id",
        label::ACTION => "action_id",
        label::GUIDE => "guide_id",
        label::TEMPLATE => "template_id",
        label::ASSISTANT_ACTION | label::ASSISTANT_ACTION_UI => "assistant_action_id",
        label::CHECKLIST_ITEM => "field_id",
        _ => "id",
    }
}

struct NodeRef<'a> {
    label: &'a str,
    key: String,
}

/// Flatten a graph export into the same tables a workbook produces.
pub fn graph_tables(export: &GraphExport) -> Result<KnowledgeTables, KnowledgeBaseError> {
    let mut by_label: HashMap<&str, Vec<Value>> = HashMap::new();
    let mut refs: HashMap<&str, NodeRef<'_>> = HashMap::new();

    for node in &export.nodes {
        let Some(node_label) = node.labels.first() else {
            tracing::warn!(node = %node.id, "skipping unlabelled graph node");
            continue;
        };
        let node_label = node_label.as_str();
        let key = node
            .properties
            .get(key_property(node_label))
            .or_else(|| node.properties.get("id"))
            .and_then(Value::as_str)
            .unwrap_or(&node.id)
            .to_string();
        refs.insert(node.id.as_str(), NodeRef { label: node_label, key });
        by_label
            .entry(node_label)
            .or_default()
            .push(Value::Object(node.properties.clone()));
    }

    if let Some((_, missing)) = REQUIRED_LABELS
        .iter()
        .find(|(l, _)| !by_label.contains_key(l))
    {
        return Err(KnowledgeBaseError::MissingTable(missing.to_string()));
    }
    if !export
        .relationships
        .iter()
        .any(|r| r.rel_type == relationship::SUPPORTS)
    {
        return Err(KnowledgeBaseError::MissingRelationship(
            relationship::SUPPORTS.to_string(),
        ));
    }

    let mut rows = |node_label: &str, table_name: &str| {
        let values = by_label.remove(node_label).unwrap_or_default();
        (table_name.to_string(), Value::Array(values))
    };

    let (n, v) = rows(label::CONDITION, table::CONDITIONS);
    let mut tables = KnowledgeTables {
        conditions: parse_rows(&n, v)?,
        ..Default::default()
    };
    let (n, v) = rows(label::SYMPTOM, table::SYMPTOMS);
    tables.symptoms = parse_rows(&n, v)?;
    let (n, v) = rows(label::RED_FLAG, table::RED_FLAGS);
    tables.red_flags = parse_rows(&n, v)?;
    let (n, v) = rows(label::VITAL_RULE, table::VITAL_RULES);
    tables.vital_rules = parse_rows(&n, v)?;
    let (n, v) = rows(label::LAB, table::LABS);
    tables.labs = parse_rows(&n, v)?;
    let (n, v) = rows(label::SPECIALIST, table::SPECIALISTS);
    tables.specialists = parse_rows(&n, v)?;
    let (n, v) = rows(label::MEDICATION, table::MEDICATIONS);
    tables.medications = parse_rows(&n, v)?;
    let (n, v) = rows(label::ACTION, table::ACTIONS);
    tables.actions = parse_rows(&n, v)?;
    let (n, v) = rows(label::GUIDE, table::GUIDES);
    tables.guides = parse_rows(&n, v)?;
    let (n, v) = rows(label::TEMPLATE, table::TEMPLATES);
    tables.templates = parse_rows(&n, v)?;
    let (n, v) = rows(label::ASSISTANT_ACTION, table::ASSISTANT_ACTIONS);
    tables.assistant_actions = parse_rows(&n, v)?;
    let (n, v) = rows(label::ASSISTANT_ACTION_UI, table::ASSISTANT_ACTION_UI_MAP);
    tables.assistant_action_ui_map = parse_rows(&n, v)?;
    let (n, v) = rows(label::CHECKLIST_ITEM, table::VALIDATION_CHECKLIST);
    tables.clinician_validation_checklist = parse_rows(&n, v)?;

    for rel in &export.relationships {
        let (Some(start), Some(end)) = (refs.get(rel.start.as_str()), refs.get(rel.end.as_str()))
        else {
            tracing::warn!(
                rel_type = %rel.rel_type,
                start = %rel.start,
                end = %rel.end,
                "skipping relationship with unknown endpoint"
            );
            continue;
        };
        apply_relationship(&mut tables, rel, start, end)?;
    }

    Ok(tables)
}

fn apply_relationship(
    tables: &mut KnowledgeTables,
    rel: &GraphRelationship,
    start: &NodeRef<'_>,
    end: &NodeRef<'_>,
) -> Result<(), KnowledgeBaseError> {
    match rel.rel_type.as_str() {
        relationship::SUPPORTS => {
            let from_type = match start.label {
                label::VITAL_RULE => SupportSource::VitalRule,
                _ => SupportSource::Symptom,
            };
            let weight = rel
                .properties
                .get("weight")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            tables.supports.push(SupportRow {
                from_type,
                from_id: start.key.clone(),
                condition_id: end.key.clone(),
                weight,
                notes: rel
                    .properties
                    .get("notes")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });
        }
        relationship::HAS_RED_FLAG => tables.condition_red_flags.push(ConditionRedFlagRow {
            condition_id: start.key.clone(),
            red_flag_id: end.key.clone(),
        }),
        relationship::INDICATES => {
            if let Some(flag) = tables
                .red_flags
                .iter_mut()
                .find(|f| f.red_flag_id == end.key)
                && !flag.symptom_ids.contains(&start.key)
            {
                flag.symptom_ids.push(start.key.clone());
            }
        }
        other => {
            let link_type = match other {
                relationship::SUGGESTS_LAB => LinkType::Lab,
                relationship::REFERS_TO => LinkType::Referral,
                relationship::SUGGESTS_MEDICATION => LinkType::Medication,
                relationship::REQUIRES_ACTION => LinkType::Action,
                relationship::HAS_GUIDE => LinkType::Guide,
                relationship::USES_TEMPLATE => LinkType::Template,
                _ => {
                    tracing::debug!(rel_type = %other, "ignoring unrecognised relationship");
                    return Ok(());
                }
            };
            tables.condition_links.push(ConditionLinkRow {
                condition_id: start.key.clone(),
                link_type,
                target_id: end.key.clone(),
            });
        }
    }
    Ok(())
}
