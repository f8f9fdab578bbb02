use serde::de::DeserializeOwned;

use triage_core::models::knowledge::{
    AssistantActionRow, AssistantActionUiRow, CatalogRow, ChecklistRow, ConditionLinkRow,
    ConditionRedFlagRow, ConditionRow, RedFlagRow, SupportRow, SymptomRow, TemplateRow,
    VitalRuleRow,
};

use crate::error::KnowledgeBaseError;

/// Table names, shared by the workbook sheets and the index builder.
pub mod table {
    pub const CONDITIONS: &str = "conditions";
    pub const SYMPTOMS: &str = "symptoms";
    pub const SUPPORTS: &str = "supports";
    pub const RED_FLAGS: &str = "red_flags";
    pub const CONDITION_RED_FLAGS: &str = "condition_red_flags";
    pub const CONDITION_LINKS: &str = "condition_links";
    pub const VITAL_RULES: &str = "vital_rules";
    pub const LABS: &str = "labs";
    pub const SPECIALISTS: &str = "specialists";
    pub const MEDICATIONS: &str = "medications";
    pub const ACTIONS: &str = "actions";
    pub const GUIDES: &str = "guides";
    pub const TEMPLATES: &str = "templates";
    pub const ASSISTANT_ACTIONS: &str = "assistant_actions";
    pub const ASSISTANT_ACTION_UI_MAP: &str = "assistant_action_ui_map";
    pub const VALIDATION_CHECKLIST: &str = "clinician_validation_checklist";
}

/// Tables that must be present for triage to run at all. A present table
/// may still be empty.
pub const REQUIRED_TABLES: [&str; 12] = [
    table::CONDITIONS,
    table::SYMPTOMS,
    table::SUPPORTS,
    table::RED_FLAGS,
    table::LABS,
    table::SPECIALISTS,
    table::MEDICATIONS,
    table::ACTIONS,
    table::GUIDES,
    table::TEMPLATES,
    table::ASSISTANT_ACTION_UI_MAP,
    table::VALIDATION_CHECKLIST,
];

/// The raw knowledge pack, as read from a backend before indexing.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeTables {
    pub conditions: Vec<ConditionRow>,
    pub symptoms: Vec<SymptomRow>,
    pub supports: Vec<SupportRow>,
    pub red_flags: Vec<RedFlagRow>,
    pub condition_red_flags: Vec<ConditionRedFlagRow>,
    pub condition_links: Vec<ConditionLinkRow>,
    pub vital_rules: Vec<VitalRuleRow>,
    pub labs: Vec<CatalogRow>,
    pub specialists: Vec<CatalogRow>,
    pub medications: Vec<CatalogRow>,
    pub actions: Vec<CatalogRow>,
    pub guides: Vec<CatalogRow>,
    pub templates: Vec<TemplateRow>,
    pub assistant_actions: Vec<AssistantActionRow>,
    pub assistant_action_ui_map: Vec<AssistantActionUiRow>,
    pub clinician_validation_checklist: Vec<ChecklistRow>,
}

/// Deserialize one table's rows, naming the table in the error.
pub(crate) fn parse_rows<T: DeserializeOwned>(
    table: &str,
    rows: serde_json::Value,
) -> Result<Vec<T>, KnowledgeBaseError> {
    serde_json::from_value(rows).map_err(|source| KnowledgeBaseError::MalformedTable {
        table: table.to_string(),
        source,
    })
}
