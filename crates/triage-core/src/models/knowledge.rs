//! Row shapes of the clinical knowledge pack.
//!
//! The same rows come out of the tabular workbook and the graph export; the
//! knowledge crate indexes them for the triage engine.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRow {
    pub condition_id: String,
    pub name: String,
    /// common / serious_bucket
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomRow {
    pub symptom_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// What kind of evidence a support edge starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportSource {
    #[default]
    #[serde(alias = "Symptom")]
    Symptom,
    #[serde(alias = "VitalRule")]
    VitalRule,
}

/// A weighted symptom (or vital rule) → condition association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportRow {
    #[serde(default)]
    pub from_type: SupportSource,
    #[serde(alias = "symptom_id")]
    pub from_id: String,
    pub condition_id: String,
    pub weight: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedFlagRow {
    #[serde(alias = "redflag_id")]
    pub red_flag_id: String,
    pub name: String,
    /// ER_now / same_day_urgent_eval
    #[serde(default)]
    pub urgency: Option<String>,
    /// Symptoms whose presence should prompt this red-flag question.
    #[serde(default)]
    pub symptom_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRedFlagRow {
    pub condition_id: String,
    #[serde(alias = "redflag_id")]
    pub red_flag_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleOperator {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = ">")]
    Gt,
}

impl RuleOperator {
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Lt => value < threshold,
            Self::Le => value <= threshold,
            Self::Ge => value >= threshold,
            Self::Gt => value > threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalRuleRow {
    pub rule_id: String,
    pub name: String,
    pub vital: String,
    pub operator: RuleOperator,
    pub threshold: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

/// A lab, specialist, medication category, clinic action or patient guide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    #[serde(alias = "lab_id")]
    #[serde(alias = "specialist_id")]
    #[serde(alias = "med_id")]
    #[serde(alias = "action_id")]
    #[serde(alias = "guide_id")]
    pub id: String,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    #[serde(alias = "description")]
    pub notes: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRow {
    pub template_id: String,
    pub name: String,
    #[serde(default)]
    pub subject_template: String,
    #[serde(default)]
    pub body_template: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    Lab,
    Referral,
    Medication,
    Action,
    Guide,
    Template,
}

/// A condition → lab/referral/medication/action/guide/template association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionLinkRow {
    pub condition_id: String,
    pub link_type: LinkType,
    pub target_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantActionRow {
    pub assistant_action_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// How the staff UI collects the input for an assistant action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantActionUiRow {
    pub assistant_action_id: String,
    /// number / two_number / dropdown / textarea / yes_no
    pub ui_control: String,
    /// Comma-separated input keys, e.g. `bp_systolic,bp_diastolic`.
    #[serde(default)]
    pub field_keys: String,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub unit_label: Option<String>,
    #[serde(default)]
    pub dropdown_options: Option<String>,
    #[serde(default)]
    pub placeholder_text: Option<String>,
}

impl AssistantActionUiRow {
    pub fn keys(&self) -> Vec<&str> {
        self.field_keys
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect()
    }
}

/// One row of the clinician validation checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistRow {
    pub field_id: String,
    pub tier_level: u8,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assistant_action_id: Option<String>,
    /// Also raise a clinician-facing follow-up question.
    #[serde(default)]
    pub clinician_prompt: bool,
    #[serde(default)]
    pub question_text: Option<String>,
    #[serde(default = "default_field_type")]
    pub field_type: String,
}

fn default_required() -> bool {
    true
}

fn default_field_type() -> String {
    "string".to_string()
}
