use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::wrapup::WrapUpPlan;

/// Confidence bucket for a scored condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ConfidenceLabel {
    High,
    Medium,
    Low,
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        })
    }
}

/// Overall disposition of a triage pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Acuity {
    Urgent,
    Routine,
    Followup,
    /// No differential yet, typically because the intake is incomplete.
    Deferred,
}

impl fmt::Display for Acuity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Urgent => "urgent",
            Self::Routine => "routine",
            Self::Followup => "followup",
            Self::Deferred => "deferred",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ActorType {
    Patient,
    Staff,
    Clinician,
    Admin,
    System,
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Patient => "patient",
            Self::Staff => "staff",
            Self::Clinician => "clinician",
            Self::Admin => "admin",
            Self::System => "system",
        })
    }
}

/// Who requested a triage pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Actor {
    pub actor_type: ActorType,
    pub actor_id: Option<String>,
}

impl Actor {
    pub fn new(actor_type: ActorType, actor_id: Option<String>) -> Self {
        Self {
            actor_type,
            actor_id,
        }
    }

    pub fn system() -> Self {
        Self::new(ActorType::System, None)
    }
}

/// A scored candidate condition.
///
/// `probability` is an independent match strength against this condition's
/// own support weights; probabilities across conditions do not sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConditionProbability {
    pub condition_id: String,
    pub condition_name: String,
    pub probability: f64,
    pub confidence_label: ConfidenceLabel,
    #[serde(default)]
    pub triggered_red_flag: bool,
    #[serde(default)]
    pub suppressed_due_to_red_flag: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A pending gap-fill task for clinical staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssistantAction {
    pub action_id: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    /// The intake field or rule that raised this action.
    pub triggered_by: String,
    pub ui_component: Option<String>,
}

/// A clinician-facing follow-up prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FollowUpQuestion {
    pub question_id: String,
    pub description: String,
    /// string / choice / boolean / number
    pub field_type: String,
    #[serde(default)]
    pub answer: Option<serde_json::Value>,
    #[serde(default = "default_true")]
    pub required: bool,
    pub triggered_by: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TriageSummary {
    pub acuity: Acuity,
    pub summary: String,
    /// Red-flag ids answered present in the intake.
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub major_anomalies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SuggestionType {
    Labs,
    Referrals,
    Meds,
    Actions,
    Guides,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SuggestionItem {
    pub suggestion_type: SuggestionType,
    pub suggestion_id: String,
    pub description: String,
    pub relevant_condition_id: Option<String>,
}

/// The output of one triage pass. Never mutated after creation: a new pass
/// produces a new result with a new `triage_id`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TriageResult {
    pub intake_session_token: String,
    pub triage_id: Uuid,
    pub previous_triage_id: Option<Uuid>,
    pub timestamp: jiff::Timestamp,
    pub requested_by: Actor,

    /// Displayed differential, clinician-only.
    pub top_5_conditions: Vec<ConditionProbability>,
    /// Conditions pushed out of the display by a red-flag promotion.
    #[serde(default)]
    pub suppressed_conditions: Vec<ConditionProbability>,

    #[serde(default)]
    pub assistant_actions: Vec<AssistantAction>,
    #[serde(default)]
    pub followup_questions: Vec<FollowUpQuestion>,

    pub triage_summary: TriageSummary,
    #[serde(default)]
    pub suggestions: Vec<SuggestionItem>,
    #[serde(default)]
    pub wrapup: Option<WrapUpPlan>,
    /// Patient-facing text. Never contains probabilities, confidence labels
    /// or condition names.
    #[serde(default)]
    pub patient_communication_draft: Option<String>,
    #[serde(default)]
    pub audit_event_id: Option<Uuid>,
}
