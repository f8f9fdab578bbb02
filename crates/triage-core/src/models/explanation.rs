use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::triage::ConfidenceLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AnomalyKind {
    /// Vitals neither fully populated nor marked unknown.
    VitalsIncomplete,
    /// An intake sub-record that could not be read and was skipped.
    MalformedEntry,
    /// Two answers that cannot both be true.
    Contradiction,
    /// Several answers declined with "prefer not to say".
    PreferNotToSay,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::VitalsIncomplete => "vitals_incomplete",
            Self::MalformedEntry => "malformed_entry",
            Self::Contradiction => "contradiction",
            Self::PreferNotToSay => "prefer_not_to_say",
        })
    }
}

/// Something odd about an intake, found while extracting evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub detail: String,
    /// Where in the intake it was found, e.g. `symptoms[3]`.
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeightedFinding {
    pub source_id: String,
    pub weight: f64,
}

/// A knowledge-pack row an explanation was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KnowledgeReference {
    pub table: String,
    /// The row's key within the table: a condition id, support source id or
    /// red-flag id.
    pub key: String,
}

/// Clinician-facing justification for one scored condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConditionExplanation {
    pub condition_id: String,
    pub condition_name: String,
    pub probability: f64,
    pub confidence_label: ConfidenceLabel,
    pub matched_supports: Vec<WeightedFinding>,
    pub unmatched_supports: Vec<WeightedFinding>,
    pub matched_weight: f64,
    pub total_weight: f64,
    /// Past medical history items that are also supports (informational, unscored).
    pub matched_history: Vec<String>,
    /// Issue-card descriptions that mention the condition by name.
    pub matched_issues: Vec<String>,
    pub matched_red_flags: Vec<String>,
    pub notes: Vec<String>,
    pub references: Vec<KnowledgeReference>,
}
