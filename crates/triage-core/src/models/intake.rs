use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// One intake questionnaire record at a point in time.
///
/// Every section defaults to empty so partially completed intakes can be
/// triaged; emptiness is interpreted by the triage engine, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IntakeSnapshot {
    pub session_token: String,
    pub patient_id: String,
    #[serde(default)]
    pub issued_by: String,
    #[serde(default)]
    pub intake_mode: IntakeMode,
    #[serde(default)]
    pub started_at: Option<jiff::Timestamp>,
    #[serde(default)]
    pub submitted_at: Option<jiff::Timestamp>,
    #[serde(default)]
    pub entered_by: Option<String>,
    #[serde(default)]
    pub reported_by: Option<String>,

    // Tier 1
    #[serde(default)]
    pub chief_concern: Option<String>,
    #[serde(default)]
    pub issue_cards: Vec<Entry<IssueCard>>,
    #[serde(default)]
    pub symptoms: Vec<Entry<SymptomEntry>>,
    #[serde(default)]
    pub red_flags: Vec<Entry<RedFlagAnswer>>,
    #[serde(default)]
    pub consent_acknowledged: bool,
    #[serde(default)]
    pub medications: Vec<Entry<MedicationEntry>>,
    #[serde(default)]
    pub allergies: Vec<Entry<AllergyEntry>>,
    #[serde(default)]
    pub vitals: Vitals,

    // Tier 2
    #[serde(default)]
    pub pmh: Vec<String>,
    #[serde(default)]
    pub symptom_durations: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub functional_impacts: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub social_history: SocialHistory,

    // Tier 3
    /// Review of systems: symptom id → reported present.
    #[serde(default)]
    pub ros: BTreeMap<String, bool>,
    #[serde(default)]
    pub family_history: Vec<Entry<FamilyHistoryEntry>>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub additional_notes: Option<String>,

    // Meta
    #[serde(default)]
    pub last_modified: Option<jiff::Timestamp>,
    #[serde(default)]
    pub source: IntakeSource,
    /// Original values of fields replaced by staff or clinicians, keyed by field name.
    #[serde(default)]
    pub overrides: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub audit_trail: Vec<IntakeAuditEntry>,
}

impl IntakeSnapshot {
    /// Parse an intake snapshot, rejecting records without a session token or patient id.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        let snapshot: IntakeSnapshot = serde_json::from_str(raw)?;
        if snapshot.session_token.trim().is_empty() {
            return Err(CoreError::MissingField("session_token".to_string()));
        }
        if snapshot.patient_id.trim().is_empty() {
            return Err(CoreError::MissingField("patient_id".to_string()));
        }
        Ok(snapshot)
    }
}

/// One item of an intake list as it was submitted.
///
/// An item that does not fit the expected shape is kept verbatim instead of
/// failing the whole snapshot; the triage engine reports it as malformed.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum Entry<T> {
    Read(T),
    Unreadable(serde_json::Value),
}

impl<T> Entry<T> {
    pub fn read(&self) -> Option<&T> {
        match self {
            Self::Read(value) => Some(value),
            Self::Unreadable(_) => None,
        }
    }
}

impl<T> From<T> for Entry<T> {
    fn from(value: T) -> Self {
        Self::Read(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum IntakeMode {
    /// In-clinic questionnaire.
    #[default]
    Full,
    /// Shortened telehealth questionnaire.
    Telehealth,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum IntakeSource {
    #[default]
    Patient,
    Staff,
    Clinician,
}

/// A body-map issue reported against one region.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IssueCard {
    #[serde(default)]
    pub issue_id: String,
    #[serde(default)]
    pub region_id: String,
    #[serde(default)]
    pub description: String,
    /// Pain score 0–10. Wider values are accepted here and flagged during
    /// extraction.
    #[serde(default)]
    pub pain_score: Option<u32>,
    /// none / mild / moderate / severe
    #[serde(default)]
    pub functional_impact: Option<String>,
    /// today / days / weeks / months
    #[serde(default)]
    pub onset: Option<String>,
    /// improving / worsening / unchanged
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub triggers: Option<String>,
    #[serde(default)]
    pub relief_factors: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SymptomEntry {
    #[serde(default)]
    pub symptom_id: String,
    #[serde(default)]
    pub present: Option<bool>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A red-flag screening answer. `present: None` means the question was shown
/// but not answered.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RedFlagAnswer {
    #[serde(default)]
    pub red_flag_id: String,
    #[serde(default)]
    pub present: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MedicationEntry {
    #[serde(default)]
    pub med_name: String,
    #[serde(default)]
    pub med_class: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AllergyEntry {
    #[serde(default)]
    pub allergen: String,
    #[serde(default)]
    pub reaction: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FamilyHistoryEntry {
    pub relation: String,
    pub condition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SocialHistory {
    #[serde(default)]
    pub tobacco: Option<String>,
    #[serde(default)]
    pub alcohol: Option<String>,
    #[serde(default)]
    pub drugs: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub stressors: Option<String>,
    #[serde(default)]
    pub exercise: Option<String>,
}

impl SocialHistory {
    /// All answered fields as `(name, value)` pairs.
    pub fn answers(&self) -> Vec<(&'static str, &str)> {
        [
            ("tobacco", &self.tobacco),
            ("alcohol", &self.alcohol),
            ("drugs", &self.drugs),
            ("occupation", &self.occupation),
            ("stressors", &self.stressors),
            ("exercise", &self.exercise),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (name, v))
        })
        .collect()
    }
}

/// Clinic vital signs, or an explicit `unknown` when they could not be taken.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Vitals {
    /// Degrees Celsius.
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub heart_rate: Option<u32>,
    #[serde(default)]
    pub respiratory_rate: Option<u32>,
    #[serde(default)]
    pub blood_pressure_systolic: Option<u32>,
    #[serde(default)]
    pub blood_pressure_diastolic: Option<u32>,
    #[serde(default)]
    pub oxygen_saturation: Option<u32>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Entered BMI; derived from height and weight when absent.
    #[serde(default)]
    pub bmi: Option<f64>,
    #[serde(default)]
    pub unknown: Option<bool>,
}

impl Vitals {
    /// Names of the measured fields that must all be populated for vitals to
    /// count as complete. BMI is derived and never required.
    pub const MEASURED: [&'static str; 8] = [
        "temperature",
        "heart_rate",
        "respiratory_rate",
        "blood_pressure_systolic",
        "blood_pressure_diastolic",
        "oxygen_saturation",
        "height_cm",
        "weight_kg",
    ];

    pub fn marked_unknown(&self) -> bool {
        self.unknown == Some(true)
    }

    /// Complete when every measured field is populated, or vitals were
    /// explicitly marked unknown.
    pub fn is_complete(&self) -> bool {
        self.marked_unknown() || self.missing_fields().is_empty()
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        Self::MEASURED
            .into_iter()
            .filter(|name| self.reading(name).is_none())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        Self::MEASURED.iter().all(|name| self.reading(name).is_none()) && self.bmi.is_none()
    }

    pub fn bmi(&self) -> Option<f64> {
        self.bmi.or_else(|| match (self.height_cm, self.weight_kg) {
            (Some(h), Some(w)) if h > 0.0 => {
                let m = h / 100.0;
                Some(w / (m * m))
            }
            _ => None,
        })
    }

    /// Look up a reading by the names used in vital-sign rules and assistant
    /// action field keys.
    pub fn reading(&self, vital: &str) -> Option<f64> {
        match vital {
            "temperature" | "temperature_c" => self.temperature,
            "heart_rate" => self.heart_rate.map(f64::from),
            "respiratory_rate" => self.respiratory_rate.map(f64::from),
            "blood_pressure_systolic" | "bp_systolic" => {
                self.blood_pressure_systolic.map(f64::from)
            }
            "blood_pressure_diastolic" | "bp_diastolic" => {
                self.blood_pressure_diastolic.map(f64::from)
            }
            "oxygen_saturation" | "spo2" => self.oxygen_saturation.map(f64::from),
            "height_cm" => self.height_cm,
            "weight_kg" => self.weight_kg,
            "bmi" => self.bmi(),
            _ => None,
        }
    }
}

/// One entry in the intake's own change history.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IntakeAuditEntry {
    pub at: jiff::Timestamp,
    pub event_type: String,
    pub action_id: String,
    pub applied_by: String,
    pub inputs: serde_json::Value,
}
