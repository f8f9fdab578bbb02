use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The clinician's finalized plan for a visit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WrapUpPlan {
    /// Condition id from the knowledge pack, if one was selected.
    #[serde(default)]
    pub final_diagnosis_id: Option<String>,
    /// Clinician free text. The only diagnosis wording a patient ever sees.
    #[serde(default)]
    pub final_diagnosis_text: Option<String>,
    #[serde(default)]
    pub labs: Vec<String>,
    #[serde(default)]
    pub referrals: Vec<String>,
    /// Medication categories only, never dosing.
    #[serde(default)]
    pub med_categories: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub guides: Vec<String>,
    #[serde(default)]
    pub followup_timing: Option<String>,
    /// Return precautions; a default is used when empty.
    #[serde(default)]
    pub followup_instructions: Option<String>,
    /// Clinician notes, never sent to the patient.
    #[serde(default)]
    pub additional_notes: Option<String>,
}
