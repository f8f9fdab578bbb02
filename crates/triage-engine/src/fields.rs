//! Typed access to the intake fields the validation checklist and assistant
//! actions refer to by name.
//!
//! Only fields listed here can be checked for gaps, and only the
//! overridable ones can be written by an assistant action.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value, json};

use triage_core::models::intake::{
    AllergyEntry, Entry, FamilyHistoryEntry, IntakeMode, IntakeSnapshot, MedicationEntry,
    SocialHistory,
};

use crate::error::ApplyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntakeField {
    ChiefConcern,
    IssueCards,
    Symptoms,
    RedFlags,
    ConsentAcknowledged,
    Medications,
    Allergies,
    Vitals,
    Temperature,
    HeartRate,
    RespiratoryRate,
    BloodPressure,
    OxygenSaturation,
    HeightCm,
    WeightKg,
    Pmh,
    SymptomDurations,
    FunctionalImpacts,
    SocialHistory,
    FamilyHistory,
    Occupation,
    AdditionalNotes,
}

impl IntakeField {
    /// Resolve a checklist `field_id`.
    pub fn from_field_id(field_id: &str) -> Option<Self> {
        Some(match field_id.trim() {
            "chief_concern" => Self::ChiefConcern,
            "issue_cards" => Self::IssueCards,
            "symptoms" => Self::Symptoms,
            "red_flags" => Self::RedFlags,
            "consent_acknowledged" | "consent" => Self::ConsentAcknowledged,
            "medications" => Self::Medications,
            "allergies" => Self::Allergies,
            "vitals" => Self::Vitals,
            "temperature" | "temperature_c" => Self::Temperature,
            "heart_rate" => Self::HeartRate,
            "respiratory_rate" => Self::RespiratoryRate,
            "blood_pressure" | "bp" => Self::BloodPressure,
            "oxygen_saturation" | "spo2" => Self::OxygenSaturation,
            "height_cm" => Self::HeightCm,
            "weight_kg" => Self::WeightKg,
            "pmh" => Self::Pmh,
            "symptom_durations" | "symptom_duration" => Self::SymptomDurations,
            "functional_impacts" | "functional_impact" => Self::FunctionalImpacts,
            "social_history" => Self::SocialHistory,
            "family_history" => Self::FamilyHistory,
            "occupation" => Self::Occupation,
            "additional_notes" => Self::AdditionalNotes,
            _ => return None,
        })
    }

    /// Knowledge-pack assistant actions with a fixed target field.
    pub fn for_named_action(action_id: &str) -> Option<Self> {
        Some(match action_id {
            "collect_bp" => Self::BloodPressure,
            "collect_spo2" => Self::OxygenSaturation,
            "collect_temperature" => Self::Temperature,
            "collect_heart_rate" => Self::HeartRate,
            "collect_respiratory_rate" => Self::RespiratoryRate,
            "collect_height_weight" => Self::WeightKg,
            "clarify_symptom_duration" => Self::SymptomDurations,
            "clarify_functional_impact" => Self::FunctionalImpacts,
            "collect_pmh" => Self::Pmh,
            "collect_social_history" => Self::SocialHistory,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ChiefConcern => "chief_concern",
            Self::IssueCards => "issue_cards",
            Self::Symptoms => "symptoms",
            Self::RedFlags => "red_flags",
            Self::ConsentAcknowledged => "consent_acknowledged",
            Self::Medications => "medications",
            Self::Allergies => "allergies",
            Self::Vitals => "vitals",
            Self::Temperature => "temperature",
            Self::HeartRate => "heart_rate",
            Self::RespiratoryRate => "respiratory_rate",
            Self::BloodPressure => "blood_pressure",
            Self::OxygenSaturation => "oxygen_saturation",
            Self::HeightCm => "height_cm",
            Self::WeightKg => "weight_kg",
            Self::Pmh => "pmh",
            Self::SymptomDurations => "symptom_durations",
            Self::FunctionalImpacts => "functional_impacts",
            Self::SocialHistory => "social_history",
            Self::FamilyHistory => "family_history",
            Self::Occupation => "occupation",
            Self::AdditionalNotes => "additional_notes",
        }
    }

    /// Patient-attested sections stay as the patient entered them.
    pub fn is_overridable(self) -> bool {
        !matches!(
            self,
            Self::ConsentAcknowledged | Self::Symptoms | Self::RedFlags | Self::IssueCards
        )
    }

    /// Input keys read when no UI map row names them.
    pub fn default_input_keys(self) -> Vec<&'static str> {
        match self {
            Self::Temperature => vec!["temperature_c"],
            Self::BloodPressure => vec!["bp_systolic", "bp_diastolic"],
            Self::OxygenSaturation => vec!["spo2"],
            Self::SymptomDurations => vec!["symptom_duration"],
            Self::FunctionalImpacts => vec!["functional_impact"],
            other => vec![other.name()],
        }
    }

    /// Lists are missing when empty, scalars when absent or blank, consent
    /// when not acknowledged. Vitals use the same completeness rule as
    /// feature extraction.
    pub fn is_missing(self, intake: &IntakeSnapshot) -> bool {
        let vitals = &intake.vitals;
        match self {
            Self::ChiefConcern => blank(&intake.chief_concern),
            Self::IssueCards => nothing_read(&intake.issue_cards),
            Self::Symptoms => nothing_read(&intake.symptoms),
            Self::RedFlags => nothing_read(&intake.red_flags),
            Self::ConsentAcknowledged => !intake.consent_acknowledged,
            Self::Medications => nothing_read(&intake.medications),
            Self::Allergies => nothing_read(&intake.allergies),
            Self::Vitals => !vitals.is_complete(),
            Self::Temperature => unmeasured(vitals.marked_unknown(), vitals.temperature.is_none()),
            Self::HeartRate => unmeasured(vitals.marked_unknown(), vitals.heart_rate.is_none()),
            Self::RespiratoryRate => {
                unmeasured(vitals.marked_unknown(), vitals.respiratory_rate.is_none())
            }
            Self::BloodPressure => unmeasured(
                vitals.marked_unknown(),
                vitals.blood_pressure_systolic.is_none() || vitals.blood_pressure_diastolic.is_none(),
            ),
            Self::OxygenSaturation => {
                unmeasured(vitals.marked_unknown(), vitals.oxygen_saturation.is_none())
            }
            Self::HeightCm => unmeasured(vitals.marked_unknown(), vitals.height_cm.is_none()),
            Self::WeightKg => unmeasured(vitals.marked_unknown(), vitals.weight_kg.is_none()),
            Self::Pmh => intake.pmh.iter().all(|item| item.trim().is_empty()),
            Self::SymptomDurations => all_blank(&intake.symptom_durations),
            Self::FunctionalImpacts => all_blank(&intake.functional_impacts),
            Self::SocialHistory => intake.social_history.answers().is_empty(),
            Self::FamilyHistory => nothing_read(&intake.family_history),
            Self::Occupation => {
                blank(&intake.occupation) && blank(&intake.social_history.occupation)
            }
            Self::AdditionalNotes => blank(&intake.additional_notes),
        }
    }

    /// Current value as JSON, for the override record.
    pub fn current_value(self, intake: &IntakeSnapshot) -> Value {
        let v = &intake.vitals;
        match self {
            Self::ChiefConcern => json!(intake.chief_concern),
            Self::IssueCards => json!(intake.issue_cards),
            Self::Symptoms => json!(intake.symptoms),
            Self::RedFlags => json!(intake.red_flags),
            Self::ConsentAcknowledged => json!(intake.consent_acknowledged),
            Self::Medications => json!(intake.medications),
            Self::Allergies => json!(intake.allergies),
            Self::Vitals => json!(intake.vitals),
            Self::Temperature => json!(v.temperature),
            Self::HeartRate => json!(v.heart_rate),
            Self::RespiratoryRate => json!(v.respiratory_rate),
            Self::BloodPressure => json!({
                "bp_systolic": v.blood_pressure_systolic,
                "bp_diastolic": v.blood_pressure_diastolic,
            }),
            Self::OxygenSaturation => json!(v.oxygen_saturation),
            Self::HeightCm => json!(v.height_cm),
            Self::WeightKg => json!(v.weight_kg),
            Self::Pmh => json!(intake.pmh),
            Self::SymptomDurations => json!(intake.symptom_durations),
            Self::FunctionalImpacts => json!(intake.functional_impacts),
            Self::SocialHistory => json!(intake.social_history),
            Self::FamilyHistory => json!(intake.family_history),
            Self::Occupation => json!(intake.occupation),
            Self::AdditionalNotes => json!(intake.additional_notes),
        }
    }

    /// Write inputs into the intake. `keys` are the input names, in the order
    /// the UI map lists them.
    pub(crate) fn write(
        self,
        intake: &mut IntakeSnapshot,
        keys: &[&str],
        inputs: &Map<String, Value>,
    ) -> Result<(), ApplyError> {
        let first = keys.first().copied().unwrap_or(self.name());
        let vitals = &mut intake.vitals;
        match self {
            Self::Temperature => vitals.temperature = Some(number(inputs, first)?),
            Self::HeartRate => vitals.heart_rate = Some(whole(inputs, first)?),
            Self::RespiratoryRate => vitals.respiratory_rate = Some(whole(inputs, first)?),
            Self::OxygenSaturation => vitals.oxygen_saturation = Some(whole(inputs, first)?),
            Self::HeightCm => vitals.height_cm = Some(number(inputs, first)?),
            Self::WeightKg => {
                vitals.weight_kg = Some(number(inputs, first)?);
                if let Some(height) = keys.get(1) {
                    vitals.height_cm = Some(number(inputs, height)?);
                }
            }
            Self::BloodPressure => {
                let systolic = keys.first().copied().unwrap_or("bp_systolic");
                let diastolic = keys.get(1).copied().unwrap_or("bp_diastolic");
                vitals.blood_pressure_systolic = Some(whole(inputs, systolic)?);
                vitals.blood_pressure_diastolic = Some(whole(inputs, diastolic)?);
            }
            Self::Vitals => {
                let mut updated = vitals.clone();
                for (key, value) in inputs {
                    if value.is_null() {
                        continue;
                    }
                    match key.as_str() {
                        "unknown" => updated.unknown = value.as_bool(),
                        "temperature" | "temperature_c" => {
                            updated.temperature = Some(number(inputs, key)?)
                        }
                        "heart_rate" => updated.heart_rate = Some(whole(inputs, key)?),
                        "respiratory_rate" => updated.respiratory_rate = Some(whole(inputs, key)?),
                        "blood_pressure_systolic" | "bp_systolic" => {
                            updated.blood_pressure_systolic = Some(whole(inputs, key)?)
                        }
                        "blood_pressure_diastolic" | "bp_diastolic" => {
                            updated.blood_pressure_diastolic = Some(whole(inputs, key)?)
                        }
                        "oxygen_saturation" | "spo2" => {
                            updated.oxygen_saturation = Some(whole(inputs, key)?)
                        }
                        "height_cm" => updated.height_cm = Some(number(inputs, key)?),
                        "weight_kg" => updated.weight_kg = Some(number(inputs, key)?),
                        "bmi" => updated.bmi = Some(number(inputs, key)?),
                        _ => {}
                    }
                }
                *vitals = updated;
            }
            Self::ChiefConcern => intake.chief_concern = Some(text(inputs, first)?),
            Self::Occupation => intake.occupation = Some(text(inputs, first)?),
            Self::AdditionalNotes => intake.additional_notes = Some(text(inputs, first)?),
            Self::Pmh => intake.pmh = text_list(inputs, first)?,
            Self::Medications => {
                intake.medications = text_list(inputs, first)?
                    .into_iter()
                    .map(|med_name| {
                        Entry::from(MedicationEntry {
                            med_name,
                            ..Default::default()
                        })
                    })
                    .collect()
            }
            Self::Allergies => {
                intake.allergies = text_list(inputs, first)?
                    .into_iter()
                    .map(|allergen| {
                        Entry::from(AllergyEntry {
                            allergen,
                            ..Default::default()
                        })
                    })
                    .collect()
            }
            Self::SymptomDurations => {
                let present = present_symptoms(intake);
                fill_per_symptom(&mut intake.symptom_durations, &present, inputs, first)?
            }
            Self::FunctionalImpacts => {
                let present = present_symptoms(intake);
                fill_per_symptom(&mut intake.functional_impacts, &present, inputs, first)?
            }
            Self::SocialHistory => {
                let value = input(inputs, first)?;
                intake.social_history = serde_json::from_value::<SocialHistory>(value.clone())
                    .map_err(|e| invalid(first, e.to_string()))?;
            }
            Self::FamilyHistory => {
                let value = input(inputs, first)?;
                let entries: Vec<FamilyHistoryEntry> = serde_json::from_value(value.clone())
                    .map_err(|e| invalid(first, e.to_string()))?;
                intake.family_history = entries.into_iter().map(Entry::from).collect();
            }
            Self::ConsentAcknowledged | Self::Symptoms | Self::RedFlags | Self::IssueCards => {
                return Err(ApplyError::NotOverridable {
                    action_id: String::new(),
                    field: self.name().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for IntakeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tier-1 fields still missing before an intake can be accepted.
///
/// Symptoms need at least one entry answered present. Vitals count as given
/// when any reading exists or they were marked unknown; telehealth intakes
/// skip vitals.
pub fn missing_tier1_fields(intake: &IntakeSnapshot) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if blank(&intake.chief_concern) {
        missing.push(IntakeField::ChiefConcern.name());
    }
    if nothing_read(&intake.issue_cards) {
        missing.push(IntakeField::IssueCards.name());
    }
    if !intake
        .symptoms
        .iter()
        .filter_map(Entry::read)
        .any(|s| s.present == Some(true))
    {
        missing.push(IntakeField::Symptoms.name());
    }
    if !intake.consent_acknowledged {
        missing.push(IntakeField::ConsentAcknowledged.name());
    }
    if intake.intake_mode == IntakeMode::Full
        && intake.vitals.is_empty()
        && !intake.vitals.marked_unknown()
    {
        missing.push(IntakeField::Vitals.name());
    }
    missing
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// True when a list has no readable items.
fn nothing_read<T>(entries: &[Entry<T>]) -> bool {
    entries.iter().all(|entry| entry.read().is_none())
}

fn all_blank(map: &BTreeMap<String, Option<String>>) -> bool {
    map.values().all(blank)
}

fn unmeasured(marked_unknown: bool, absent: bool) -> bool {
    !marked_unknown && absent
}

fn present_symptoms(intake: &IntakeSnapshot) -> Vec<String> {
    intake
        .symptoms
        .iter()
        .filter_map(Entry::read)
        .filter(|s| s.present == Some(true) && !s.symptom_id.trim().is_empty())
        .map(|s| s.symptom_id.trim().to_string())
        .collect()
}

/// An object input is merged per symptom; a plain string fills every
/// present symptom still lacking a value.
fn fill_per_symptom(
    map: &mut BTreeMap<String, Option<String>>,
    present: &[String],
    inputs: &Map<String, Value>,
    key: &str,
) -> Result<(), ApplyError> {
    match input(inputs, key)? {
        Value::Object(entries) => {
            for (symptom_id, value) in entries {
                let value = value
                    .as_str()
                    .ok_or_else(|| invalid(key, format!("value for '{symptom_id}' is not text")))?;
                map.insert(symptom_id.clone(), Some(value.trim().to_string()));
            }
        }
        Value::String(value) if !value.trim().is_empty() => {
            let targets: Vec<String> = if present.is_empty() {
                vec!["overall".to_string()]
            } else {
                present.to_vec()
            };
            for symptom_id in targets {
                let slot = map.entry(symptom_id).or_insert(None);
                if blank(slot) {
                    *slot = Some(value.trim().to_string());
                }
            }
        }
        _ => return Err(invalid(key, "expected text or an object keyed by symptom")),
    }
    Ok(())
}

fn input<'a>(inputs: &'a Map<String, Value>, key: &str) -> Result<&'a Value, ApplyError> {
    inputs
        .get(key)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ApplyError::MissingInput(key.to_string()))
}

fn invalid(key: &str, reason: impl Into<String>) -> ApplyError {
    ApplyError::InvalidInput {
        key: key.to_string(),
        reason: reason.into(),
    }
}

pub(crate) fn number(inputs: &Map<String, Value>, key: &str) -> Result<f64, ApplyError> {
    match input(inputs, key)? {
        Value::Number(n) => n.as_f64().ok_or_else(|| invalid(key, "not a finite number")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(key, format!("'{s}' is not a number"))),
        _ => Err(invalid(key, "expected a number")),
    }
}

fn whole(inputs: &Map<String, Value>, key: &str) -> Result<u32, ApplyError> {
    let value = number(inputs, key)?;
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(invalid(key, format!("{value} is not a whole non-negative number")));
    }
    Ok(value as u32)
}

fn text(inputs: &Map<String, Value>, key: &str) -> Result<String, ApplyError> {
    match input(inputs, key)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(invalid(key, "expected non-empty text")),
    }
}

/// A list of strings, or one comma-separated string.
fn text_list(inputs: &Map<String, Value>, key: &str) -> Result<Vec<String>, ApplyError> {
    let items: Vec<String> = match input(inputs, key)? {
        Value::String(s) => s.split(',').map(|i| i.trim().to_string()).collect(),
        Value::Array(values) => values
            .iter()
            .map(|v| {
                v.as_str()
                    .map(|s| s.trim().to_string())
                    .ok_or_else(|| invalid(key, "list items must be text"))
            })
            .collect::<Result<_, _>>()?,
        _ => return Err(invalid(key, "expected text or a list of text")),
    };
    let items: Vec<String> = items.into_iter().filter(|i| !i.is_empty()).collect();
    if items.is_empty() {
        return Err(invalid(key, "no entries given"));
    }
    Ok(items)
}
