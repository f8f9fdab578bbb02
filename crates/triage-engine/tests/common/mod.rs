#![allow(dead_code)]

use serde_json::{Value, json};

use triage_core::models::intake::{Entry, IntakeSnapshot, RedFlagAnswer, SymptomEntry, Vitals};
use triage_core::models::triage::{Actor, ActorType};
use triage_knowledge::KnowledgeIndex;
use triage_knowledge::tabular::workbook_tables;

pub fn workbook() -> Value {
    json!({
        "conditions": [
            { "condition_id": "influenza", "name": "Influenza" },
            { "condition_id": "sinusitis", "name": "Acute sinusitis" },
            { "condition_id": "viral_uri", "name": "Viral upper respiratory infection" },
            { "condition_id": "bronchitis", "name": "Acute bronchitis" },
            { "condition_id": "covid", "name": "COVID-19" },
            { "condition_id": "pneumonia", "name": "Pneumonia", "severity": "serious_bucket" },
            { "condition_id": "meningitis", "name": "Meningitis", "severity": "serious_bucket" },
            { "condition_id": "contact_dermatitis", "name": "Contact dermatitis" },
            { "condition_id": "general_malaise", "name": "General malaise" }
        ],
        "symptoms": [
            { "symptom_id": "fever", "name": "Fever" },
            { "symptom_id": "cough", "name": "Cough" },
            { "symptom_id": "fatigue", "name": "Fatigue" },
            { "symptom_id": "rash", "name": "Rash" },
            { "symptom_id": "headache", "name": "Headache" },
            { "symptom_id": "neck_stiffness", "name": "Neck stiffness" },
            { "symptom_id": "dyspnea", "name": "Shortness of breath" }
        ],
        "supports": [
            { "symptom_id": "fever", "condition_id": "viral_uri", "weight": 2 },
            { "symptom_id": "cough", "condition_id": "viral_uri", "weight": 1 },
            { "symptom_id": "fatigue", "condition_id": "viral_uri", "weight": 1 },
            { "symptom_id": "fever", "condition_id": "influenza", "weight": 1 },
            { "symptom_id": "cough", "condition_id": "influenza", "weight": 1 },
            { "symptom_id": "headache", "condition_id": "sinusitis", "weight": 1 },
            { "symptom_id": "cough", "condition_id": "sinusitis", "weight": 1 },
            { "symptom_id": "fever", "condition_id": "sinusitis", "weight": 2 },
            { "symptom_id": "cough", "condition_id": "bronchitis", "weight": 2 },
            { "symptom_id": "dyspnea", "condition_id": "bronchitis", "weight": 2 },
            { "symptom_id": "fever", "condition_id": "covid", "weight": 1 },
            { "symptom_id": "cough", "condition_id": "covid", "weight": 1 },
            { "symptom_id": "fatigue", "condition_id": "covid", "weight": 1 },
            { "symptom_id": "dyspnea", "condition_id": "covid", "weight": 1 },
            { "symptom_id": "fever", "condition_id": "pneumonia", "weight": 2 },
            { "from_type": "VitalRule", "from_id": "spo2_low", "condition_id": "pneumonia", "weight": 3 },
            { "symptom_id": "fever", "condition_id": "meningitis", "weight": 1 },
            { "symptom_id": "neck_stiffness", "condition_id": "meningitis", "weight": 9 },
            { "symptom_id": "rash", "condition_id": "contact_dermatitis", "weight": 3 }
        ],
        "red_flags": [
            { "red_flag_id": "rf_neck_stiff", "name": "Stiff neck with fever",
              "urgency": "ER_now", "symptom_ids": ["neck_stiffness", "headache"] },
            { "red_flag_id": "rf_breathing", "name": "Severe difficulty breathing",
              "urgency": "ER_now", "symptom_ids": ["dyspnea"] }
        ],
        "condition_red_flags": [
            { "condition_id": "meningitis", "red_flag_id": "rf_neck_stiff" },
            { "condition_id": "pneumonia", "red_flag_id": "rf_breathing" }
        ],
        "condition_links": [
            { "condition_id": "influenza", "link_type": "lab", "target_id": "cbc" },
            { "condition_id": "influenza", "link_type": "guide", "target_id": "g_flu" },
            { "condition_id": "viral_uri", "link_type": "guide", "target_id": "g_flu" },
            { "condition_id": "covid", "link_type": "lab", "target_id": "covid_pcr" },
            { "condition_id": "meningitis", "link_type": "referral", "target_id": "ed" },
            { "condition_id": "bronchitis", "link_type": "medication", "target_id": "bronchodilator" }
        ],
        "vital_rules": [
            { "rule_id": "spo2_low", "name": "Low oxygen saturation", "vital": "spo2",
              "operator": "<", "threshold": 92, "unit": "%" }
        ],
        "labs": [
            { "lab_id": "cbc", "name": "Complete blood count" },
            { "lab_id": "covid_pcr", "name": "COVID-19 PCR" }
        ],
        "specialists": [{ "specialist_id": "ed", "name": "Emergency department" }],
        "medications": [{ "med_id": "bronchodilator", "name": "Bronchodilator" }],
        "actions": [],
        "guides": [{ "guide_id": "g_flu", "title": "Managing flu symptoms at home" }],
        "templates": [
            { "template_id": "visit_summary", "name": "Visit summary" }
        ],
        "assistant_actions": [
            { "assistant_action_id": "collect_spo2", "name": "Measure oxygen saturation" },
            { "assistant_action_id": "collect_bp", "name": "Measure blood pressure" },
            { "assistant_action_id": "clarify_symptom_duration", "name": "Clarify symptom duration" }
        ],
        "assistant_action_ui_map": [
            { "assistant_action_id": "collect_spo2", "ui_control": "number", "field_keys": "spo2",
              "min_value": 50, "max_value": 100, "unit_label": "%" },
            { "assistant_action_id": "collect_bp", "ui_control": "two_number",
              "field_keys": "bp_systolic,bp_diastolic", "min_value": 30, "max_value": 300 },
            { "assistant_action_id": "clarify_symptom_duration", "ui_control": "textarea",
              "field_keys": "symptom_duration" }
        ],
        "clinician_validation_checklist": [
            { "field_id": "chief_concern", "tier_level": 1, "description": "Chief concern" },
            { "field_id": "oxygen_saturation", "tier_level": 2, "description": "Oxygen saturation",
              "assistant_action_id": "collect_spo2", "clinician_prompt": true,
              "question_text": "Was SpO2 measured at check-in?", "field_type": "number" },
            { "field_id": "blood_pressure", "tier_level": 2, "description": "Blood pressure",
              "assistant_action_id": "collect_bp" },
            { "field_id": "pmh", "tier_level": 2, "description": "Past medical history",
              "clinician_prompt": true },
            { "field_id": "symptom_durations", "tier_level": 2, "description": "Symptom duration",
              "assistant_action_id": "clarify_symptom_duration" },
            { "field_id": "consent_acknowledged", "tier_level": 2, "description": "Consent" },
            { "field_id": "occupation", "tier_level": 2, "required": false, "description": "Occupation" },
            { "field_id": "favourite_colour", "tier_level": 2, "description": "Not an intake field" }
        ]
    })
}

pub fn knowledge() -> KnowledgeIndex {
    KnowledgeIndex::build(workbook_tables(workbook()).unwrap()).unwrap()
}

pub fn complete_vitals() -> Vitals {
    Vitals {
        temperature: Some(38.2),
        heart_rate: Some(96),
        respiratory_rate: Some(18),
        blood_pressure_systolic: Some(124),
        blood_pressure_diastolic: Some(80),
        oxygen_saturation: Some(97),
        height_cm: Some(172.0),
        weight_kg: Some(70.0),
        ..Default::default()
    }
}

/// A tidy intake reporting the given symptoms as present.
pub fn intake(present: &[&str]) -> IntakeSnapshot {
    IntakeSnapshot {
        session_token: "tok-1".to_string(),
        patient_id: "p-1".to_string(),
        chief_concern: Some("fever and cough".to_string()),
        consent_acknowledged: true,
        symptoms: present
            .iter()
            .map(|id| {
                Entry::from(SymptomEntry {
                    symptom_id: id.to_string(),
                    present: Some(true),
                    ..Default::default()
                })
            })
            .collect(),
        vitals: complete_vitals(),
        pmh: vec!["asthma".to_string()],
        symptom_durations: [("fever".to_string(), Some("3 days".to_string()))]
            .into_iter()
            .collect(),
        ..Default::default()
    }
}

pub fn answer_red_flag(intake: &mut IntakeSnapshot, red_flag_id: &str, present: bool) {
    intake.red_flags.push(
        RedFlagAnswer {
            red_flag_id: red_flag_id.to_string(),
            present: Some(present),
            notes: None,
        }
        .into(),
    );
}

pub fn staff() -> Actor {
    Actor::new(ActorType::Staff, Some("staff-7".to_string()))
}
