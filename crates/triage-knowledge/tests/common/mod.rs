#![allow(dead_code)]

use serde_json::{Value, json};

/// A small but complete workbook: two conditions, one red flag, one vital rule.
pub fn workbook() -> Value {
    json!({
        "conditions": [
            { "condition_id": "uri", "name": "Upper respiratory infection", "severity": "common" },
            { "condition_id": "pneumonia", "name": "Pneumonia", "severity": "serious_bucket" }
        ],
        "symptoms": [
            { "symptom_id": "fever", "name": "Fever" },
            { "symptom_id": "cough", "name": "Cough" },
            { "symptom_id": "dyspnea", "name": "Shortness of breath" }
        ],
        "supports": [
            { "symptom_id": "cough", "condition_id": "uri", "weight": 2 },
            { "symptom_id": "fever", "condition_id": "uri", "weight": 1 },
            { "from_type": "Symptom", "from_id": "fever", "condition_id": "pneumonia", "weight": 2 },
            { "from_type": "VitalRule", "from_id": "spo2_low", "condition_id": "pneumonia", "weight": 3 }
        ],
        "red_flags": [
            { "redflag_id": "rf_breathing", "name": "Severe difficulty breathing", "urgency": "ER_now",
              "symptom_ids": ["dyspnea"] }
        ],
        "condition_red_flags": [
            { "condition_id": "pneumonia", "redflag_id": "rf_breathing" }
        ],
        "condition_links": [
            { "condition_id": "pneumonia", "link_type": "lab", "target_id": "cxr" },
            { "condition_id": "uri", "link_type": "guide", "target_id": "g_uri" }
        ],
        "vital_rules": [
            { "rule_id": "spo2_low", "name": "Low oxygen saturation", "vital": "spo2",
              "operator": "<", "threshold": 92, "unit": "%" }
        ],
        "labs": [{ "lab_id": "cxr", "name": "Chest X-ray" }],
        "specialists": [{ "specialist_id": "pulm", "name": "Pulmonology" }],
        "medications": [{ "med_id": "antipyretic", "name": "Antipyretic" }],
        "actions": [],
        "guides": [{ "guide_id": "g_uri", "title": "Colds and flu at home" }],
        "templates": [
            { "template_id": "t_default", "name": "Default", "subject_template": "Your visit",
              "body_template": "Hello {{patient_name}}" }
        ],
        "assistant_action_ui_map": [
            { "assistant_action_id": "collect_spo2", "ui_control": "number", "field_keys": "spo2",
              "min_value": 50, "max_value": 100, "unit_label": "%" }
        ],
        "clinician_validation_checklist": [
            { "field_id": "oxygen_saturation", "tier_level": 2, "description": "Oxygen saturation",
              "assistant_action_id": "collect_spo2", "clinician_prompt": true }
        ]
    })
}

/// The same pack as [`workbook`], as a node/relationship export.
pub fn graph_export() -> Value {
    json!({
        "nodes": [
            { "id": "n1", "labels": ["Condition"], "properties": { "condition_id": "uri", "name": "Upper respiratory infection" } },
            { "id": "n2", "labels": ["Condition"], "properties": { "condition_id": "pneumonia", "name": "Pneumonia" } },
            { "id": "n3", "labels": ["Symptom"], "properties": { "symptom_id": "fever", "name": "Fever" } },
            { "id": "n4", "labels": ["Symptom"], "properties": { "symptom_id": "cough", "name": "Cough" } },
            { "id": "n5", "labels": ["Symptom"], "properties": { "symptom_id": "dyspnea", "name": "Shortness of breath" } },
            { "id": "n6", "labels": ["RedFlag"], "properties": { "red_flag_id": "rf_breathing", "name": "Severe difficulty breathing" } },
            { "id": "n7", "labels": ["VitalRule"], "properties": { "rule_id": "spo2_low", "name": "Low oxygen saturation",
              "vital": "spo2", "operator": "<", "threshold": 92 } },
            { "id": "n8", "labels": ["Lab"], "properties": { "lab_id": "cxr", "name": "Chest X-ray" } },
            { "id": "n9", "labels": ["Action"], "properties": { "action_id": "a_recheck", "name": "Recheck vitals" } },
            { "id": "n10", "labels": ["Guide"], "properties": { "guide_id": "g_uri", "title": "Colds and flu at home" } },
            { "id": "n11", "labels": ["Template"], "properties": { "template_id": "t_default", "name": "Default" } },
            { "id": "n12", "labels": ["AssistantActionUi"], "properties": { "assistant_action_id": "collect_spo2",
              "ui_control": "number", "field_keys": "spo2" } },
            { "id": "n13", "labels": ["ChecklistItem"], "properties": { "field_id": "oxygen_saturation", "tier_level": 2,
              "assistant_action_id": "collect_spo2" } },
            { "id": "n14", "labels": ["Specialist"], "properties": { "specialist_id": "pulm", "name": "Pulmonology" } },
            { "id": "n15", "labels": ["Medication"], "properties": { "med_id": "antipyretic", "name": "Antipyretic" } }
        ],
        "relationships": [
            { "type": "SUPPORTS", "start": "n4", "end": "n1", "properties": { "weight": 2 } },
            { "type": "SUPPORTS", "start": "n3", "end": "n1", "properties": { "weight": 1 } },
            { "type": "SUPPORTS", "start": "n3", "end": "n2", "properties": { "weight": 2 } },
            { "type": "SUPPORTS", "start": "n7", "end": "n2", "properties": { "weight": 3 } },
            { "type": "HAS_RED_FLAG", "start": "n2", "end": "n6" },
            { "type": "INDICATES", "start": "n5", "end": "n6" },
            { "type": "SUGGESTS_LAB", "start": "n2", "end": "n8" },
            { "type": "HAS_GUIDE", "start": "n1", "end": "n10" },
            { "type": "MENTIONS", "start": "n1", "end": "n999" }
        ]
    })
}
