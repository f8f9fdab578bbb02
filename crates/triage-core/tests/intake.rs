use serde_json::json;

use triage_core::error::CoreError;
use triage_core::models::intake::{Entry, IntakeSnapshot, SocialHistory, Vitals};
use triage_core::models::knowledge::{RuleOperator, SupportRow, SupportSource};

#[test]
fn partial_intake_parses_with_empty_sections() {
    let raw = json!({
        "session_token": "tok-1",
        "patient_id": "p-1",
        "chief_concern": "headache for three days",
        "symptoms": [{ "symptom_id": "headache", "present": true }]
    })
    .to_string();

    let intake = IntakeSnapshot::from_json(&raw).unwrap();
    assert_eq!(intake.symptoms.len(), 1);
    assert!(intake.issue_cards.is_empty());
    assert!(intake.red_flags.is_empty());
    assert!(!intake.consent_acknowledged);
    assert!(intake.vitals.is_empty());
}

#[test]
fn blank_patient_id_is_rejected() {
    let raw = json!({ "session_token": "tok-1", "patient_id": "  " }).to_string();
    match IntakeSnapshot::from_json(&raw) {
        Err(CoreError::MissingField(field)) => assert_eq!(field, "patient_id"),
        other => panic!("expected MissingField, got {other:?}"),
    }
}

#[test]
fn symptom_entry_without_id_still_parses() {
    let raw = json!({
        "session_token": "tok-1",
        "patient_id": "p-1",
        "symptoms": [{ "present": true }]
    })
    .to_string();

    let intake = IntakeSnapshot::from_json(&raw).unwrap();
    assert_eq!(intake.symptoms[0].read().unwrap().symptom_id, "");
}

#[test]
fn unreadable_list_items_do_not_reject_the_intake() {
    let raw = json!({
        "session_token": "tok-1",
        "patient_id": "p-1",
        "symptoms": [
            { "symptom_id": "fever", "present": true },
            { "symptom_id": "cough", "present": "yes" },
            "headache"
        ],
        "issue_cards": [{ "region_id": "knee", "description": "swollen", "pain_score": 300 }],
        "family_history": [{ "relation": "mother" }]
    })
    .to_string();

    let intake = IntakeSnapshot::from_json(&raw).unwrap();
    assert_eq!(intake.symptoms[0].read().unwrap().symptom_id, "fever");
    assert!(matches!(intake.symptoms[1], Entry::Unreadable(_)));
    assert!(matches!(intake.symptoms[2], Entry::Unreadable(_)));
    assert_eq!(intake.issue_cards[0].read().unwrap().pain_score, Some(300));
    assert!(intake.family_history[0].read().is_none());

    // Unreadable items are stored as submitted.
    let stored = serde_json::to_value(&intake).unwrap();
    assert_eq!(stored["symptoms"][1], json!({ "symptom_id": "cough", "present": "yes" }));
}

#[test]
fn vitals_complete_when_all_measured_or_unknown() {
    let full = Vitals {
        temperature: Some(37.0),
        heart_rate: Some(72),
        respiratory_rate: Some(14),
        blood_pressure_systolic: Some(120),
        blood_pressure_diastolic: Some(80),
        oxygen_saturation: Some(98),
        height_cm: Some(170.0),
        weight_kg: Some(70.0),
        ..Default::default()
    };
    assert!(full.is_complete());

    let partial = Vitals {
        temperature: Some(37.0),
        ..Default::default()
    };
    assert!(!partial.is_complete());
    assert!(partial.missing_fields().contains(&"oxygen_saturation"));

    let unknown = Vitals {
        unknown: Some(true),
        ..Default::default()
    };
    assert!(unknown.is_complete());
}

#[test]
fn bmi_is_derived_from_height_and_weight() {
    let vitals = Vitals {
        height_cm: Some(200.0),
        weight_kg: Some(80.0),
        ..Default::default()
    };
    let bmi = vitals.bmi().unwrap();
    assert!((bmi - 20.0).abs() < 1e-9);
    assert_eq!(vitals.reading("bmi"), Some(bmi));
}

#[test]
fn vital_readings_accept_rule_names() {
    let vitals = Vitals {
        oxygen_saturation: Some(91),
        blood_pressure_systolic: Some(182),
        ..Default::default()
    };
    assert_eq!(vitals.reading("spo2"), Some(91.0));
    assert_eq!(vitals.reading("bp_systolic"), Some(182.0));
    assert_eq!(vitals.reading("bp_diastolic"), None);
    assert_eq!(vitals.reading("pulse_pressure"), None);
}

#[test]
fn social_history_answers_skip_blanks() {
    let social = SocialHistory {
        tobacco: Some("never".to_string()),
        alcohol: Some("   ".to_string()),
        stressors: Some("prefer not to say".to_string()),
        ..Default::default()
    };
    let answers = social.answers();
    assert_eq!(answers, vec![("tobacco", "never"), ("stressors", "prefer not to say")]);
}

#[test]
fn support_rows_accept_workbook_spelling() {
    let row: SupportRow = serde_json::from_value(json!({
        "from_type": "VitalRule",
        "from_id": "spo2_low",
        "condition_id": "respiratory_compromise_risk",
        "weight": 5
    }))
    .unwrap();
    assert_eq!(row.from_type, SupportSource::VitalRule);
    assert_eq!(row.weight, 5.0);
}

#[test]
fn rule_operators_compare_against_threshold() {
    assert!(RuleOperator::Lt.holds(91.0, 92.0));
    assert!(!RuleOperator::Lt.holds(92.0, 92.0));
    assert!(RuleOperator::Le.holds(94.0, 94.0));
    assert!(RuleOperator::Ge.holds(180.0, 180.0));
    assert!(!RuleOperator::Gt.holds(180.0, 180.0));
}
