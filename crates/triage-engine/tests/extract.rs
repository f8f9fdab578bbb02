mod common;

use std::collections::BTreeMap;

use triage_core::models::explanation::AnomalyKind;
use triage_core::models::intake::{
    Entry, IssueCard, MedicationEntry, RedFlagAnswer, SymptomEntry, Vitals,
};
use triage_engine::EvidenceSet;

fn kinds(evidence: &EvidenceSet) -> Vec<AnomalyKind> {
    evidence.anomalies.iter().map(|a| a.kind).collect()
}

#[test]
fn only_explicitly_present_symptoms_count() {
    let kb = common::knowledge();
    let mut intake = common::intake(&["fever"]);
    intake.symptoms.push(
        SymptomEntry {
            symptom_id: "cough".to_string(),
            present: Some(false),
            ..Default::default()
        }
        .into(),
    );
    intake.symptoms.push(
        SymptomEntry {
            symptom_id: "rash".to_string(),
            present: None,
            ..Default::default()
        }
        .into(),
    );

    let evidence = EvidenceSet::extract(&intake, &kb);
    assert_eq!(evidence.present_symptoms.len(), 1);
    assert!(evidence.present_symptoms.contains("fever"));
}

#[test]
fn malformed_symptom_is_skipped_with_anomaly() {
    let kb = common::knowledge();
    let mut intake = common::intake(&["fever"]);
    intake.symptoms.insert(
        0,
        SymptomEntry {
            present: Some(true),
            ..Default::default()
        }
        .into(),
    );

    let evidence = EvidenceSet::extract(&intake, &kb);
    assert!(evidence.present_symptoms.contains("fever"));
    let anomaly = &evidence.anomalies[0];
    assert_eq!(anomaly.kind, AnomalyKind::MalformedEntry);
    assert_eq!(anomaly.location.as_deref(), Some("symptoms[0]"));

    // The rest of the intake still triages.
    let result = triage_engine::run(&kb, &intake, None, &common::staff()).unwrap();
    assert!(!result.top_5_conditions.is_empty());
    assert_eq!(result.triage_summary.major_anomalies.len(), 1);
}

#[test]
fn unreadable_entries_are_skipped_with_anomalies() {
    let kb = common::knowledge();
    let raw = serde_json::json!({
        "session_token": "tok-1",
        "patient_id": "p-1",
        "chief_concern": "fever",
        "symptoms": [
            { "symptom_id": "fever", "present": true },
            { "symptom_id": "cough", "present": "yes" }
        ],
        "issue_cards": [{ "region_id": "knee", "description": "swollen", "pain_score": 300 }],
        "vitals": { "unknown": true }
    });
    let intake: triage_core::models::intake::IntakeSnapshot =
        serde_json::from_value(raw).unwrap();

    let evidence = EvidenceSet::extract(&intake, &kb);
    assert_eq!(evidence.present_symptoms.iter().collect::<Vec<_>>(), vec!["fever"]);
    assert_eq!(evidence.issue_findings[0].pain_score, None);

    let locations: Vec<_> = evidence
        .anomalies
        .iter()
        .filter(|a| a.kind == AnomalyKind::MalformedEntry)
        .map(|a| a.location.as_deref().unwrap())
        .collect();
    assert_eq!(locations, vec!["symptoms[1]", "issue_cards[0].pain_score"]);
    assert!(evidence.anomalies[0].detail.contains("expected a boolean"));

    let result = triage_engine::run(&kb, &intake, None, &common::staff()).unwrap();
    assert!(!result.top_5_conditions.is_empty());
}

#[test]
fn unanswered_red_flags_are_not_evidence() {
    let kb = common::knowledge();
    let mut intake = common::intake(&["fever"]);
    intake.red_flags.push(
        RedFlagAnswer {
            red_flag_id: "rf_breathing".to_string(),
            present: None,
            notes: None,
        }
        .into(),
    );
    common::answer_red_flag(&mut intake, "rf_neck_stiff", false);

    let evidence = EvidenceSet::extract(&intake, &kb);
    assert!(!evidence.red_flag_answers.contains_key("rf_breathing"));
    assert_eq!(evidence.red_flag_answers.get("rf_neck_stiff"), Some(&false));
    assert!(evidence.present_red_flags().is_empty());
}

#[test]
fn conflicting_red_flag_answers_keep_the_positive() {
    let kb = common::knowledge();
    let mut intake = common::intake(&["fever"]);
    common::answer_red_flag(&mut intake, "rf_breathing", true);
    common::answer_red_flag(&mut intake, "rf_breathing", false);

    let evidence = EvidenceSet::extract(&intake, &kb);
    assert!(evidence.red_flag_present("rf_breathing"));
    assert_eq!(kinds(&evidence), vec![AnomalyKind::Contradiction]);
}

#[test]
fn checklist_and_review_of_systems_disagreement_is_flagged() {
    let kb = common::knowledge();
    let mut intake = common::intake(&["fever"]);
    intake.ros = BTreeMap::from([("fever".to_string(), false), ("rash".to_string(), true)]);

    let evidence = EvidenceSet::extract(&intake, &kb);
    assert_eq!(kinds(&evidence), vec![AnomalyKind::Contradiction]);
    assert_eq!(evidence.anomalies[0].location.as_deref(), Some("ros.fever"));
    // Review of systems never adds evidence on its own.
    assert!(!evidence.present_symptoms.contains("rash"));
}

#[test]
fn incomplete_vitals_are_an_anomaly_unless_marked_unknown() {
    let kb = common::knowledge();
    let mut intake = common::intake(&["fever"]);
    intake.vitals = Vitals::default();

    let evidence = EvidenceSet::extract(&intake, &kb);
    assert!(!evidence.vitals_complete);
    assert_eq!(kinds(&evidence), vec![AnomalyKind::VitalsIncomplete]);
    assert!(evidence.anomalies[0].detail.starts_with("No vitals entered"));

    intake.vitals.temperature = Some(37.0);
    let evidence = EvidenceSet::extract(&intake, &kb);
    assert!(evidence.anomalies[0].detail.contains("heart_rate"));

    intake.vitals.unknown = Some(true);
    let evidence = EvidenceSet::extract(&intake, &kb);
    assert!(evidence.vitals_complete);
    assert!(evidence.anomalies.is_empty());
}

#[test]
fn declined_social_history_cluster_is_flagged() {
    let kb = common::knowledge();
    let mut intake = common::intake(&["fever"]);
    intake.social_history.alcohol = Some("Prefer not to say".to_string());

    let evidence = EvidenceSet::extract(&intake, &kb);
    assert!(evidence.anomalies.is_empty());

    intake.social_history.drugs = Some("prefer_not_to_say".to_string());
    let evidence = EvidenceSet::extract(&intake, &kb);
    assert_eq!(kinds(&evidence), vec![AnomalyKind::PreferNotToSay]);
    assert!(evidence.anomalies[0].detail.contains("alcohol, drugs"));
}

#[test]
fn history_lists_are_normalized() {
    let kb = common::knowledge();
    let mut intake = common::intake(&["fever"]);
    intake.pmh = vec![" asthma ".to_string(), "".to_string()];
    intake.medications = vec![
        Entry::from(MedicationEntry {
            med_name: "albuterol".to_string(),
            ..Default::default()
        }),
        Entry::from(MedicationEntry::default()),
    ];
    intake.issue_cards = vec![Entry::from(IssueCard {
        region_id: "chest".to_string(),
        description: "tight chest".to_string(),
        pain_score: Some(14),
        ..Default::default()
    })];

    let evidence = EvidenceSet::extract(&intake, &kb);
    assert_eq!(evidence.pmh.iter().collect::<Vec<_>>(), vec!["asthma"]);
    assert!(evidence.medications.contains("albuterol"));
    assert_eq!(evidence.issue_findings[0].pain_score, None);
    assert_eq!(
        kinds(&evidence),
        vec![AnomalyKind::MalformedEntry, AnomalyKind::MalformedEntry]
    );
}

#[test]
fn vital_rules_fire_on_recorded_readings() {
    let kb = common::knowledge();
    let mut intake = common::intake(&[]);
    intake.vitals.oxygen_saturation = Some(91);
    let evidence = EvidenceSet::extract(&intake, &kb);
    assert!(evidence.vital_findings.contains("spo2_low"));

    intake.vitals.oxygen_saturation = Some(92);
    let evidence = EvidenceSet::extract(&intake, &kb);
    assert!(evidence.vital_findings.is_empty());
}
