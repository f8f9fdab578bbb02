mod common;

use triage_core::models::wrapup::WrapUpPlan;
use triage_engine::communication::DEFAULT_RETURN_PRECAUTIONS;
use triage_engine::draft_patient_message;

#[test]
fn draft_uses_catalog_names_and_default_precautions() {
    let kb = common::knowledge();
    let plan = WrapUpPlan {
        final_diagnosis_id: Some("influenza".to_string()),
        labs: vec!["cbc".to_string()],
        guides: vec!["g_flu".to_string()],
        followup_timing: Some("in one week".to_string()),
        additional_notes: Some("consider oseltamivir if worse".to_string()),
        ..Default::default()
    };

    let draft = draft_patient_message(&plan, &kb, "Sam");
    assert!(draft.starts_with("Hello Sam,"));
    assert!(draft.contains("Ordered labs: Complete blood count"));
    assert!(draft.contains("Patient guides provided: Managing flu symptoms at home"));
    assert!(draft.contains("Follow-up: in one week"));
    assert!(draft.contains(DEFAULT_RETURN_PRECAUTIONS));
    assert!(!draft.contains("oseltamivir"));
}

#[test]
fn draft_never_leaks_scored_data() {
    let kb = common::knowledge();
    let mut intake = common::intake(&["fever", "cough"]);
    common::answer_red_flag(&mut intake, "rf_neck_stiff", true);
    let result = triage_engine::run(&kb, &intake, None, &common::staff()).unwrap();

    let plan = WrapUpPlan {
        final_diagnosis_id: Some("meningitis".to_string()),
        // Condition ids in catalog slots are not catalog entries.
        labs: vec!["meningitis".to_string(), "cbc".to_string()],
        referrals: vec!["ed".to_string()],
        followup_instructions: Some("Go to the emergency department now.".to_string()),
        ..Default::default()
    };
    let draft = draft_patient_message(&plan, &kb, "Sam");

    for condition in &result.top_5_conditions {
        assert!(!draft.contains(&condition.condition_name), "{}", condition.condition_name);
        assert!(!draft.contains(&condition.condition_id), "{}", condition.condition_id);
    }
    assert!(!draft.contains('%'));
    for label in ["high", "medium", "low"] {
        assert!(!draft.to_lowercase().contains(&format!("{label} confidence")));
    }
    assert!(draft.contains("Go to the emergency department now."));
    assert!(!draft.contains(DEFAULT_RETURN_PRECAUTIONS));
}
