//! Patient-facing message drafting from a clinician's wrap-up plan.
//!
//! The draft is built from clinician free text and catalog display names
//! only. Scored data (probabilities, confidence labels, knowledge-base
//! condition names) has no path into it.

use triage_core::models::knowledge::LinkType;
use triage_core::models::wrapup::WrapUpPlan;
use triage_knowledge::KnowledgeBaseView;

pub const DEFAULT_RETURN_PRECAUTIONS: &str =
    "If you develop new or worsening symptoms, please contact us or go to the emergency department.";

pub fn draft_patient_message(
    plan: &WrapUpPlan,
    view: &dyn KnowledgeBaseView,
    patient_name: &str,
) -> String {
    let greeting = match patient_name.trim() {
        "" => "Hello,".to_string(),
        name => format!("Hello {name},"),
    };
    let mut lines = vec![greeting, String::new()];

    if let Some(text) = non_blank(&plan.final_diagnosis_text) {
        lines.push(format!("Summary: {text}"));
        lines.push(String::new());
    }

    let sections = [
        ("Ordered labs", LinkType::Lab, &plan.labs),
        ("Referrals", LinkType::Referral, &plan.referrals),
        ("Medication recommendations", LinkType::Medication, &plan.med_categories),
        ("Clinic actions", LinkType::Action, &plan.actions),
        ("Patient guides provided", LinkType::Guide, &plan.guides),
    ];
    let mut any_section = false;
    for (heading, link_type, ids) in sections {
        let names = display_names(view, link_type, ids);
        if !names.is_empty() {
            lines.push(format!("{heading}: {}", names.join(", ")));
            any_section = true;
        }
    }
    if let Some(timing) = non_blank(&plan.followup_timing) {
        lines.push(format!("Follow-up: {timing}"));
        any_section = true;
    }
    if any_section {
        lines.push(String::new());
    }

    lines.push("Return Precautions:".to_string());
    lines.push(
        non_blank(&plan.followup_instructions)
            .unwrap_or(DEFAULT_RETURN_PRECAUTIONS)
            .to_string(),
    );
    lines.push(String::new());
    lines.push("Thank you for choosing our clinic.".to_string());
    lines.join("\n")
}

/// Catalog names for the selected ids. Ids that are not catalog entries of
/// this kind are left out, which also keeps condition ids out of the draft.
fn display_names(
    view: &dyn KnowledgeBaseView,
    link_type: LinkType,
    ids: &[String],
) -> Vec<String> {
    ids.iter()
        .filter_map(|id| view.catalog_entry(link_type, id.trim()))
        .map(|entry| entry.name.clone())
        .collect()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
