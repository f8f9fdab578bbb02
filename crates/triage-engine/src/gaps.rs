//! Gap and action resolution against the clinician validation checklist.

use std::collections::BTreeSet;

use triage_core::models::intake::IntakeSnapshot;
use triage_core::models::knowledge::ChecklistRow;
use triage_core::models::triage::{AssistantAction, FollowUpQuestion};
use triage_knowledge::KnowledgeBaseView;

use crate::extract::EvidenceSet;
use crate::fields::IntakeField;

/// Checklist tier whose required fields raise assistant actions.
pub const GAP_TIER: u8 = 2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gaps {
    pub assistant_actions: Vec<AssistantAction>,
    pub followup_questions: Vec<FollowUpQuestion>,
}

/// The action id raised for a checklist row.
pub fn action_id_for(row: &ChecklistRow) -> String {
    row.assistant_action_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("assistant_{}", row.field_id.trim()))
}

pub fn question_id_for(row: &ChecklistRow) -> String {
    format!("fq_{}", row.field_id.trim())
}

pub fn red_flag_question_id(red_flag_id: &str) -> String {
    format!("fq_red_flag_{red_flag_id}")
}

/// Tier-2 checklist rows whose field is missing from the intake.
///
/// Rows naming a field outside [`IntakeField`] cannot be evaluated and are
/// skipped.
pub fn missing_tier2<'a>(
    view: &'a dyn KnowledgeBaseView,
    intake: &IntakeSnapshot,
) -> Vec<(&'a ChecklistRow, IntakeField)> {
    view.validation_checklist()
        .iter()
        .filter(|row| row.tier_level == GAP_TIER && row.required)
        .filter_map(|row| IntakeField::from_field_id(&row.field_id).map(|field| (row, field)))
        .filter(|(_, field)| field.is_missing(intake))
        .collect()
}

pub fn resolve(
    view: &dyn KnowledgeBaseView,
    intake: &IntakeSnapshot,
    evidence: &EvidenceSet,
) -> Gaps {
    let mut gaps = Gaps::default();
    let mut seen_actions = BTreeSet::new();

    for (row, field) in missing_tier2(view, intake) {
        let action_id = action_id_for(row);
        if seen_actions.insert(action_id.clone()) {
            let description = if row.description.trim().is_empty() {
                view.assistant_action(&action_id)
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| format!("Collect {}", field.name().replace('_', " ")))
            } else {
                row.description.clone()
            };
            gaps.assistant_actions.push(AssistantAction {
                action_id: action_id.clone(),
                description,
                completed: false,
                triggered_by: row.field_id.clone(),
                ui_component: view
                    .assistant_action_ui(&action_id)
                    .map(|ui| ui.ui_control.clone()),
            });
        }

        if row.clinician_prompt {
            gaps.followup_questions.push(FollowUpQuestion {
                question_id: question_id_for(row),
                description: row.question_text.clone().unwrap_or_else(|| {
                    let what = if row.description.trim().is_empty() {
                        field.name().replace('_', " ")
                    } else {
                        row.description.to_lowercase()
                    };
                    format!("Please confirm {what} with the patient.")
                }),
                field_type: row.field_type.clone(),
                answer: None,
                required: row.required,
                triggered_by: row.field_id.clone(),
            });
        }
    }

    // Red flags linked to a reported symptom but left unanswered.
    let mut asked = BTreeSet::new();
    for symptom_id in &evidence.present_symptoms {
        for red_flag_id in view.red_flags_for_symptom(symptom_id) {
            if evidence.red_flag_answers.contains_key(red_flag_id) || !asked.insert(red_flag_id) {
                continue;
            }
            let name = view
                .red_flag(red_flag_id)
                .map_or(red_flag_id.as_str(), |f| f.name.as_str());
            let symptom = view
                .symptom(symptom_id)
                .map_or(symptom_id.as_str(), |s| s.name.as_str());
            gaps.followup_questions.push(FollowUpQuestion {
                question_id: red_flag_question_id(red_flag_id),
                description: format!("Patient reported {symptom}. Confirm red flag: {name}?"),
                field_type: "boolean".to_string(),
                answer: None,
                required: true,
                triggered_by: symptom_id.clone(),
            });
        }
    }

    gaps
}
