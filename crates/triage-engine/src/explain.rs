//! Clinician-facing explanations, re-derived from the intake and the same
//! knowledge base the triage pass scored against. Never shown to patients.

use std::collections::BTreeSet;

use triage_core::models::explanation::{ConditionExplanation, KnowledgeReference, WeightedFinding};
use triage_core::models::intake::IntakeSnapshot;
use triage_knowledge::tables::table;
use triage_knowledge::{KnowledgeBaseView, Support};

use crate::compose::describe_anomaly;
use crate::error::TriageError;
use crate::extract::EvidenceSet;
use crate::gaps;
use crate::scoring::score_condition;

pub fn explain_condition_probability(
    view: &dyn KnowledgeBaseView,
    intake: &IntakeSnapshot,
    condition_id: &str,
) -> Result<ConditionExplanation, TriageError> {
    let condition = view
        .condition(condition_id)
        .ok_or_else(|| TriageError::UnknownCondition(condition_id.to_string()))?;
    let evidence = EvidenceSet::extract(intake, view);
    let score = score_condition(view, condition, &evidence);

    let (matched, unmatched): (Vec<_>, Vec<_>) = view
        .supports(condition_id)
        .iter()
        .partition(|support| evidence.matches(support));
    let finding = |s: &&Support| WeightedFinding {
        source_id: s.source_id.clone(),
        weight: s.weight,
    };

    let matched_history = view
        .supports(condition_id)
        .iter()
        .filter(|s| evidence.pmh.iter().any(|p| p.eq_ignore_ascii_case(&s.source_id)))
        .map(|s| s.source_id.clone())
        .collect();
    let name = condition.name.to_lowercase();
    let matched_issues = evidence
        .issue_findings
        .iter()
        .filter(|issue| !name.is_empty() && issue.description.to_lowercase().contains(&name))
        .map(|issue| issue.description.clone())
        .collect();

    let mut notes = vec![format!(
        "Confidence is {} based on probability {:.2}.",
        score.confidence_label, score.probability
    )];
    if score.total_weight == 0.0 {
        notes.push("Condition has no support weights; probability is 0.".to_string());
    } else {
        notes.push(format!(
            "Matched weight {} of {}.",
            score.matched_weight, score.total_weight
        ));
    }
    if score.triggered_red_flag() {
        notes.push("Red flag present: always shown regardless of rank.".to_string());
    }
    if !evidence.medications.is_empty() {
        notes.push(format!("Medications counted: {}.", join(&evidence.medications)));
    }
    if !evidence.allergies.is_empty() {
        notes.push(format!("Allergies present: {}.", join(&evidence.allergies)));
    }

    let reference = |table: &str, key: &str| KnowledgeReference {
        table: table.to_string(),
        key: key.to_string(),
    };
    let mut references = vec![reference(table::CONDITIONS, condition_id)];
    references.extend(
        view.supports(condition_id)
            .iter()
            .map(|s| reference(table::SUPPORTS, &s.source_id)),
    );
    references.extend(
        view.condition_red_flags(condition_id)
            .iter()
            .map(|id| reference(table::CONDITION_RED_FLAGS, id)),
    );

    Ok(ConditionExplanation {
        condition_id: score.condition_id,
        condition_name: score.condition_name,
        probability: score.probability,
        confidence_label: score.confidence_label,
        matched_supports: matched.iter().map(finding).collect(),
        unmatched_supports: unmatched.iter().map(finding).collect(),
        matched_weight: score.matched_weight,
        total_weight: score.total_weight,
        matched_history,
        matched_issues,
        matched_red_flags: score.fired_red_flags,
        notes,
        references,
    })
}

fn join(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Every anomaly found in the intake, in clinician wording.
pub fn explain_anomaly(view: &dyn KnowledgeBaseView, intake: &IntakeSnapshot) -> Vec<String> {
    EvidenceSet::extract(intake, view)
        .anomalies
        .iter()
        .map(describe_anomaly)
        .collect()
}

pub fn explain_assistant_action(
    view: &dyn KnowledgeBaseView,
    intake: &IntakeSnapshot,
    action_id: &str,
) -> Result<String, TriageError> {
    let evidence = EvidenceSet::extract(intake, view);
    let found = gaps::resolve(view, intake, &evidence)
        .assistant_actions
        .into_iter()
        .find(|a| a.action_id == action_id)
        .ok_or_else(|| TriageError::UnknownAction(action_id.to_string()))?;
    Ok(format!(
        "Assistant Action for field '{}': {}",
        found.triggered_by, found.description
    ))
}

pub fn explain_followup_question(
    view: &dyn KnowledgeBaseView,
    intake: &IntakeSnapshot,
    question_id: &str,
) -> Result<String, TriageError> {
    let evidence = EvidenceSet::extract(intake, view);
    let found = gaps::resolve(view, intake, &evidence)
        .followup_questions
        .into_iter()
        .find(|q| q.question_id == question_id)
        .ok_or_else(|| TriageError::UnknownQuestion(question_id.to_string()))?;
    Ok(format!(
        "Suggested follow-up question ('{}'): {}",
        found.question_id, found.description
    ))
}
