//! Clinical summary and suggestion assembly.

use triage_core::models::explanation::{Anomaly, AnomalyKind};
use triage_core::models::intake::IntakeSnapshot;
use triage_core::models::knowledge::LinkType;
use triage_core::models::triage::{
    Acuity, ConditionProbability, SuggestionItem, SuggestionType, TriageSummary,
};
use triage_knowledge::KnowledgeBaseView;

use crate::extract::EvidenceSet;
use crate::scoring::Differential;

/// Link kinds that produce suggestions, in output order.
const SUGGESTION_LINKS: [(LinkType, SuggestionType); 5] = [
    (LinkType::Lab, SuggestionType::Labs),
    (LinkType::Referral, SuggestionType::Referrals),
    (LinkType::Medication, SuggestionType::Meds),
    (LinkType::Action, SuggestionType::Actions),
    (LinkType::Guide, SuggestionType::Guides),
];

pub fn summarize(
    view: &dyn KnowledgeBaseView,
    intake: &IntakeSnapshot,
    evidence: &EvidenceSet,
    differential: &Differential,
) -> TriageSummary {
    let acuity = differential.acuity(evidence);
    let red_flags: Vec<String> = evidence
        .present_red_flags()
        .into_iter()
        .map(str::to_string)
        .collect();

    let concern = intake
        .chief_concern
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("not provided");
    let mut summary = format!("Chief concern: {concern}.");

    match differential.displayed.first() {
        Some(top) => summary.push_str(&format!(
            " Top condition: {} ({} confidence, {:.0}% match).",
            top.condition_name,
            top.confidence_label,
            top.probability * 100.0
        )),
        None if evidence.present_symptoms.is_empty() => {
            summary.push_str(" No differential yet: no symptoms reported present.")
        }
        None => {
            summary.push_str(" No differential yet: no condition matched the reported symptoms.")
        }
    }
    if !red_flags.is_empty() {
        let names: Vec<&str> = red_flags
            .iter()
            .map(|id| view.red_flag(id).map_or(id.as_str(), |f| f.name.as_str()))
            .collect();
        summary.push_str(&format!(" Red flags: {}.", names.join("; ")));
    }
    summary.push_str(&format!(" Acuity: {acuity}."));
    if acuity == Acuity::Urgent {
        summary.push_str(" Escalate for immediate clinician review.");
    }

    TriageSummary {
        acuity,
        summary,
        red_flags,
        major_anomalies: evidence.anomalies.iter().map(describe_anomaly).collect(),
    }
}

/// Clinician-facing wording for one anomaly.
pub fn describe_anomaly(anomaly: &Anomaly) -> String {
    match anomaly.kind {
        AnomalyKind::VitalsIncomplete | AnomalyKind::PreferNotToSay => anomaly.detail.clone(),
        AnomalyKind::Contradiction => format!("Clinical contradiction in data: {}", anomaly.detail),
        AnomalyKind::MalformedEntry => match &anomaly.location {
            Some(at) => format!("Skipped unreadable entry at {at}: {}", anomaly.detail),
            None => format!("Skipped unreadable entry: {}", anomaly.detail),
        },
    }
}

/// One suggestion per linked entity of each displayed condition.
///
/// Entities shared by two conditions are listed once per condition.
pub fn suggestions(
    view: &dyn KnowledgeBaseView,
    displayed: &[ConditionProbability],
) -> Vec<SuggestionItem> {
    let mut items = Vec::new();
    for condition in displayed.iter().filter(|c| !c.suppressed_due_to_red_flag) {
        for (link_type, suggestion_type) in SUGGESTION_LINKS {
            for target_id in view.linked(&condition.condition_id, link_type) {
                let description = view
                    .catalog_entry(link_type, target_id)
                    .map_or_else(|| target_id.clone(), |entry| entry.name.clone());
                items.push(SuggestionItem {
                    suggestion_type,
                    suggestion_id: target_id.clone(),
                    description,
                    relevant_condition_id: Some(condition.condition_id.clone()),
                });
            }
        }
    }
    items
}
