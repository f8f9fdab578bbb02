//! Differential scoring.
//!
//! Each condition is scored independently as the share of its own support
//! weight matched by the evidence. Ranking is by probability, then by
//! condition id, and red-flagged conditions are always displayed.

use std::cmp::Ordering;

use triage_core::models::knowledge::ConditionRow;
use triage_core::models::triage::{Acuity, ConditionProbability, ConfidenceLabel};
use triage_knowledge::KnowledgeBaseView;

use crate::extract::EvidenceSet;

pub const HIGH_CONFIDENCE: f64 = 0.66;
pub const MEDIUM_CONFIDENCE: f64 = 0.33;
pub const TOP_N: usize = 5;

pub fn confidence_label(probability: f64) -> ConfidenceLabel {
    if probability >= HIGH_CONFIDENCE {
        ConfidenceLabel::High
    } else if probability >= MEDIUM_CONFIDENCE {
        ConfidenceLabel::Medium
    } else {
        ConfidenceLabel::Low
    }
}

/// The full scoring record for one condition, before display selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionScore {
    pub condition_id: String,
    pub condition_name: String,
    pub matched_weight: f64,
    pub total_weight: f64,
    pub probability: f64,
    pub confidence_label: ConfidenceLabel,
    /// The condition's red flags that were answered present.
    pub fired_red_flags: Vec<String>,
}

impl ConditionScore {
    pub fn triggered_red_flag(&self) -> bool {
        !self.fired_red_flags.is_empty()
    }

    fn to_probability(&self, notes: Option<String>) -> ConditionProbability {
        ConditionProbability {
            condition_id: self.condition_id.clone(),
            condition_name: self.condition_name.clone(),
            probability: self.probability,
            confidence_label: self.confidence_label,
            triggered_red_flag: self.triggered_red_flag(),
            suppressed_due_to_red_flag: false,
            notes,
        }
    }
}

pub fn score_condition(
    view: &dyn KnowledgeBaseView,
    condition: &ConditionRow,
    evidence: &EvidenceSet,
) -> ConditionScore {
    let (matched, total) = view.supports(&condition.condition_id).iter().fold(
        (0.0_f64, 0.0_f64),
        |(matched, total), support| {
            let hit = if evidence.matches(support) {
                support.weight
            } else {
                0.0
            };
            (matched + hit, total + support.weight)
        },
    );
    let probability = if total > 0.0 {
        (matched / total).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let fired_red_flags = view
        .condition_red_flags(&condition.condition_id)
        .iter()
        .filter(|id| evidence.red_flag_present(id))
        .cloned()
        .collect();

    ConditionScore {
        condition_id: condition.condition_id.clone(),
        condition_name: condition.name.clone(),
        matched_weight: matched,
        total_weight: total,
        probability,
        confidence_label: confidence_label(probability),
        fired_red_flags,
    }
}

/// Probability descending, then condition id ascending.
fn rank_order(a: &ConditionScore, b: &ConditionScore) -> Ordering {
    b.probability
        .total_cmp(&a.probability)
        .then_with(|| a.condition_id.cmp(&b.condition_id))
}

/// The displayed differential and whatever a red-flag promotion pushed out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Differential {
    pub displayed: Vec<ConditionProbability>,
    pub suppressed: Vec<ConditionProbability>,
}

impl Differential {
    pub fn acuity(&self, evidence: &EvidenceSet) -> Acuity {
        if !evidence.present_red_flags().is_empty() {
            return Acuity::Urgent;
        }
        match self.displayed.first().map(|c| c.confidence_label) {
            None => Acuity::Deferred,
            Some(ConfidenceLabel::High | ConfidenceLabel::Medium) => Acuity::Routine,
            Some(ConfidenceLabel::Low) => Acuity::Followup,
        }
    }
}

/// Score every condition and return the candidates, strongest first.
///
/// A candidate is any condition with a fired red flag, or with a non-zero
/// probability once at least one symptom is present; vital findings alone
/// never start a differential. Conditions without any support weight only
/// become candidates when symptoms were reported and nothing else scored.
pub fn ranked_candidates(
    view: &dyn KnowledgeBaseView,
    evidence: &EvidenceSet,
) -> Vec<ConditionScore> {
    let scores: Vec<ConditionScore> = view
        .conditions()
        .iter()
        .map(|c| score_condition(view, c, evidence))
        .collect();

    let has_symptoms = !evidence.present_symptoms.is_empty();
    let mut candidates: Vec<ConditionScore> = scores
        .iter()
        .filter(|s| s.triggered_red_flag() || (has_symptoms && s.probability > 0.0))
        .cloned()
        .collect();
    if candidates.is_empty() && has_symptoms {
        candidates = scores
            .into_iter()
            .filter(|s| s.total_weight == 0.0)
            .collect();
    }
    candidates.sort_by(rank_order);
    candidates
}

/// Select the displayed top conditions, applying the red-flag override.
///
/// Every red-flagged candidate is displayed even past the natural top
/// [`TOP_N`]. Remaining slots go to the strongest other candidates; natural
/// top entries that lose their slot are returned as suppressed.
pub fn differential(ranked: &[ConditionScore]) -> Differential {
    let natural = &ranked[..ranked.len().min(TOP_N)];
    let promoted: Vec<&ConditionScore> = ranked[natural.len()..]
        .iter()
        .filter(|s| s.triggered_red_flag())
        .collect();

    let flagged_count = ranked.iter().filter(|s| s.triggered_red_flag()).count();
    let open_slots = TOP_N.saturating_sub(flagged_count);

    let mut displayed = Vec::new();
    let mut suppressed = Vec::new();
    let mut others_taken = 0;
    for score in natural {
        if score.triggered_red_flag() {
            displayed.push(score.to_probability(Some(red_flag_note(score))));
        } else if others_taken < open_slots {
            others_taken += 1;
            displayed.push(score.to_probability(None));
        } else {
            let by: Vec<&str> = promoted.iter().map(|p| p.condition_id.as_str()).collect();
            let mut entry = score.to_probability(Some(format!(
                "Suppressed from display: slot taken by red-flagged condition(s) {}.",
                by.join(", ")
            )));
            entry.suppressed_due_to_red_flag = true;
            suppressed.push(entry);
        }
    }
    for score in promoted {
        displayed.push(score.to_probability(Some(format!(
            "{} Promoted past the top {TOP_N} by red-flag override.",
            red_flag_note(score)
        ))));
    }

    Differential {
        displayed,
        suppressed,
    }
}

fn red_flag_note(score: &ConditionScore) -> String {
    format!("Red flag present: {}.", score.fired_red_flags.join(", "))
}
