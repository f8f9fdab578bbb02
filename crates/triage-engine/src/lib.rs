//! triage-engine
//!
//! Deterministic differential triage: a pure function of one intake snapshot
//! and one knowledge-base snapshot. No I/O and no logging; callers audit.

pub mod apply;
pub mod communication;
pub mod compose;
pub mod error;
pub mod explain;
pub mod extract;
pub mod fields;
pub mod gaps;
pub mod scoring;

use jiff::Timestamp;
use uuid::Uuid;

use triage_core::models::intake::IntakeSnapshot;
use triage_core::models::triage::{Actor, TriageResult};
use triage_knowledge::KnowledgeBaseView;

pub use apply::{AppliedAction, apply_assistant_action};
pub use communication::draft_patient_message;
pub use error::{ApplyError, TriageError};
pub use explain::{
    explain_anomaly, explain_assistant_action, explain_condition_probability,
    explain_followup_question,
};
pub use extract::EvidenceSet;
pub use fields::{IntakeField, missing_tier1_fields};

/// Run one triage pass.
///
/// Same intake and same knowledge base give the same differential, actions,
/// questions and suggestions; only `triage_id` and `timestamp` differ.
pub fn run(
    view: &dyn KnowledgeBaseView,
    intake: &IntakeSnapshot,
    previous_triage_id: Option<Uuid>,
    requested_by: &Actor,
) -> Result<TriageResult, TriageError> {
    if view.conditions().is_empty() {
        return Err(TriageError::EmptyKnowledgeBase);
    }

    let evidence = EvidenceSet::extract(intake, view);
    let ranked = scoring::ranked_candidates(view, &evidence);
    let differential = scoring::differential(&ranked);
    let gaps = gaps::resolve(view, intake, &evidence);
    let triage_summary = compose::summarize(view, intake, &evidence, &differential);
    let suggestions = compose::suggestions(view, &differential.displayed);

    Ok(TriageResult {
        intake_session_token: intake.session_token.clone(),
        triage_id: Uuid::new_v4(),
        previous_triage_id,
        timestamp: Timestamp::now(),
        requested_by: requested_by.clone(),
        top_5_conditions: differential.displayed,
        suppressed_conditions: differential.suppressed,
        assistant_actions: gaps.assistant_actions,
        followup_questions: gaps.followup_questions,
        triage_summary,
        suggestions,
        wrapup: None,
        patient_communication_draft: None,
        audit_event_id: None,
    })
}
