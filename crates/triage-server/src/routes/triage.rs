use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use triage_audit::{AuditEvent, event_type};
use triage_core::models::intake::IntakeSnapshot;
use triage_core::models::triage::{Actor, ActorType, TriageResult};
use triage_core::session_keys;
use triage_knowledge::KnowledgeIndex;

use crate::error::ApiError;
use crate::routes::{actor, latest_triage, load_intake, require_token};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RunTriageRequest {
    #[serde(alias = "session_token")]
    pub intake_session_token: String,
    #[serde(default)]
    pub actor_type: Option<ActorType>,
    #[serde(default)]
    pub actor_id: Option<String>,
}

pub async fn run_triage(
    State(state): State<AppState>,
    Json(req): Json<RunTriageRequest>,
) -> Result<Json<TriageResult>, ApiError> {
    let token = require_token(&req.intake_session_token)?;
    let requested_by = actor(req.actor_type, req.actor_id, ActorType::Clinician);

    let _guard = state.sessions.lock_session(token).await;
    let intake = load_intake(&state, token)?;
    let knowledge = state.knowledge.snapshot();
    let result = triage_and_record(&state, &knowledge, &intake, &requested_by)?;
    Ok(Json(result))
}

/// Run one pass, audit it, and store it as the session's latest triage.
///
/// Callers hold the session lock, so the previous triage read here is the
/// one this pass supersedes.
pub(crate) fn triage_and_record(
    state: &AppState,
    knowledge: &KnowledgeIndex,
    intake: &IntakeSnapshot,
    requested_by: &Actor,
) -> Result<TriageResult, ApiError> {
    let token = intake.session_token.as_str();
    let previous_triage_id = latest_triage(state, token)?.map(|t| t.triage_id);

    let mut result = match triage_engine::run(knowledge, intake, previous_triage_id, requested_by)
    {
        Ok(result) => result,
        Err(e) => {
            state.audit.record(
                AuditEvent::new(event_type::TRIAGE_FAILED, requested_by)
                    .with_session(token)
                    .with_patient(&intake.patient_id)
                    .with_metadata("error", e.to_string()),
            )?;
            return Err(e.into());
        }
    };

    let kind = if previous_triage_id.is_some() {
        event_type::RE_TRIAGE
    } else {
        event_type::TRIAGE_RUN
    };
    let top_condition_ids: Vec<String> = result
        .top_5_conditions
        .iter()
        .map(|c| c.condition_id.clone())
        .collect();
    let event = AuditEvent::new(kind, requested_by)
        .with_session(token)
        .with_patient(&intake.patient_id)
        .with_metadata("triage_id", result.triage_id.to_string())
        .with_metadata(
            "previous_triage_id",
            previous_triage_id.map(|id| id.to_string()),
        )
        .with_metadata("acuity", result.triage_summary.acuity.to_string())
        .with_metadata("top_condition_ids", top_condition_ids)
        .with_metadata("knowledge_source", knowledge.source());
    result.audit_event_id = Some(state.audit.record(event)?);

    state
        .sessions
        .set(&session_keys::triage(result.triage_id), &result)
        .map_err(ApiError::internal)?;
    state
        .sessions
        .set(&session_keys::latest_triage(token), &result)
        .map_err(ApiError::internal)?;
    Ok(result)
}
