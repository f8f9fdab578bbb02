use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use triage_audit::{AuditEvent, event_type};
use triage_core::models::triage::ActorType;
use triage_core::models::wrapup::WrapUpPlan;
use triage_core::session_keys;
use triage_engine::draft_patient_message;
use triage_knowledge::KnowledgeBaseView;

use crate::error::ApiError;
use crate::routes::{actor, latest_triage, load_intake, require_token};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct WrapUpRequest {
    pub plan: WrapUpPlan,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub actor_id: Option<String>,
}

#[derive(Serialize)]
pub struct WrapUpResponse {
    triage_id: Uuid,
    wrapup: WrapUpPlan,
    patient_communication_draft: String,
    audit_event_id: Uuid,
}

/// Attach the clinician's plan to the latest triage and draft the patient
/// message from it.
pub async fn finalize_wrapup(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(req): Json<WrapUpRequest>,
) -> Result<Json<WrapUpResponse>, ApiError> {
    let token = require_token(&token)?;
    let clinician = actor(Some(ActorType::Clinician), req.actor_id, ActorType::Clinician);

    let _guard = state.sessions.lock_session(token).await;
    let intake = load_intake(&state, token)?;
    let mut triage = latest_triage(&state, token)?
        .ok_or_else(|| ApiError::NotFound(format!("no triage result for session {token}")))?;

    let knowledge = state.knowledge.snapshot();
    if let Some(id) = req.plan.final_diagnosis_id.as_deref()
        && knowledge.condition(id).is_none()
    {
        return Err(ApiError::BadRequest(format!("unknown final diagnosis: {id}")));
    }

    let draft = draft_patient_message(
        &req.plan,
        &*knowledge,
        req.patient_name.as_deref().unwrap_or_default(),
    );
    let audit_event_id = state.audit.record(
        AuditEvent::new(event_type::WRAPUP_FINALIZED, &clinician)
            .with_session(token)
            .with_patient(&intake.patient_id)
            .with_metadata("triage_id", triage.triage_id.to_string())
            .with_metadata("final_diagnosis_id", req.plan.final_diagnosis_id.clone()),
    )?;

    triage.wrapup = Some(req.plan.clone());
    triage.patient_communication_draft = Some(draft.clone());
    state
        .sessions
        .set(&session_keys::wrapup(token), &req.plan)
        .map_err(ApiError::internal)?;
    state
        .sessions
        .set(&session_keys::triage(triage.triage_id), &triage)
        .map_err(ApiError::internal)?;
    state
        .sessions
        .set(&session_keys::latest_triage(token), &triage)
        .map_err(ApiError::internal)?;

    Ok(Json(WrapUpResponse {
        triage_id: triage.triage_id,
        wrapup: req.plan,
        patient_communication_draft: draft,
        audit_event_id,
    }))
}
