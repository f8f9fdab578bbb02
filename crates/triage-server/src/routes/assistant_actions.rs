use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use triage_audit::{AuditEvent, event_type};
use triage_core::models::triage::{ActorType, TriageResult};
use triage_core::session_keys;
use triage_engine::{apply_assistant_action, missing_tier1_fields};

use crate::error::ApiError;
use crate::routes::triage::triage_and_record;
use crate::routes::{actor, load_intake, require_token};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ApplyActionRequest {
    pub intake_session_token: String,
    pub action_id: String,
    #[serde(default)]
    pub inputs: Map<String, Value>,
    pub applied_by: String,
    #[serde(default)]
    pub actor_type: Option<ActorType>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct ApplyActionResponse {
    action_id: String,
    field: String,
    applied: bool,
    re_triage_triggered: bool,
    triage_id: Uuid,
    missing_fields: Vec<&'static str>,
    audit_event_id: Uuid,
    triage: TriageResult,
}

/// Apply a completed assistant action, then re-triage the session.
pub async fn apply_action(
    State(state): State<AppState>,
    Json(req): Json<ApplyActionRequest>,
) -> Result<Json<ApplyActionResponse>, ApiError> {
    let token = require_token(&req.intake_session_token)?;
    let applied_by = actor(req.actor_type, Some(req.applied_by), ActorType::Staff);

    let _guard = state.sessions.lock_session(token).await;
    let mut intake = load_intake(&state, token)?;
    let knowledge = state.knowledge.snapshot();

    let applied = apply_assistant_action(
        &*knowledge,
        &mut intake,
        &req.action_id,
        &req.inputs,
        &applied_by,
    )?;
    state
        .sessions
        .set(&session_keys::intake_session(token), &intake)
        .map_err(ApiError::internal)?;

    let audit_event_id = state.audit.record(
        AuditEvent::new(event_type::ASSISTANT_ACTION_APPLY, &applied_by)
            .with_session(token)
            .with_patient(&intake.patient_id)
            .with_metadata("action_id", applied.action_id.clone())
            .with_metadata("field", applied.field.name())
            .with_metadata("inputs", Value::Object(req.inputs))
            .with_metadata("notes", req.notes),
    )?;

    let triage = triage_and_record(&state, &knowledge, &intake, &applied_by)?;
    Ok(Json(ApplyActionResponse {
        action_id: applied.action_id,
        field: applied.field.name().to_string(),
        applied: true,
        re_triage_triggered: true,
        triage_id: triage.triage_id,
        missing_fields: missing_tier1_fields(&intake),
        audit_event_id,
        triage,
    }))
}
