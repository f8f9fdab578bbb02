use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use jiff::Timestamp;
use serde::Serialize;
use uuid::Uuid;

use triage_audit::{AuditEvent, event_type};
use triage_core::models::intake::IntakeSnapshot;
use triage_core::models::triage::{Actor, ActorType};
use triage_core::session_keys;
use triage_engine::missing_tier1_fields;

use crate::error::ApiError;
use crate::routes::{load_intake, require_token};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Accepted,
    Rejected,
}

impl SubmissionStatus {
    fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Serialize)]
pub struct IntakeSubmission {
    session_token: String,
    patient_id: String,
    submitted_at: Timestamp,
    status: SubmissionStatus,
    missing_fields: Vec<&'static str>,
    audit_event_id: Uuid,
}

/// Accept a completed questionnaire for a session.
///
/// Intakes missing tier-1 fields are rejected and not stored; the rejection
/// is still audited. So is a body that does not parse as an intake.
pub async fn submit_intake(
    State(state): State<AppState>,
    Path(token): Path<String>,
    body: Result<Json<IntakeSnapshot>, JsonRejection>,
) -> Result<Json<IntakeSubmission>, ApiError> {
    let token = require_token(&token)?.to_string();
    let mut intake = match body {
        Ok(Json(intake)) => intake,
        Err(rejection) => return Err(unparsed_intake(&state, &token, &rejection)),
    };
    if !intake.session_token.trim().is_empty() && intake.session_token.trim() != token {
        return Err(ApiError::BadRequest(format!(
            "intake belongs to session {}, not {token}",
            intake.session_token.trim()
        )));
    }
    intake.session_token = token.clone();

    let _guard = state.sessions.lock_session(&token).await;
    let submitted_at = Timestamp::now();
    let missing_fields = missing_tier1_fields(&intake);
    let status = if missing_fields.is_empty() {
        intake.submitted_at.get_or_insert(submitted_at);
        state
            .sessions
            .set(&session_keys::intake_session(&token), &intake)
            .map_err(ApiError::internal)?;
        SubmissionStatus::Accepted
    } else {
        SubmissionStatus::Rejected
    };

    let patient = Actor::new(ActorType::Patient, Some(intake.patient_id.clone()));
    let audit_event_id = state.audit.record(
        AuditEvent::new(event_type::INTAKE_SUBMITTED, &patient)
            .with_session(&token)
            .with_patient(&intake.patient_id)
            .with_metadata("submitted_at", submitted_at.to_string())
            .with_metadata("status", status.as_str())
            .with_metadata("missing_fields", missing_fields.clone()),
    )?;

    Ok(Json(IntakeSubmission {
        session_token: token,
        patient_id: intake.patient_id,
        submitted_at,
        status,
        missing_fields,
        audit_event_id,
    }))
}

fn unparsed_intake(state: &AppState, token: &str, rejection: &JsonRejection) -> ApiError {
    let reason = rejection.body_text();
    tracing::warn!(token, %reason, "intake body rejected");
    let recorded = state.audit.record(
        AuditEvent::new(event_type::INTAKE_SUBMITTED, &Actor::new(ActorType::Patient, None))
            .with_session(token)
            .with_metadata("submitted_at", Timestamp::now().to_string())
            .with_metadata("status", SubmissionStatus::Rejected.as_str())
            .with_metadata("error", reason.clone()),
    );
    match recorded {
        Ok(_) => ApiError::BadRequest(reason),
        Err(err) => err.into(),
    }
}

pub async fn get_intake(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<IntakeSnapshot>, ApiError> {
    Ok(Json(load_intake(&state, require_token(&token)?)?))
}
