pub mod assistant_actions;
pub mod explain;
pub mod health;
pub mod intake;
pub mod knowledge;
pub mod triage;
pub mod wrapup;

use triage_core::models::intake::IntakeSnapshot;
use triage_core::models::triage::{Actor, ActorType, TriageResult};
use triage_core::session_keys;

use crate::error::ApiError;
use crate::state::AppState;

/// The accepted intake stored for a session.
pub(crate) fn load_intake(state: &AppState, token: &str) -> Result<IntakeSnapshot, ApiError> {
    state
        .sessions
        .get(&session_keys::intake_session(token))
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound(format!("no intake data for session {token}")))
}

pub(crate) fn latest_triage(
    state: &AppState,
    token: &str,
) -> Result<Option<TriageResult>, ApiError> {
    state
        .sessions
        .get(&session_keys::latest_triage(token))
        .map_err(ApiError::internal)
}

pub(crate) fn require_token(token: &str) -> Result<&str, ApiError> {
    match token.trim() {
        "" => Err(ApiError::BadRequest("missing intake_session_token".to_string())),
        token => Ok(token),
    }
}

pub(crate) fn actor(
    actor_type: Option<ActorType>,
    actor_id: Option<String>,
    default: ActorType,
) -> Actor {
    Actor::new(
        actor_type.unwrap_or(default),
        actor_id.filter(|id| !id.trim().is_empty()),
    )
}
