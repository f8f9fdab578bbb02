//! Clinician-facing explanations for a session's scored items.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use triage_core::models::explanation::ConditionExplanation;
use triage_engine::{
    explain_anomaly, explain_assistant_action, explain_condition_probability,
    explain_followup_question,
};

use crate::error::ApiError;
use crate::routes::{load_intake, require_token};
use crate::state::AppState;

#[derive(Serialize)]
pub struct Explanation {
    id: String,
    explanation: String,
}

#[derive(Serialize)]
pub struct AnomalyExplanations {
    session_token: String,
    anomalies: Vec<String>,
}

pub async fn explain_condition(
    State(state): State<AppState>,
    Path((token, condition_id)): Path<(String, String)>,
) -> Result<Json<ConditionExplanation>, ApiError> {
    let intake = load_intake(&state, require_token(&token)?)?;
    let knowledge = state.knowledge.snapshot();
    Ok(Json(explain_condition_probability(
        &*knowledge,
        &intake,
        &condition_id,
    )?))
}

pub async fn explain_anomalies(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<AnomalyExplanations>, ApiError> {
    let intake = load_intake(&state, require_token(&token)?)?;
    let knowledge = state.knowledge.snapshot();
    Ok(Json(AnomalyExplanations {
        anomalies: explain_anomaly(&*knowledge, &intake),
        session_token: intake.session_token,
    }))
}

pub async fn explain_action(
    State(state): State<AppState>,
    Path((token, action_id)): Path<(String, String)>,
) -> Result<Json<Explanation>, ApiError> {
    let intake = load_intake(&state, require_token(&token)?)?;
    let knowledge = state.knowledge.snapshot();
    let explanation = explain_assistant_action(&*knowledge, &intake, &action_id)?;
    Ok(Json(Explanation {
        id: action_id,
        explanation,
    }))
}

pub async fn explain_followup(
    State(state): State<AppState>,
    Path((token, question_id)): Path<(String, String)>,
) -> Result<Json<Explanation>, ApiError> {
    let intake = load_intake(&state, require_token(&token)?)?;
    let knowledge = state.knowledge.snapshot();
    let explanation = explain_followup_question(&*knowledge, &intake, &question_id)?;
    Ok(Json(Explanation {
        id: question_id,
        explanation,
    }))
}
