use axum::Json;
use axum::extract::State;
use jiff::Timestamp;
use serde::Serialize;

use triage_knowledge::KnowledgeBaseView;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    knowledge_source: &'static str,
    condition_count: usize,
    knowledge_loaded_at: Timestamp,
}

pub async fn health_check(State(state): State<AppState>) -> Json<Health> {
    let knowledge = state.knowledge.snapshot();
    Json(Health {
        status: "ok",
        knowledge_source: knowledge.source(),
        condition_count: knowledge.conditions().len(),
        knowledge_loaded_at: knowledge.loaded_at(),
    })
}
