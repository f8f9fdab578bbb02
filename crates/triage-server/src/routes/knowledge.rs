use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use triage_audit::{AuditEvent, event_type};
use triage_core::models::triage::ActorType;
use triage_knowledge::KnowledgeBaseView;

use crate::error::ApiError;
use crate::routes::actor;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ReloadQuery {
    #[serde(default)]
    pub actor_id: Option<String>,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    knowledge_source: &'static str,
    condition_count: usize,
    loaded_at: Timestamp,
    audit_event_id: Uuid,
}

/// Re-read the knowledge pack and swap it in. A failed reload keeps the
/// current pack and is audited as well.
pub async fn reload(
    State(state): State<AppState>,
    Query(query): Query<ReloadQuery>,
) -> Result<Json<ReloadResponse>, ApiError> {
    let admin = actor(Some(ActorType::Admin), query.actor_id, ActorType::Admin);
    let knowledge = Arc::clone(&state.knowledge);
    let outcome = tokio::task::spawn_blocking(move || knowledge.reload())
        .await
        .map_err(ApiError::internal)?;

    let event = AuditEvent::new(event_type::KNOWLEDGE_RELOAD, &admin)
        .with_metadata("source", state.knowledge.source_name());
    let index = match outcome {
        Ok(index) => index,
        Err(e) => {
            state.audit.record(
                event
                    .with_metadata("status", "failed")
                    .with_metadata("error", e.to_string()),
            )?;
            return Err(e.into());
        }
    };

    let severity_counts =
        serde_json::to_value(index.severity_counts()).map_err(ApiError::internal)?;
    let audit_event_id = state.audit.record(
        event
            .with_metadata("status", "reloaded")
            .with_metadata("condition_count", index.conditions().len())
            .with_metadata("severity_counts", severity_counts),
    )?;
    Ok(Json(ReloadResponse {
        knowledge_source: index.source(),
        condition_count: index.conditions().len(),
        loaded_at: index.loaded_at(),
        audit_event_id,
    }))
}
