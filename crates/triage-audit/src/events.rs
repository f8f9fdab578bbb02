use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use triage_core::models::triage::{Actor, ActorType};

/// Event types written by the intake and triage workflow.
pub mod event_type {
    pub const INTAKE_SUBMITTED: &str = "intake_submitted";
    pub const TRIAGE_RUN: &str = "triage_run";
    pub const RE_TRIAGE: &str = "re_triage";
    pub const TRIAGE_FAILED: &str = "triage_failed";
    pub const ASSISTANT_ACTION_APPLY: &str = "assistant_action_apply";
    pub const WRAPUP_FINALIZED: &str = "wrapup_finalized";
    pub const KNOWLEDGE_RELOAD: &str = "knowledge_reload";
}

/// One append-only audit record.
///
/// Every audit event is also emitted through `tracing` when a sink records
/// it, so it shows up in the structured server log as well as the audit file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub audit_event_id: Uuid,
    pub timestamp: Timestamp,
    pub event_type: String,
    pub actor_type: ActorType,
    pub actor_id: Option<String>,
    pub session_token: Option<String>,
    pub patient_id: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl AuditEvent {
    pub fn new(event_type: impl Into<String>, actor: &Actor) -> Self {
        Self {
            audit_event_id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
            event_type: event_type.into(),
            actor_type: actor.actor_type,
            actor_id: actor.actor_id.clone(),
            session_token: None,
            patient_id: None,
            metadata: Map::new(),
        }
    }

    pub fn with_session(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(session_token.into());
        self
    }

    pub fn with_patient(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }

    /// Add one metadata entry. Later values for the same key replace earlier ones.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Emit this audit event via tracing.
    pub fn emit(&self) {
        info!(
            audit.event_id = %self.audit_event_id,
            audit.event_type = %self.event_type,
            audit.actor_type = %self.actor_type,
            audit.actor_id = self.actor_id.as_deref().unwrap_or("-"),
            audit.session_token = self.session_token.as_deref().unwrap_or("-"),
            audit.patient_id = self.patient_id.as_deref().unwrap_or("-"),
            "audit event"
        );
    }
}
