use std::sync::Arc;

use triage_audit::AuditSink;
use triage_knowledge::KnowledgeBase;

use crate::session::SessionStore;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub knowledge: Arc<KnowledgeBase>,
    pub sessions: Arc<SessionStore>,
    pub audit: Arc<dyn AuditSink>,
}
