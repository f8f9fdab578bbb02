use std::sync::Arc;

use eyre::WrapErr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use triage_audit::JsonlAuditLog;
use triage_knowledge::KnowledgeBase;
use triage_server::{AppState, ServerConfig, SessionStore, app};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ServerConfig::from_env()?;

    // A pack that fails to load is fatal: there is nothing to score against.
    let knowledge = KnowledgeBase::load(config.knowledge_backend.source(&config.knowledge_pack))
        .wrap_err_with(|| {
            format!(
                "failed to load knowledge pack {}",
                config.knowledge_pack.display()
            )
        })?;
    tracing::info!(
        source = knowledge.source_name(),
        path = %config.knowledge_pack.display(),
        "knowledge pack loaded"
    );

    let state = AppState {
        knowledge: Arc::new(knowledge),
        sessions: Arc::new(SessionStore::new(config.session_ttl)),
        audit: Arc::new(JsonlAuditLog::new(&config.audit_log, config.audit_immutable)),
    };

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .wrap_err_with(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "triage server listening");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
