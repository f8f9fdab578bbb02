use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use eyre::WrapErr;

use triage_knowledge::Backend;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_KNOWLEDGE_PACK: &str = "data/knowledge_pack.json";
pub const DEFAULT_AUDIT_LOG: &str = "audit.jsonl";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Server settings, read once at startup from `TRIAGE_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub knowledge_pack: PathBuf,
    pub knowledge_backend: Backend,
    pub audit_log: PathBuf,
    /// Refuse to clear the audit log. On unless explicitly turned off.
    pub audit_immutable: bool,
    pub session_ttl: Duration,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset and blank values take the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("TRIAGE_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse()
            .wrap_err("TRIAGE_BIND_ADDR is not a socket address")?;
        let knowledge_backend = match get("TRIAGE_KNOWLEDGE_BACKEND") {
            Some(name) => name.parse().wrap_err("TRIAGE_KNOWLEDGE_BACKEND")?,
            None => Backend::Tabular,
        };
        let session_ttl_secs = match get("TRIAGE_SESSION_TTL_SECS") {
            Some(secs) => secs
                .trim()
                .parse()
                .wrap_err("TRIAGE_SESSION_TTL_SECS must be a whole number of seconds")?,
            None => DEFAULT_SESSION_TTL_SECS,
        };
        let audit_immutable = match get("TRIAGE_AUDIT_IMMUTABLE") {
            Some(flag) => !matches!(flag.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"),
            None => true,
        };

        Ok(Self {
            bind_addr,
            knowledge_pack: get("TRIAGE_KNOWLEDGE_PACK")
                .unwrap_or_else(|| DEFAULT_KNOWLEDGE_PACK.to_string())
                .into(),
            knowledge_backend,
            audit_log: get("TRIAGE_AUDIT_LOG")
                .unwrap_or_else(|| DEFAULT_AUDIT_LOG.to_string())
                .into(),
            audit_immutable,
            session_ttl: Duration::from_secs(session_ttl_secs),
        })
    }
}
