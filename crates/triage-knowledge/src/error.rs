use std::path::PathBuf;

use thiserror::Error;

/// Failures building the knowledge base. All of them are fatal for triage.
#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("required knowledge table missing: {0}")]
    MissingTable(String),

    #[error("required graph relationship missing: {0}")]
    MissingRelationship(String),

    #[error("malformed knowledge table '{table}': {source}")]
    MalformedTable {
        table: String,
        source: serde_json::Error,
    },

    #[error("invalid support weight {weight} for '{source_id}' -> '{condition_id}'")]
    InvalidWeight {
        condition_id: String,
        source_id: String,
        weight: f64,
    },

    #[error("knowledge base contains no conditions")]
    NoConditions,

    #[error("unknown knowledge backend: {0}")]
    UnknownBackend(String),

    #[error("failed to read knowledge pack at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
