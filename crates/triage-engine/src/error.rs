use thiserror::Error;

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("knowledge base has no conditions to score against")]
    EmptyKnowledgeBase,

    #[error("unknown condition: {0}")]
    UnknownCondition(String),

    #[error("no pending assistant action '{0}' for this intake")]
    UnknownAction(String),

    #[error("no pending follow-up question '{0}' for this intake")]
    UnknownQuestion(String),

    #[error(transparent)]
    Apply(#[from] ApplyError),
}

/// Reasons an assistant action cannot be applied to an intake.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("assistant action '{0}' is not mapped to an intake field")]
    UnmappedAction(String),

    #[error("intake field '{field}' cannot be overridden by assistant action '{action_id}'")]
    NotOverridable { action_id: String, field: String },

    #[error("missing input '{0}'")]
    MissingInput(String),

    #[error("invalid input '{key}': {reason}")]
    InvalidInput { key: String, reason: String },

    #[error("input '{key}' = {value} is outside [{min}, {max}]")]
    OutOfRange {
        key: String,
        value: f64,
        min: f64,
        max: f64,
    },
}
