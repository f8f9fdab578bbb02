//! triage-audit
//!
//! Append-only audit trail for the intake and triage workflow. The engine
//! never audits itself; the server records one event per triage pass,
//! assistant action, wrap-up and knowledge reload.

pub mod error;
pub mod events;
pub mod sink;

pub use error::AuditError;
pub use events::{AuditEvent, event_type};
pub use sink::{AuditSink, JsonlAuditLog, MemoryAuditLog};
