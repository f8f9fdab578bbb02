//! triage-core
//!
//! Pure domain types for clinic intake triage and session-store key conventions.
//! No I/O; this is the shared vocabulary of the intake system.

pub mod error;
pub mod models;
pub mod session_keys;
