//! Session-store key conventions.
//!
//! Pure string functions. These define the canonical layout of entries in
//! the key/value session store shared by the intake and triage routes.

use uuid::Uuid;

pub fn intake_session(token: &str) -> String {
    format!("intake_session:{token}")
}

pub fn latest_triage(token: &str) -> String {
    format!("intake_session:{token}:latest_triage")
}

pub fn triage(id: Uuid) -> String {
    format!("triage:{id}")
}

pub fn wrapup(token: &str) -> String {
    format!("intake_session:{token}:wrapup")
}
