pub mod explanation;
pub mod intake;
pub mod knowledge;
pub mod triage;
pub mod wrapup;
