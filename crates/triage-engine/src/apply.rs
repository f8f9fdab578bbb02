//! Applying a completed assistant action to an intake.
//!
//! An action id resolves to exactly one [`IntakeField`] through a fixed
//! table, the validation checklist, or the `assistant_<field>` naming
//! convention. Nothing else in the intake is reachable.

use jiff::Timestamp;
use serde_json::{Map, Value};

use triage_core::models::intake::{IntakeAuditEntry, IntakeSnapshot, IntakeSource};
use triage_core::models::triage::{Actor, ActorType};
use triage_knowledge::KnowledgeBaseView;

use crate::error::ApplyError;
use crate::fields::{self, IntakeField};
use crate::gaps::action_id_for;

pub const APPLY_EVENT: &str = "assistant_action_apply";

/// What an applied action changed.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedAction {
    pub action_id: String,
    pub field: IntakeField,
    /// The field's value before this action.
    pub previous: Value,
}

/// Find the intake field an assistant action writes.
pub fn resolve_action_field(
    view: &dyn KnowledgeBaseView,
    action_id: &str,
) -> Result<IntakeField, ApplyError> {
    let action_id = action_id.trim();
    if let Some(field) = IntakeField::for_named_action(action_id) {
        return Ok(field);
    }
    if let Some(field) = view
        .validation_checklist()
        .iter()
        .find(|row| action_id_for(row) == action_id)
        .and_then(|row| IntakeField::from_field_id(&row.field_id))
    {
        return Ok(field);
    }
    action_id
        .strip_prefix("assistant_")
        .and_then(IntakeField::from_field_id)
        .ok_or_else(|| ApplyError::UnmappedAction(action_id.to_string()))
}

/// Write the action's inputs into the intake.
///
/// On success the prior value is kept in `overrides` (the first override of
/// a field wins, so the patient's own answer is never lost) and the intake's
/// audit trail gains an entry. On error the intake is left untouched. The
/// caller re-runs triage with the previous triage id afterwards.
pub fn apply_assistant_action(
    view: &dyn KnowledgeBaseView,
    intake: &mut IntakeSnapshot,
    action_id: &str,
    inputs: &Map<String, Value>,
    applied_by: &Actor,
) -> Result<AppliedAction, ApplyError> {
    let field = resolve_action_field(view, action_id)?;
    if !field.is_overridable() {
        return Err(ApplyError::NotOverridable {
            action_id: action_id.to_string(),
            field: field.name().to_string(),
        });
    }

    let ui = view.assistant_action_ui(action_id);
    let keys: Vec<&str> = match ui.map(|u| u.keys()) {
        Some(keys) if !keys.is_empty() => keys,
        _ => field.default_input_keys(),
    };

    if let Some(ui) = ui
        && (ui.min_value.is_some() || ui.max_value.is_some())
    {
        let min = ui.min_value.unwrap_or(f64::NEG_INFINITY);
        let max = ui.max_value.unwrap_or(f64::INFINITY);
        for key in &keys {
            if let Ok(value) = fields::number(inputs, key)
                && !(min..=max).contains(&value)
            {
                return Err(ApplyError::OutOfRange {
                    key: key.to_string(),
                    value,
                    min,
                    max,
                });
            }
        }
    }

    let previous = field.current_value(intake);
    let mut updated = intake.clone();
    field.write(&mut updated, &keys, inputs)?;

    let now = Timestamp::now();
    updated
        .overrides
        .entry(field.name().to_string())
        .or_insert_with(|| previous.clone());
    updated.audit_trail.push(IntakeAuditEntry {
        at: now,
        event_type: APPLY_EVENT.to_string(),
        action_id: action_id.to_string(),
        applied_by: applied_by
            .actor_id
            .clone()
            .unwrap_or_else(|| applied_by.actor_type.to_string()),
        inputs: Value::Object(inputs.clone()),
    });
    updated.last_modified = Some(now);
    updated.source = match applied_by.actor_type {
        ActorType::Clinician => IntakeSource::Clinician,
        ActorType::Patient => IntakeSource::Patient,
        _ => IntakeSource::Staff,
    };
    *intake = updated;

    Ok(AppliedAction {
        action_id: action_id.to_string(),
        field,
        previous,
    })
}
