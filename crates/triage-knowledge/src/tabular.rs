//! Tabular knowledge pack: one JSON workbook whose top-level keys are sheet
//! names and whose values are arrays of row objects.

use std::path::PathBuf;

use serde::de::{DeserializeOwned, Error as _};
use serde_json::{Map, Value};

use crate::KnowledgeSource;
use crate::error::KnowledgeBaseError;
use crate::tables::{KnowledgeTables, REQUIRED_TABLES, parse_rows, table};

/// A workbook exported from the clinical knowledge spreadsheet.
#[derive(Debug, Clone)]
pub struct TabularPack {
    path: PathBuf,
}

impl TabularPack {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl KnowledgeSource for TabularPack {
    fn name(&self) -> &'static str {
        "tabular"
    }

    fn load_tables(&self) -> Result<KnowledgeTables, KnowledgeBaseError> {
        let raw = std::fs::read(&self.path).map_err(|source| KnowledgeBaseError::Io {
            path: self.path.clone(),
            source,
        })?;
        let workbook: Value = serde_json::from_slice(&raw)?;
        let tables = workbook_tables(workbook)?;
        tracing::info!(
            path = %self.path.display(),
            conditions = tables.conditions.len(),
            supports = tables.supports.len(),
            "loaded tabular knowledge pack"
        );
        Ok(tables)
    }
}

/// Split a workbook value into typed tables. Every sheet in
/// [`REQUIRED_TABLES`] must be present; the rest default to empty.
pub fn workbook_tables(workbook: Value) -> Result<KnowledgeTables, KnowledgeBaseError> {
    let Value::Object(mut sheets) = workbook else {
        return Err(KnowledgeBaseError::MalformedTable {
            table: "workbook".to_string(),
            source: serde_json::Error::custom("workbook must be a JSON object of sheets"),
        });
    };

    if let Some(missing) = REQUIRED_TABLES.iter().find(|name| !sheets.contains_key(**name)) {
        return Err(KnowledgeBaseError::MissingTable(missing.to_string()));
    }

    Ok(KnowledgeTables {
        conditions: sheet(&mut sheets, table::CONDITIONS)?,
        symptoms: sheet(&mut sheets, table::SYMPTOMS)?,
        supports: sheet(&mut sheets, table::SUPPORTS)?,
        red_flags: sheet(&mut sheets, table::RED_FLAGS)?,
        condition_red_flags: sheet(&mut sheets, table::CONDITION_RED_FLAGS)?,
        condition_links: sheet(&mut sheets, table::CONDITION_LINKS)?,
        vital_rules: sheet(&mut sheets, table::VITAL_RULES)?,
        labs: sheet(&mut sheets, table::LABS)?,
        specialists: sheet(&mut sheets, table::SPECIALISTS)?,
        medications: sheet(&mut sheets, table::MEDICATIONS)?,
        actions: sheet(&mut sheets, table::ACTIONS)?,
        guides: sheet(&mut sheets, table::GUIDES)?,
        templates: sheet(&mut sheets, table::TEMPLATES)?,
        assistant_actions: sheet(&mut sheets, table::ASSISTANT_ACTIONS)?,
        assistant_action_ui_map: sheet(&mut sheets, table::ASSISTANT_ACTION_UI_MAP)?,
        clinician_validation_checklist: sheet(&mut sheets, table::VALIDATION_CHECKLIST)?,
    })
}

fn sheet<T: DeserializeOwned>(
    sheets: &mut Map<String, Value>,
    name: &str,
) -> Result<Vec<T>, KnowledgeBaseError> {
    match sheets.remove(name) {
        Some(rows) => parse_rows(name, rows),
        None => Ok(Vec::new()),
    }
}
