use std::collections::{BTreeMap, HashMap};

use jiff::Timestamp;

use triage_core::models::knowledge::{
    AssistantActionRow, AssistantActionUiRow, CatalogRow, ChecklistRow, ConditionRow, LinkType,
    RedFlagRow, SupportSource, SymptomRow, TemplateRow, VitalRuleRow,
};

use crate::error::KnowledgeBaseError;
use crate::tables::KnowledgeTables;

/// One weighted support edge of a condition, in knowledge-pack order.
#[derive(Debug, Clone, PartialEq)]
pub struct Support {
    pub source: SupportSource,
    pub source_id: String,
    pub weight: f64,
    pub notes: Option<String>,
}

/// Read-only lookups the triage engine scores against.
///
/// Missing keys answer with an empty slice or `None`; callers never need to
/// distinguish "unknown condition" from "condition without supports".
pub trait KnowledgeBaseView: Send + Sync {
    /// All conditions, sorted by `condition_id`.
    fn conditions(&self) -> &[ConditionRow];
    fn condition(&self, condition_id: &str) -> Option<&ConditionRow>;
    fn supports(&self, condition_id: &str) -> &[Support];
    fn condition_red_flags(&self, condition_id: &str) -> &[String];
    /// Red flags that should be asked about when this symptom is present.
    fn red_flags_for_symptom(&self, symptom_id: &str) -> &[String];
    fn red_flag(&self, red_flag_id: &str) -> Option<&RedFlagRow>;
    fn symptom(&self, symptom_id: &str) -> Option<&SymptomRow>;
    fn vital_rules(&self) -> &[VitalRuleRow];
    /// Target ids linked to a condition, in knowledge-pack order.
    fn linked(&self, condition_id: &str, link_type: LinkType) -> &[String];
    fn catalog_entry(&self, link_type: LinkType, id: &str) -> Option<&CatalogRow>;
    fn template(&self, template_id: &str) -> Option<&TemplateRow>;
    fn assistant_action(&self, action_id: &str) -> Option<&AssistantActionRow>;
    fn assistant_action_ui(&self, action_id: &str) -> Option<&AssistantActionUiRow>;
    fn validation_checklist(&self) -> &[ChecklistRow];
}

/// Indices built once per load from [`KnowledgeTables`].
#[derive(Debug, Clone)]
pub struct KnowledgeIndex {
    loaded_at: Timestamp,
    source: &'static str,
    conditions: Vec<ConditionRow>,
    condition_pos: HashMap<String, usize>,
    supports: HashMap<String, Vec<Support>>,
    condition_red_flags: HashMap<String, Vec<String>>,
    symptom_red_flags: HashMap<String, Vec<String>>,
    red_flags: HashMap<String, RedFlagRow>,
    symptoms: HashMap<String, SymptomRow>,
    vital_rules: Vec<VitalRuleRow>,
    links: HashMap<(String, LinkType), Vec<String>>,
    catalog: HashMap<(LinkType, String), CatalogRow>,
    templates: HashMap<String, TemplateRow>,
    assistant_actions: HashMap<String, AssistantActionRow>,
    assistant_action_ui: HashMap<String, AssistantActionUiRow>,
    checklist: Vec<ChecklistRow>,
}

impl KnowledgeIndex {
    /// Build every index from raw tables.
    ///
    /// References to unknown conditions, symptoms or red flags are dropped
    /// with a warning. Negative or non-finite weights are rejected outright.
    pub fn build(tables: KnowledgeTables) -> Result<Self, KnowledgeBaseError> {
        Self::build_from("memory", tables)
    }

    pub(crate) fn build_from(
        source: &'static str,
        tables: KnowledgeTables,
    ) -> Result<Self, KnowledgeBaseError> {
        let KnowledgeTables {
            mut conditions,
            symptoms,
            supports: support_rows,
            red_flags: red_flag_rows,
            condition_red_flags: condition_red_flag_rows,
            condition_links,
            vital_rules,
            labs,
            specialists,
            medications,
            actions,
            guides,
            templates,
            assistant_actions,
            assistant_action_ui_map,
            clinician_validation_checklist,
        } = tables;

        if conditions.is_empty() {
            return Err(KnowledgeBaseError::NoConditions);
        }
        conditions.sort_by(|a, b| a.condition_id.cmp(&b.condition_id));
        conditions.dedup_by(|a, b| a.condition_id == b.condition_id);
        let condition_pos: HashMap<String, usize> = conditions
            .iter()
            .enumerate()
            .map(|(i, c)| (c.condition_id.clone(), i))
            .collect();

        let symptoms: HashMap<String, SymptomRow> = symptoms
            .into_iter()
            .map(|s| (s.symptom_id.clone(), s))
            .collect();

        let mut supports: HashMap<String, Vec<Support>> = HashMap::new();
        for row in support_rows {
            if !row.weight.is_finite() || row.weight < 0.0 {
                return Err(KnowledgeBaseError::InvalidWeight {
                    condition_id: row.condition_id,
                    source_id: row.from_id,
                    weight: row.weight,
                });
            }
            if !condition_pos.contains_key(&row.condition_id) {
                tracing::warn!(
                    condition_id = %row.condition_id,
                    source_id = %row.from_id,
                    "support references unknown condition"
                );
                continue;
            }
            supports.entry(row.condition_id).or_default().push(Support {
                source: row.from_type,
                source_id: row.from_id,
                weight: row.weight,
                notes: row.notes,
            });
        }

        let mut symptom_red_flags: HashMap<String, Vec<String>> = HashMap::new();
        for flag in &red_flag_rows {
            for symptom_id in &flag.symptom_ids {
                let entry = symptom_red_flags.entry(symptom_id.clone()).or_default();
                if !entry.contains(&flag.red_flag_id) {
                    entry.push(flag.red_flag_id.clone());
                }
            }
        }
        let red_flags: HashMap<String, RedFlagRow> = red_flag_rows
            .into_iter()
            .map(|f| (f.red_flag_id.clone(), f))
            .collect();

        let mut condition_red_flags: HashMap<String, Vec<String>> = HashMap::new();
        for row in condition_red_flag_rows {
            if !condition_pos.contains_key(&row.condition_id)
                || !red_flags.contains_key(&row.red_flag_id)
            {
                tracing::warn!(
                    condition_id = %row.condition_id,
                    red_flag_id = %row.red_flag_id,
                    "dropping dangling condition red flag"
                );
                continue;
            }
            let entry = condition_red_flags.entry(row.condition_id).or_default();
            if !entry.contains(&row.red_flag_id) {
                entry.push(row.red_flag_id);
            }
        }

        let mut links: HashMap<(String, LinkType), Vec<String>> = HashMap::new();
        for row in condition_links {
            if !condition_pos.contains_key(&row.condition_id) {
                tracing::warn!(
                    condition_id = %row.condition_id,
                    target_id = %row.target_id,
                    "dropping link from unknown condition"
                );
                continue;
            }
            links
                .entry((row.condition_id, row.link_type))
                .or_default()
                .push(row.target_id);
        }

        let mut catalog = HashMap::new();
        for (link_type, rows) in [
            (LinkType::Lab, labs),
            (LinkType::Referral, specialists),
            (LinkType::Medication, medications),
            (LinkType::Action, actions),
            (LinkType::Guide, guides),
        ] {
            for row in rows {
                catalog.insert((link_type, row.id.clone()), row);
            }
        }

        let index = Self {
            loaded_at: Timestamp::now(),
            source,
            conditions,
            condition_pos,
            supports,
            condition_red_flags,
            symptom_red_flags,
            red_flags,
            symptoms,
            vital_rules,
            links,
            catalog,
            templates: templates
                .into_iter()
                .map(|t| (t.template_id.clone(), t))
                .collect(),
            assistant_actions: assistant_actions
                .into_iter()
                .map(|a| (a.assistant_action_id.clone(), a))
                .collect(),
            assistant_action_ui: assistant_action_ui_map
                .into_iter()
                .map(|u| (u.assistant_action_id.clone(), u))
                .collect(),
            checklist: clinician_validation_checklist,
        };

        tracing::info!(
            source,
            conditions = index.conditions.len(),
            red_flags = index.red_flags.len(),
            checklist = index.checklist.len(),
            "knowledge index built"
        );
        Ok(index)
    }

    pub fn loaded_at(&self) -> Timestamp {
        self.loaded_at
    }

    /// Name of the backend this index was loaded from.
    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Condition count per severity bucket, for the health endpoint.
    pub fn severity_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for c in &self.conditions {
            let bucket = c.severity.clone().unwrap_or_else(|| "unspecified".to_string());
            *counts.entry(bucket).or_insert(0) += 1;
        }
        counts
    }
}

impl KnowledgeBaseView for KnowledgeIndex {
    fn conditions(&self) -> &[ConditionRow] {
        &self.conditions
    }

    fn condition(&self, condition_id: &str) -> Option<&ConditionRow> {
        self.condition_pos
            .get(condition_id)
            .and_then(|&i| self.conditions.get(i))
    }

    fn supports(&self, condition_id: &str) -> &[Support] {
        self.supports.get(condition_id).map_or(&[], Vec::as_slice)
    }

    fn condition_red_flags(&self, condition_id: &str) -> &[String] {
        self.condition_red_flags
            .get(condition_id)
            .map_or(&[], Vec::as_slice)
    }

    fn red_flags_for_symptom(&self, symptom_id: &str) -> &[String] {
        self.symptom_red_flags
            .get(symptom_id)
            .map_or(&[], Vec::as_slice)
    }

    fn red_flag(&self, red_flag_id: &str) -> Option<&RedFlagRow> {
        self.red_flags.get(red_flag_id)
    }

    fn symptom(&self, symptom_id: &str) -> Option<&SymptomRow> {
        self.symptoms.get(symptom_id)
    }

    fn vital_rules(&self) -> &[VitalRuleRow] {
        &self.vital_rules
    }

    fn linked(&self, condition_id: &str, link_type: LinkType) -> &[String] {
        self.links
            .get(&(condition_id.to_string(), link_type))
            .map_or(&[], Vec::as_slice)
    }

    fn catalog_entry(&self, link_type: LinkType, id: &str) -> Option<&CatalogRow> {
        self.catalog.get(&(link_type, id.to_string()))
    }

    fn template(&self, template_id: &str) -> Option<&TemplateRow> {
        self.templates.get(template_id)
    }

    fn assistant_action(&self, action_id: &str) -> Option<&AssistantActionRow> {
        self.assistant_actions.get(action_id)
    }

    fn assistant_action_ui(&self, action_id: &str) -> Option<&AssistantActionUiRow> {
        self.assistant_action_ui.get(action_id)
    }

    fn validation_checklist(&self) -> &[ChecklistRow] {
        &self.checklist
    }
}
