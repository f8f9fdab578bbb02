//! Feature extraction: one intake snapshot in, one flat evidence set out.
//!
//! Extraction never fails. Records that cannot be read are skipped and
//! reported as [`Anomaly`] entries so the rest of the intake still scores.

use std::collections::{BTreeMap, BTreeSet};

use serde::de::DeserializeOwned;

use triage_core::models::explanation::{Anomaly, AnomalyKind};
use triage_core::models::intake::{Entry, IntakeSnapshot};
use triage_knowledge::{KnowledgeBaseView, Support};

/// Social-history answers at or above this many declines form an anomaly.
const PREFER_NOT_TO_SAY_CLUSTER: usize = 2;

/// One issue card, reduced to the descriptors scoring and explanations read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueFinding {
    pub region_id: String,
    pub description: String,
    pub pain_score: Option<u32>,
    pub onset: Option<String>,
    pub course: Option<String>,
}

/// Everything one scoring pass reads from the intake. Built once per pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvidenceSet {
    pub present_symptoms: BTreeSet<String>,
    /// Vital-sign rules that fired against the recorded vitals.
    pub vital_findings: BTreeSet<String>,
    /// Only red flags that were explicitly answered.
    pub red_flag_answers: BTreeMap<String, bool>,
    pub pmh: BTreeSet<String>,
    pub issue_findings: Vec<IssueFinding>,
    pub medications: BTreeSet<String>,
    pub allergies: BTreeSet<String>,
    pub vitals_complete: bool,
    pub anomalies: Vec<Anomaly>,
}

impl EvidenceSet {
    pub fn extract(intake: &IntakeSnapshot, view: &dyn KnowledgeBaseView) -> Self {
        let mut evidence = EvidenceSet::default();
        evidence.collect_symptoms(intake);
        evidence.collect_red_flags(intake);
        evidence.collect_history(intake);
        evidence.collect_issues(intake);
        evidence.collect_vitals(intake, view);
        evidence.check_prefer_not_to_say(intake);
        evidence
    }

    /// Whether a support edge is satisfied by this evidence.
    pub fn matches(&self, support: &Support) -> bool {
        self.present_symptoms.contains(&support.source_id)
            || self.vital_findings.contains(&support.source_id)
    }

    pub fn red_flag_present(&self, red_flag_id: &str) -> bool {
        self.red_flag_answers.get(red_flag_id) == Some(&true)
    }

    /// Red flags answered present, in id order.
    pub fn present_red_flags(&self) -> Vec<&str> {
        self.red_flag_answers
            .iter()
            .filter(|(_, present)| **present)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    fn collect_symptoms(&mut self, intake: &IntakeSnapshot) {
        let mut answered: BTreeMap<&str, bool> = BTreeMap::new();
        for (i, entry) in self.readable(&intake.symptoms, "symptoms") {
            let id = entry.symptom_id.trim();
            if id.is_empty() {
                self.anomaly(
                    AnomalyKind::MalformedEntry,
                    "symptom entry has no symptom_id",
                    Some(format!("symptoms[{i}]")),
                );
                continue;
            }
            let Some(present) = entry.present else {
                continue;
            };
            if let Some(previous) = answered.insert(id, present)
                && previous != present
            {
                self.anomaly(
                    AnomalyKind::Contradiction,
                    format!("symptom '{id}' answered both present and absent"),
                    Some(format!("symptoms[{i}]")),
                );
            }
            if present {
                self.present_symptoms.insert(id.to_string());
            }
        }

        for (id, ros_present) in &intake.ros {
            if let Some(&checklist) = answered.get(id.as_str())
                && checklist != *ros_present
            {
                self.anomaly(
                    AnomalyKind::Contradiction,
                    format!(
                        "symptom '{id}' is {} on the checklist but {} in review of systems",
                        if checklist { "present" } else { "absent" },
                        if *ros_present { "present" } else { "absent" },
                    ),
                    Some(format!("ros.{id}")),
                );
            }
        }
    }

    fn collect_red_flags(&mut self, intake: &IntakeSnapshot) {
        for (i, answer) in self.readable(&intake.red_flags, "red_flags") {
            let id = answer.red_flag_id.trim();
            if id.is_empty() {
                self.anomaly(
                    AnomalyKind::MalformedEntry,
                    "red-flag answer has no red_flag_id",
                    Some(format!("red_flags[{i}]")),
                );
                continue;
            }
            let Some(present) = answer.present else {
                continue;
            };
            match self.red_flag_answers.get(id).copied() {
                Some(previous) if previous != present => {
                    self.anomaly(
                        AnomalyKind::Contradiction,
                        format!("red flag '{id}' answered both present and absent"),
                        Some(format!("red_flags[{i}]")),
                    );
                    // A positive answer is never overwritten by a negative one.
                    self.red_flag_answers.insert(id.to_string(), true);
                }
                _ => {
                    self.red_flag_answers.insert(id.to_string(), present);
                }
            }
        }
    }

    fn collect_history(&mut self, intake: &IntakeSnapshot) {
        self.pmh = intake
            .pmh
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();

        for (i, med) in self.readable(&intake.medications, "medications") {
            let name = med.med_name.trim();
            if name.is_empty() {
                self.anomaly(
                    AnomalyKind::MalformedEntry,
                    "medication entry has no name",
                    Some(format!("medications[{i}]")),
                );
                continue;
            }
            self.medications.insert(name.to_string());
        }

        for (i, allergy) in self.readable(&intake.allergies, "allergies") {
            let allergen = allergy.allergen.trim();
            if allergen.is_empty() {
                self.anomaly(
                    AnomalyKind::MalformedEntry,
                    "allergy entry has no allergen",
                    Some(format!("allergies[{i}]")),
                );
                continue;
            }
            self.allergies.insert(allergen.to_string());
        }
    }

    fn collect_issues(&mut self, intake: &IntakeSnapshot) {
        for (i, card) in self.readable(&intake.issue_cards, "issue_cards") {
            if card.region_id.trim().is_empty() && card.description.trim().is_empty() {
                self.anomaly(
                    AnomalyKind::MalformedEntry,
                    "issue card has neither region nor description",
                    Some(format!("issue_cards[{i}]")),
                );
                continue;
            }
            let pain_score = match card.pain_score {
                Some(score) if score > 10 => {
                    self.anomaly(
                        AnomalyKind::MalformedEntry,
                        format!("pain score {score} is outside 0-10"),
                        Some(format!("issue_cards[{i}].pain_score")),
                    );
                    None
                }
                other => other,
            };
            self.issue_findings.push(IssueFinding {
                region_id: card.region_id.trim().to_string(),
                description: card.description.trim().to_string(),
                pain_score,
                onset: card.onset.clone(),
                course: card.course.clone(),
            });
        }
    }

    fn collect_vitals(&mut self, intake: &IntakeSnapshot, view: &dyn KnowledgeBaseView) {
        let vitals = &intake.vitals;
        self.vitals_complete = vitals.is_complete();
        if !self.vitals_complete {
            let detail = if vitals.is_empty() {
                "No vitals entered and not marked unknown. Prompt for vitals or reason."
                    .to_string()
            } else {
                format!("Vitals incomplete: missing {}.", vitals.missing_fields().join(", "))
            };
            self.anomaly(AnomalyKind::VitalsIncomplete, detail, Some("vitals".to_string()));
        }

        for rule in view.vital_rules() {
            if let Some(value) = vitals.reading(&rule.vital)
                && rule.operator.holds(value, rule.threshold)
            {
                self.vital_findings.insert(rule.rule_id.clone());
            }
        }
    }

    fn check_prefer_not_to_say(&mut self, intake: &IntakeSnapshot) {
        let declined: Vec<&str> = intake
            .social_history
            .answers()
            .into_iter()
            .filter(|(_, value)| is_declined(value))
            .map(|(name, _)| name)
            .collect();
        if declined.len() >= PREFER_NOT_TO_SAY_CLUSTER {
            self.anomaly(
                AnomalyKind::PreferNotToSay,
                format!(
                    "Multiple items marked 'prefer not to say.' Prompt patient or review with clinician. ({})",
                    declined.join(", ")
                ),
                Some("social_history".to_string()),
            );
        }
    }

    /// The readable items of one intake list with their positions. Each
    /// unreadable item becomes a malformed-entry anomaly.
    fn readable<'a, T: DeserializeOwned>(
        &mut self,
        entries: &'a [Entry<T>],
        section: &str,
    ) -> Vec<(usize, &'a T)> {
        let mut read = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            match entry {
                Entry::Read(value) => read.push((i, value)),
                Entry::Unreadable(raw) => {
                    let reason = serde_json::from_value::<T>(raw.clone())
                        .err()
                        .map_or_else(|| "unrecognized entry".to_string(), |e| e.to_string());
                    self.anomaly(
                        AnomalyKind::MalformedEntry,
                        reason,
                        Some(format!("{section}[{i}]")),
                    );
                }
            }
        }
        read
    }

    fn anomaly(&mut self, kind: AnomalyKind, detail: impl Into<String>, location: Option<String>) {
        self.anomalies.push(Anomaly {
            kind,
            detail: detail.into(),
            location,
        });
    }
}

fn is_declined(value: &str) -> bool {
    let normalized = value.trim().to_ascii_lowercase().replace(['_', '-'], " ");
    normalized == "prefer not to say"
}
