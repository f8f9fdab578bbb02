#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use triage_audit::MemoryAuditLog;
use triage_knowledge::KnowledgeBase;
use triage_knowledge::tabular::workbook_tables;
use triage_server::{AppState, SessionStore, app};

pub fn workbook() -> Value {
    json!({
        "conditions": [
            { "condition_id": "viral_uri", "name": "Viral upper respiratory infection" },
            { "condition_id": "influenza", "name": "Influenza" },
            { "condition_id": "pneumonia", "name": "Pneumonia", "severity": "serious_bucket" }
        ],
        "symptoms": [
            { "symptom_id": "fever", "name": "Fever" },
            { "symptom_id": "cough", "name": "Cough" },
            { "symptom_id": "dyspnea", "name": "Shortness of breath" }
        ],
        "supports": [
            { "symptom_id": "fever", "condition_id": "viral_uri", "weight": 2 },
            { "symptom_id": "cough", "condition_id": "viral_uri", "weight": 1 },
            { "symptom_id": "fever", "condition_id": "influenza", "weight": 1 },
            { "symptom_id": "dyspnea", "condition_id": "influenza", "weight": 1 },
            { "symptom_id": "dyspnea", "condition_id": "pneumonia", "weight": 2 },
            { "from_type": "VitalRule", "from_id": "spo2_low", "condition_id": "pneumonia", "weight": 2 }
        ],
        "red_flags": [
            { "red_flag_id": "rf_breathing", "name": "Severe difficulty breathing",
              "urgency": "ER_now", "symptom_ids": ["dyspnea"] }
        ],
        "condition_red_flags": [
            { "condition_id": "pneumonia", "red_flag_id": "rf_breathing" }
        ],
        "condition_links": [
            { "condition_id": "influenza", "link_type": "guide", "target_id": "g_flu" }
        ],
        "vital_rules": [
            { "rule_id": "spo2_low", "name": "Low oxygen saturation", "vital": "spo2",
              "operator": "<", "threshold": 92, "unit": "%" }
        ],
        "labs": [],
        "specialists": [],
        "medications": [],
        "actions": [],
        "guides": [{ "guide_id": "g_flu", "title": "Managing flu symptoms at home" }],
        "templates": [],
        "assistant_actions": [
            { "assistant_action_id": "collect_spo2", "name": "Measure oxygen saturation" }
        ],
        "assistant_action_ui_map": [
            { "assistant_action_id": "collect_spo2", "ui_control": "number", "field_keys": "spo2",
              "min_value": 50, "max_value": 100, "unit_label": "%" }
        ],
        "clinician_validation_checklist": [
            { "field_id": "oxygen_saturation", "tier_level": 2, "description": "Oxygen saturation",
              "assistant_action_id": "collect_spo2", "clinician_prompt": true,
              "question_text": "Was SpO2 measured at check-in?", "field_type": "number" }
        ]
    })
}

pub struct TestServer {
    pub app: Router,
    pub audit: Arc<MemoryAuditLog>,
}

pub fn server() -> TestServer {
    let tables = workbook_tables(workbook()).unwrap();
    let audit = Arc::new(MemoryAuditLog::new());
    let state = AppState {
        knowledge: Arc::new(KnowledgeBase::load(Box::new(tables)).unwrap()),
        sessions: Arc::new(SessionStore::new(Duration::from_secs(600))),
        audit: audit.clone(),
    };
    TestServer {
        app: app(state),
        audit,
    }
}

impl TestServer {
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub fn audit_event_types(&self) -> Vec<String> {
        self.audit
            .events()
            .into_iter()
            .map(|e| e.event_type)
            .collect()
    }
}

/// A tier-1 complete intake with fever and cough, SpO2 not taken.
pub fn intake(token: &str) -> Value {
    json!({
        "session_token": token,
        "patient_id": "p-1",
        "chief_concern": "fever and cough for three days",
        "issue_cards": [{ "region_id": "chest", "description": "tight chest when coughing" }],
        "symptoms": [
            { "symptom_id": "fever", "present": true },
            { "symptom_id": "cough", "present": true },
            { "symptom_id": "dyspnea", "present": false }
        ],
        "red_flags": [{ "red_flag_id": "rf_breathing", "present": false }],
        "consent_acknowledged": true,
        "vitals": {
            "temperature": 38.4,
            "heart_rate": 92,
            "respiratory_rate": 18,
            "blood_pressure_systolic": 122,
            "blood_pressure_diastolic": 78,
            "height_cm": 170.0,
            "weight_kg": 68.0
        }
    })
}
