use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AuditError;
use crate::events::AuditEvent;

/// Where audit events are recorded.
///
/// Sinks are append-only: events are never edited once written.
pub trait AuditSink: Send + Sync {
    /// Append the event and return its id.
    fn record(&self, event: AuditEvent) -> Result<Uuid, AuditError>;

    fn events_for_session(&self, session_token: &str) -> Result<Vec<AuditEvent>, AuditError>;

    fn events_for_patient(&self, patient_id: &str) -> Result<Vec<AuditEvent>, AuditError>;

    fn event(&self, audit_event_id: Uuid) -> Result<Option<AuditEvent>, AuditError>;
}

/// Audit events as JSON lines in a local file.
pub struct JsonlAuditLog {
    path: PathBuf,
    immutable: bool,
    lock: Mutex<()>,
}

impl JsonlAuditLog {
    pub fn new(path: impl Into<PathBuf>, immutable: bool) -> Self {
        Self {
            path: path.into(),
            immutable,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate the log. Refused when the log was opened immutable.
    pub fn clear(&self) -> Result<(), AuditError> {
        if self.immutable {
            return Err(AuditError::Immutable);
        }
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        File::create(&self.path).map_err(|source| self.io_error(source))?;
        info!(path = %self.path.display(), "audit log cleared");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> AuditError {
        AuditError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Every readable event in file order. Unreadable lines are skipped.
    fn scan(&self, keep: impl Fn(&AuditEvent) -> bool) -> Result<Vec<AuditEvent>, AuditError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut events = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| self.io_error(source))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditEvent>(&line) {
                Ok(event) if keep(&event) => events.push(event),
                Ok(_) => {}
                Err(e) => warn!(
                    path = %self.path.display(),
                    line = index + 1,
                    "skipping unreadable audit line: {e}"
                ),
            }
        }
        Ok(events)
    }
}

impl AuditSink for JsonlAuditLog {
    fn record(&self, event: AuditEvent) -> Result<Uuid, AuditError> {
        let mut line = serde_json::to_string(&event)?;
        line.push('\n');

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        file.write_all(line.as_bytes())
            .map_err(|source| self.io_error(source))?;

        event.emit();
        Ok(event.audit_event_id)
    }

    fn events_for_session(&self, session_token: &str) -> Result<Vec<AuditEvent>, AuditError> {
        self.scan(|e| e.session_token.as_deref() == Some(session_token))
    }

    fn events_for_patient(&self, patient_id: &str) -> Result<Vec<AuditEvent>, AuditError> {
        self.scan(|e| e.patient_id.as_deref() == Some(patient_id))
    }

    fn event(&self, audit_event_id: Uuid) -> Result<Option<AuditEvent>, AuditError> {
        Ok(self
            .scan(|e| e.audit_event_id == audit_event_id)?
            .into_iter()
            .next())
    }
}

/// In-process audit sink for tests and local runs.
#[derive(Default)]
pub struct MemoryAuditLog {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in record order.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn filtered(&self, keep: impl Fn(&AuditEvent) -> bool) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| keep(e))
            .cloned()
            .collect()
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&self, event: AuditEvent) -> Result<Uuid, AuditError> {
        event.emit();
        let id = event.audit_event_id;
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(id)
    }

    fn events_for_session(&self, session_token: &str) -> Result<Vec<AuditEvent>, AuditError> {
        Ok(self.filtered(|e| e.session_token.as_deref() == Some(session_token)))
    }

    fn events_for_patient(&self, patient_id: &str) -> Result<Vec<AuditEvent>, AuditError> {
        Ok(self.filtered(|e| e.patient_id.as_deref() == Some(patient_id)))
    }

    fn event(&self, audit_event_id: Uuid) -> Result<Option<AuditEvent>, AuditError> {
        Ok(self
            .filtered(|e| e.audit_event_id == audit_event_id)
            .into_iter()
            .next())
    }
}
