//! In-memory session store with per-entry expiry.
//!
//! Values are kept as JSON so the store can hold intakes, triage results and
//! wrap-up plans side by side under the `triage_core::session_keys` layout.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Stored entries at which a write first sweeps out expired ones.
pub const SWEEP_THRESHOLD: usize = 1024;

struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

struct Entries {
    map: HashMap<String, Entry>,
    /// Size at which the next write sweeps. Doubles with the live set so a
    /// store full of unexpired entries does not sweep on every write.
    sweep_at: usize,
}

impl Entries {
    fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.map.len();
        self.map.retain(|_, entry| !entry.expired(now));
        before - self.map.len()
    }
}

pub struct SessionStore {
    entries: Mutex<Entries>,
    session_locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(Entries {
                map: HashMap::new(),
                sweep_at: SWEEP_THRESHOLD,
            }),
            session_locks: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Default lifetime given to entries written with [`SessionStore::set`].
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The stored value, or `None` when absent or expired.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.map.get(key).is_some_and(|e| e.expired(Instant::now())) {
            entries.map.remove(key);
            return Ok(None);
        }
        entries
            .map
            .get(key)
            .map(|e| serde_json::from_value(e.value.clone()))
            .transpose()
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), serde_json::Error> {
        self.set_with_ttl(key, value, Some(self.ttl))
    }

    /// Write a value. `None` keeps it until deleted.
    pub fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), serde_json::Error> {
        let entry = Entry {
            value: serde_json::to_value(value)?,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.map.len() >= entries.sweep_at {
            let purged = entries.purge_expired();
            entries.sweep_at = (entries.map.len() * 2).max(SWEEP_THRESHOLD);
            tracing::debug!(purged, live = entries.map.len(), "session store swept");
        }
        entries.map.insert(key.to_string(), entry);
        Ok(())
    }

    pub fn delete(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .map
            .remove(key);
    }

    /// Drop every expired entry now. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .purge_expired()
    }

    /// Entries held in memory, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .map
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Time left before the entry expires. `None` when absent, expired or
    /// stored without expiry.
    pub fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let expires_at = entries.map.get(key)?.expires_at?;
        expires_at.checked_duration_since(Instant::now())
    }

    /// Serialize work on one session. Held across the load, triage and
    /// store steps so `previous_triage_id` lineage stays linear.
    pub async fn lock_session(&self, session_token: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self
                .session_locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(session_token.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}
