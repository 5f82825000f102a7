//! Session repository: load, save and clear the persisted session.
//!
//! Hosts call the repository after each mutating command; the pure
//! transforms never touch storage. Absent or malformed data always loads as
//! an empty session.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::warn;

use super::database::KvStore;
use crate::error::{CoreError, Result};
use crate::interval::Interval;
use crate::session::{Session, TrackerState};

/// Key holding the JSON array of interval records.
pub const INTERVALS_KEY: &str = "intervals";
/// Key holding the in-progress marker and intensity level.
pub const TRACKER_STATE_KEY: &str = "tracker_state";

pub trait SessionRepository {
    fn load(&self) -> Result<Vec<Interval>>;
    fn save(&self, intervals: &[Interval]) -> Result<()>;
    /// Remove the persisted record entirely.
    fn clear(&self) -> Result<()>;
    fn load_state(&self) -> Result<TrackerState>;
    fn save_state(&self, state: &TrackerState) -> Result<()>;

    /// Load records and tracker state into a session.
    fn load_session(&self) -> Result<Session> {
        Ok(Session::from_parts(self.load()?, self.load_state()?))
    }

    /// Persist the whole session. An empty history removes the record.
    fn save_session(&self, session: &Session) -> Result<()> {
        if session.intervals().is_empty() {
            self.clear()?;
        } else {
            self.save(session.intervals())?;
        }
        self.save_state(&session.tracker_state())
    }
}

/// Repository over any [`KvStore`].
pub struct KvSessionRepository<S> {
    store: S,
}

impl<S: KvStore> KvSessionRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KvStore> SessionRepository for KvSessionRepository<S> {
    fn load(&self) -> Result<Vec<Interval>> {
        Ok(self
            .store
            .kv_get(INTERVALS_KEY)?
            .map(|raw| decode_intervals(&raw))
            .unwrap_or_default())
    }

    fn save(&self, intervals: &[Interval]) -> Result<()> {
        let json = serde_json::to_string(intervals)?;
        self.store.kv_set(INTERVALS_KEY, &json)
    }

    fn clear(&self) -> Result<()> {
        self.store.kv_delete(INTERVALS_KEY)
    }

    fn load_state(&self) -> Result<TrackerState> {
        let Some(raw) = self.store.kv_get(TRACKER_STATE_KEY)? else {
            return Ok(TrackerState::default());
        };
        match serde_json::from_str::<TrackerState>(&raw) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!(error = %e, "malformed tracker state, using defaults");
                Ok(TrackerState::default())
            }
        }
    }

    fn save_state(&self, state: &TrackerState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.store.kv_set(TRACKER_STATE_KEY, &json)
    }
}

fn decode_intervals(raw: &str) -> Vec<Interval> {
    match serde_json::from_str::<Vec<Interval>>(raw) {
        Ok(intervals) => match intervals.iter().position(|iv| !iv.is_well_formed()) {
            None => intervals,
            Some(index) => {
                warn!(index, "inconsistent interval record, starting empty");
                Vec::new()
            }
        },
        Err(e) => {
            warn!(error = %e, "malformed interval history, starting empty");
            Vec::new()
        }
    }
}

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| CoreError::Poisoned("memory store"))
    }
}

impl KvStore for MemoryStore {
    fn kv_get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn kv_delete(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Repository backed by [`MemoryStore`].
pub type MemoryRepository = KvSessionRepository<MemoryStore>;

impl MemoryRepository {
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}
