//! Session, player and record storage used by the report builder.
//!
//! [`SessionStore`] is the read interface the report needs. [`JsonStore`] is
//! an in-memory implementation persisted as a single JSON document:
//! ```json
//! {
//!   "players": { "p1": { "id": "p1", "name": "Jordan", "level": "College" } },
//!   "sessions": { "s1": { "id": "s1", "playerId": "p1", "date": "2024-05-01", "instrument": "batTracker" } },
//!   "records": { "s1": { "instrument": "batTracker", "records": [ ... ] } }
//! }
//! ```

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::records::{SwingInstrumentType, SwingRecords};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub player_id: String,
    pub date: NaiveDate,
    pub instrument: SwingInstrumentType,
}

/// Read access to committed sessions and their records.
pub trait SessionStore {
    fn session(&self, id: &str) -> Option<&Session>;
    fn player(&self, id: &str) -> Option<&Player>;
    /// All sessions of a player, in no particular order.
    fn player_sessions(&self, player_id: &str) -> Vec<&Session>;
    fn records(&self, session_id: &str) -> Option<&SwingRecords>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonStore {
    #[serde(default)]
    players: HashMap<String, Player>,
    #[serde(default)]
    sessions: HashMap<String, Session>,
    #[serde(default)]
    records: HashMap<String, SwingRecords>,
}

impl JsonStore {
    /// Loads the store from `path`, or starts empty if the file does not exist.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            debug!(path, "Store file not found, starting empty");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let store: JsonStore = serde_json::from_str(&content)?;
        debug!(
            path,
            players = store.players.len(),
            sessions = store.sessions.len(),
            "Store loaded"
        );
        Ok(store)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        if let Some(dir) = Path::new(path).parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!(path, "Store saved");
        Ok(())
    }

    /// Inserts or replaces a player.
    pub fn add_player(&mut self, player: Player) {
        self.players.insert(player.id.clone(), player);
    }

    /// Registers a session. Re-registering an existing id may update its
    /// date or player but never its instrument type.
    pub fn add_session(&mut self, session: Session) -> Result<(), StoreError> {
        if !self.players.contains_key(&session.player_id) {
            return Err(StoreError::UnknownPlayer(session.player_id));
        }
        if let Some(existing) = self.sessions.get(&session.id) {
            if existing.instrument != session.instrument {
                return Err(StoreError::InstrumentLocked {
                    id: session.id,
                    existing: existing.instrument,
                });
            }
        }
        self.records
            .entry(session.id.clone())
            .or_insert_with(|| SwingRecords::empty(session.instrument));
        self.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    /// Appends decoded records to a session. Returns the number inserted.
    pub fn insert_records(
        &mut self,
        session_id: &str,
        records: SwingRecords,
    ) -> Result<usize, StoreError> {
        let session = self
            .sessions
            .get(session_id)
            .ok_or_else(|| StoreError::UnknownSession(session_id.to_string()))?;
        if session.instrument != records.instrument() {
            return Err(StoreError::InstrumentMismatch {
                id: session_id.to_string(),
                expected: session.instrument,
                got: records.instrument(),
            });
        }

        let inserted = records.len();
        let instrument = session.instrument;
        let stored = self
            .records
            .entry(session_id.to_string())
            .or_insert_with(|| SwingRecords::empty(instrument));
        // a stale or hand-edited file can hold records of the other instrument
        if !stored.extend_from(records) {
            return Err(StoreError::InstrumentMismatch {
                id: session_id.to_string(),
                expected: stored.instrument(),
                got: instrument,
            });
        }

        info!(session_id, inserted, total = stored.len(), "Records inserted");
        Ok(inserted)
    }
}

impl SessionStore for JsonStore {
    fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    fn player(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    fn player_sessions(&self, player_id: &str) -> Vec<&Session> {
        self.sessions
            .values()
            .filter(|s| s.player_id == player_id)
            .collect()
    }

    fn records(&self, session_id: &str) -> Option<&SwingRecords> {
        self.records.get(session_id)
    }
}
