//! # Party & Battle Services
//!
//! Party rosters never expire. Battle sessions are swept by
//! [`BattleService::purge_expired`], which only runs when something calls it.

use std::sync::Arc;

use domains::{AppError, BattleSession, BattleSessionStore, PartyRecord, PartyStore, Result, Timestamp};
use serde_json::Value;

use crate::expiry::session_purge_cutoff;

pub struct PartyService {
    parties: Arc<dyn PartyStore>,
}

impl PartyService {
    pub fn new(parties: Arc<dyn PartyStore>) -> Self {
        Self { parties }
    }

    /// Stores the roster under `party_id`. The leader is read from the
    /// payload's `leader` field.
    pub async fn save(&self, party_id: &str, payload: Value, now: Timestamp) -> Result<Timestamp> {
        let leader = payload
            .get("leader")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| AppError::Validation("party payload requires a string `leader`".into()))?;
        self.parties.save(party_id, &leader, payload, now).await?;
        Ok(now)
    }

    pub async fn get(&self, party_id: &str) -> Result<PartyRecord> {
        self.parties
            .get(party_id)
            .await?
            .ok_or_else(|| AppError::not_found("party", party_id))
    }

    pub async fn remove(&self, party_id: &str) -> Result<()> {
        self.parties.remove(party_id).await
    }
}

pub struct BattleService {
    sessions: Arc<dyn BattleSessionStore>,
}

impl BattleService {
    pub fn new(sessions: Arc<dyn BattleSessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn save(&self, session_id: &str, payload: Value, now: Timestamp) -> Result<BattleSession> {
        self.sessions.save(session_id, payload, now).await
    }

    /// Sessions are returned regardless of age.
    pub async fn get(&self, session_id: &str) -> Result<BattleSession> {
        self.sessions
            .get(session_id)
            .await?
            .ok_or_else(|| AppError::not_found("battle session", session_id))
    }

    /// Deletes sessions idle for more than an hour as of `now`.
    pub async fn purge_expired(&self, now: Timestamp) -> Result<u64> {
        let purged = self.sessions.purge_updated_before(session_purge_cutoff(now)).await?;
        tracing::info!(purged, "expired battle sessions purged");
        Ok(purged)
    }
}
