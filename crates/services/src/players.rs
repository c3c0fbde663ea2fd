//! # Player Service
//!
//! Character sheets, inventories and the leaderboard derived from them.
//!
//! A character save is two independent writes: the sheet goes to the
//! `BlobStore`, then the ranking row is recomputed. A failure in the second
//! step never undoes the first; it is reported in [`RankingSync`] instead,
//! and the next successful save brings the leaderboard back in line.

use std::sync::Arc;

use domains::{AppError, Blob, BlobKind, BlobStore, RankingEntry, RankingIndex, Result, Timestamp};
use serde::Serialize;
use serde_json::Value;

use crate::power::compute_power;

/// What happened to the leaderboard after a character save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RankingSync {
    Updated { power: i64 },
    /// The sheet lacked `level` or `class`; the previous row (if any) stays.
    Skipped { reason: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSaved {
    pub updated_at: Timestamp,
    pub ranking: RankingSync,
}

/// Inventory as the client sees it; a player with none gets an empty list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inventory {
    pub items: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

pub struct PlayerService {
    blobs: Arc<dyn BlobStore>,
    ranking: Arc<dyn RankingIndex>,
}

impl PlayerService {
    pub fn new(blobs: Arc<dyn BlobStore>, ranking: Arc<dyn RankingIndex>) -> Self {
        Self { blobs, ranking }
    }

    pub async fn load_character(&self, username: &str) -> Result<Blob> {
        self.blobs
            .get(BlobKind::Character, username)
            .await?
            .ok_or_else(|| AppError::not_found("character", username))
    }

    /// Stores the full sheet, then syncs the leaderboard row with the same
    /// timestamp. Only the first write decides the `Result`.
    pub async fn save_character(
        &self,
        username: &str,
        character: Value,
        now: Timestamp,
    ) -> Result<CharacterSaved> {
        let entry = ranking_entry(username, &character, now);
        self.blobs
            .put(BlobKind::Character, username, character, now)
            .await?;
        tracing::debug!(username, updated_at = now, "character saved");

        let ranking = match entry {
            Err(reason) => {
                tracing::warn!(username, %reason, "ranking sync skipped");
                RankingSync::Skipped { reason }
            }
            Ok(entry) => {
                let power = entry.power;
                match self.ranking.upsert(entry).await {
                    Ok(()) => {
                        tracing::debug!(username, power, "ranking updated");
                        RankingSync::Updated { power }
                    }
                    Err(err) => {
                        tracing::warn!(username, error = %err, "ranking sync failed");
                        RankingSync::Failed {
                            error: err.to_string(),
                        }
                    }
                }
            }
        };

        Ok(CharacterSaved {
            updated_at: now,
            ranking,
        })
    }

    pub async fn load_inventory(&self, username: &str) -> Result<Inventory> {
        let inventory = match self.blobs.get(BlobKind::Inventory, username).await? {
            Some(blob) => Inventory {
                items: blob.data,
                updated_at: Some(blob.updated_at),
            },
            None => Inventory {
                items: Value::Array(Vec::new()),
                updated_at: None,
            },
        };
        Ok(inventory)
    }

    pub async fn save_inventory(&self, username: &str, items: Value, now: Timestamp) -> Result<Timestamp> {
        self.blobs.put(BlobKind::Inventory, username, items, now).await?;
        Ok(now)
    }

    pub async fn ranking(&self, limit: usize) -> Result<Vec<RankingEntry>> {
        self.ranking.top_n(limit).await
    }
}

/// Builds the leaderboard row for a sheet, or explains why it cannot.
fn ranking_entry(username: &str, character: &Value, now: Timestamp) -> std::result::Result<RankingEntry, String> {
    let level = character
        .get("level")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f.floor() as i64)))
        .ok_or_else(|| "character has no numeric level".to_string())?;
    let class = character
        .get("class")
        .and_then(Value::as_str)
        .ok_or_else(|| "character has no class".to_string())?;

    Ok(RankingEntry {
        username: username.to_string(),
        level,
        power: compute_power(Some(character)),
        class: class.to_string(),
        updated_at: now,
    })
}
