//! # Domain Models
//!
//! These structs represent the records Questboard keeps for the game client.
//! Payloads the server does not interpret stay as raw `serde_json::Value`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Milliseconds since the Unix epoch, always supplied by the caller.
pub type Timestamp = i64;

/// The two opaque per-player collections held by a `BlobStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobKind {
    /// Full character sheet, replaced wholesale on every save
    Character,
    /// Item list for a player
    Inventory,
}

/// An opaque JSON document plus its last write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blob {
    pub key: String,
    pub data: Value,
    pub updated_at: Timestamp,
}

/// One row of the power leaderboard. Derived from a character save,
/// never written by clients directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub username: String,
    pub level: i64,
    pub power: i64,
    pub class: String,
    pub updated_at: Timestamp,
}

/// A "looking for party members" post. At most one per username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruitmentPost {
    pub id: String,
    pub username: String,
    pub class: String,
    pub level: i64,
    pub power: i64,
    pub message: String,
    pub max_members: i64,
    pub created_at: Timestamp,
}

/// Client-supplied fields of a recruitment post; the store stamps `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecruitmentPost {
    pub id: String,
    pub username: String,
    pub class: String,
    pub level: i64,
    pub power: i64,
    pub message: String,
    pub max_members: i64,
}

impl NewRecruitmentPost {
    pub fn stamp(self, created_at: Timestamp) -> RecruitmentPost {
        RecruitmentPost {
            id: self.id,
            username: self.username,
            class: self.class,
            level: self.level,
            power: self.power,
            message: self.message,
            max_members: self.max_members,
            created_at,
        }
    }
}

/// A request from one player to join another player's party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyRequest {
    pub id: String,
    pub from_user: String,
    pub to_user: String,
    pub class: String,
    pub level: i64,
    pub power: i64,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPartyRequest {
    pub id: String,
    pub from_user: String,
    pub to_user: String,
    pub class: String,
    pub level: i64,
    pub power: i64,
}

impl NewPartyRequest {
    pub fn stamp(self, created_at: Timestamp) -> PartyRequest {
        PartyRequest {
            id: self.id,
            from_user: self.from_user,
            to_user: self.to_user,
            class: self.class,
            level: self.level,
            power: self.power,
            created_at,
        }
    }
}

/// A party roster. Lives until explicitly removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyRecord {
    pub party_id: String,
    pub leader: String,
    pub data: Value,
    pub updated_at: Timestamp,
}

/// Shared state of a cooperative battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSession {
    pub session_id: String,
    pub data: Value,
    /// Set on first save, never changed afterwards
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
