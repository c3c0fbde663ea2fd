//! # Core Traits (Ports)
//!
//! Any storage adapter must implement these traits to back the services.
//! Time never comes from a clock here: callers pass `now` or a precomputed
//! cutoff so every implementation stays deterministic.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::Result;
use crate::models::{
    BattleSession, Blob, BlobKind, NewPartyRequest, NewRecruitmentPost, PartyRecord, PartyRequest,
    RankingEntry, RecruitmentPost, Timestamp,
};

/// Opaque JSON documents keyed by username. Last write wins.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, kind: BlobKind, key: &str) -> Result<Option<Blob>>;
    async fn put(&self, kind: BlobKind, key: &str, data: Value, timestamp: Timestamp) -> Result<()>;
    /// Deleting a missing key is not an error.
    async fn delete(&self, kind: BlobKind, key: &str) -> Result<()>;
}

/// The power leaderboard.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RankingIndex: Send + Sync {
    /// Inserts or fully replaces the entry for `entry.username`.
    async fn upsert(&self, entry: RankingEntry) -> Result<()>;
    /// Highest power first. Ties keep storage order.
    async fn top_n(&self, n: usize) -> Result<Vec<RankingEntry>>;
}

/// Party recruitment posts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RecruitBoard: Send + Sync {
    /// Removes every post by `post.username`, then stores the new one.
    /// Both steps happen as one unit. Returns the post id.
    async fn publish(&self, post: NewRecruitmentPost, now: Timestamp) -> Result<String>;
    /// Posts with `created_at > cutoff`, newest first.
    async fn list_created_after(&self, cutoff: Timestamp) -> Result<Vec<RecruitmentPost>>;
    /// Direct lookup, ignores age.
    async fn get(&self, id: &str) -> Result<Option<RecruitmentPost>>;
    async fn remove(&self, id: &str) -> Result<()>;
}

/// Party join requests.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PartyRequestStore: Send + Sync {
    /// Upsert by id.
    async fn send(&self, request: NewPartyRequest, now: Timestamp) -> Result<()>;
    /// Requests addressed to `to_user` with `created_at > cutoff`, newest first.
    async fn list_for(&self, to_user: &str, cutoff: Timestamp) -> Result<Vec<PartyRequest>>;
    async fn remove(&self, id: &str) -> Result<()>;
}

/// Party rosters.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PartyStore: Send + Sync {
    async fn save(&self, party_id: &str, leader: &str, data: Value, now: Timestamp) -> Result<()>;
    async fn get(&self, party_id: &str) -> Result<Option<PartyRecord>>;
    async fn remove(&self, party_id: &str) -> Result<()>;
}

/// Cooperative battle sessions.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BattleSessionStore: Send + Sync {
    /// Replaces the payload and sets `updated_at = now`. An existing
    /// `created_at` survives; a new session gets `created_at = now`.
    async fn save(&self, session_id: &str, data: Value, now: Timestamp) -> Result<BattleSession>;
    async fn get(&self, session_id: &str) -> Result<Option<BattleSession>>;
    /// Deletes sessions with `updated_at < cutoff` and returns how many went.
    async fn purge_updated_before(&self, cutoff: Timestamp) -> Result<u64>;
}
