//! # In-memory store
//!
//! Implements every port on process-local maps. Nothing survives a restart;
//! meant for tests and throwaway deployments.
//!
//! Keyed collections use `DashMap` so single-key writes lock one shard.
//! The leaderboard and the recruitment board keep insertion order in a
//! `Vec` behind an `RwLock`: ranking ties resolve by that order, and
//! `publish` must drop the owner's old post and add the new one under a
//! single lock.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{
    BattleSession, BattleSessionStore, Blob, BlobKind, BlobStore, NewPartyRequest, NewRecruitmentPost,
    PartyRecord, PartyRequest, PartyRequestStore, PartyStore, RankingEntry, RankingIndex, RecruitBoard,
    RecruitmentPost, Result, Timestamp,
};
use serde_json::Value;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    blobs: DashMap<(BlobKind, String), Blob>,
    ranking: RwLock<Vec<RankingEntry>>,
    recruits: RwLock<Vec<RecruitmentPost>>,
    requests: DashMap<String, PartyRequest>,
    parties: DashMap<String, PartyRecord>,
    sessions: DashMap<String, BattleSession>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn get(&self, kind: BlobKind, key: &str) -> Result<Option<Blob>> {
        Ok(self
            .blobs
            .get(&(kind, key.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn put(&self, kind: BlobKind, key: &str, data: Value, timestamp: Timestamp) -> Result<()> {
        self.blobs.insert(
            (kind, key.to_string()),
            Blob {
                key: key.to_string(),
                data,
                updated_at: timestamp,
            },
        );
        Ok(())
    }

    async fn delete(&self, kind: BlobKind, key: &str) -> Result<()> {
        self.blobs.remove(&(kind, key.to_string()));
        Ok(())
    }
}

#[async_trait]
impl RankingIndex for MemoryStore {
    async fn upsert(&self, entry: RankingEntry) -> Result<()> {
        let mut rows = self.ranking.write().await;
        match rows.iter_mut().find(|row| row.username == entry.username) {
            Some(row) => *row = entry,
            None => rows.push(entry),
        }
        Ok(())
    }

    async fn top_n(&self, n: usize) -> Result<Vec<RankingEntry>> {
        let mut rows = self.ranking.read().await.clone();
        // stable: equal power keeps insertion order
        rows.sort_by(|a, b| b.power.cmp(&a.power));
        rows.truncate(n);
        Ok(rows)
    }
}

#[async_trait]
impl RecruitBoard for MemoryStore {
    async fn publish(&self, post: NewRecruitmentPost, now: Timestamp) -> Result<String> {
        let id = post.id.clone();
        let mut posts = self.recruits.write().await;
        posts.retain(|existing| existing.username != post.username && existing.id != post.id);
        posts.push(post.stamp(now));
        Ok(id)
    }

    async fn list_created_after(&self, cutoff: Timestamp) -> Result<Vec<RecruitmentPost>> {
        let mut visible: Vec<RecruitmentPost> = self
            .recruits
            .read()
            .await
            .iter()
            .filter(|post| post.created_at > cutoff)
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible)
    }

    async fn get(&self, id: &str) -> Result<Option<RecruitmentPost>> {
        Ok(self.recruits.read().await.iter().find(|post| post.id == id).cloned())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.recruits.write().await.retain(|post| post.id != id);
        Ok(())
    }
}

#[async_trait]
impl PartyRequestStore for MemoryStore {
    async fn send(&self, request: NewPartyRequest, now: Timestamp) -> Result<()> {
        self.requests.insert(request.id.clone(), request.stamp(now));
        Ok(())
    }

    async fn list_for(&self, to_user: &str, cutoff: Timestamp) -> Result<Vec<PartyRequest>> {
        let mut matching: Vec<PartyRequest> = self
            .requests
            .iter()
            .filter(|entry| entry.to_user == to_user && entry.created_at > cutoff)
            .map(|entry| entry.value().clone())
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.requests.remove(id);
        Ok(())
    }
}

#[async_trait]
impl PartyStore for MemoryStore {
    async fn save(&self, party_id: &str, leader: &str, data: Value, now: Timestamp) -> Result<()> {
        self.parties.insert(
            party_id.to_string(),
            PartyRecord {
                party_id: party_id.to_string(),
                leader: leader.to_string(),
                data,
                updated_at: now,
            },
        );
        Ok(())
    }

    async fn get(&self, party_id: &str) -> Result<Option<PartyRecord>> {
        Ok(self.parties.get(party_id).map(|entry| entry.value().clone()))
    }

    async fn remove(&self, party_id: &str) -> Result<()> {
        self.parties.remove(party_id);
        Ok(())
    }
}

#[async_trait]
impl BattleSessionStore for MemoryStore {
    async fn save(&self, session_id: &str, data: Value, now: Timestamp) -> Result<BattleSession> {
        let session = match self.sessions.entry(session_id.to_string()) {
            Entry::Occupied(mut occupied) => {
                let session = occupied.get_mut();
                session.data = data;
                session.updated_at = now;
                session.clone()
            }
            Entry::Vacant(vacant) => vacant
                .insert(BattleSession {
                    session_id: session_id.to_string(),
                    data,
                    created_at: now,
                    updated_at: now,
                })
                .value()
                .clone(),
        };
        Ok(session)
    }

    async fn get(&self, session_id: &str) -> Result<Option<BattleSession>> {
        Ok(self.sessions.get(session_id).map(|entry| entry.value().clone()))
    }

    async fn purge_updated_before(&self, cutoff: Timestamp) -> Result<u64> {
        let mut purged = 0u64;
        self.sessions.retain(|_, session| {
            let keep = session.updated_at >= cutoff;
            if !keep {
                purged += 1;
            }
            keep
        });
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MINUTE: i64 = 60 * 1000;

    fn entry(username: &str, level: i64, power: i64, at: Timestamp) -> RankingEntry {
        RankingEntry {
            username: username.to_string(),
            level,
            power,
            class: "mage".to_string(),
            updated_at: at,
        }
    }

    fn post(id: &str, username: &str) -> NewRecruitmentPost {
        NewRecruitmentPost {
            id: id.to_string(),
            username: username.to_string(),
            class: "knight".to_string(),
            level: 5,
            power: 180,
            message: "come along".to_string(),
            max_members: 4,
        }
    }

    #[tokio::test]
    async fn test_ranking_upsert_replaces_entry() {
        let store = MemoryStore::new();
        store.upsert(entry("alice", 10, 500, 1)).await.unwrap();
        store.upsert(entry("alice", 12, 900, 2)).await.unwrap();

        let top = store.top_n(10).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].power, 900);
        assert_eq!(top[0].level, 12);
    }

    #[tokio::test]
    async fn test_ranking_orders_by_power_and_keeps_ties_stable() {
        let store = MemoryStore::new();
        store.upsert(entry("a", 1, 100, 1)).await.unwrap();
        store.upsert(entry("b", 1, 300, 1)).await.unwrap();
        store.upsert(entry("c", 1, 100, 1)).await.unwrap();

        let names: Vec<_> = store
            .top_n(10)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.username)
            .collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert_eq!(store.top_n(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_publish_replaces_owner_post() {
        let store = MemoryStore::new();
        let t0 = 1_000 * MINUTE;
        store.publish(post("r1", "bob"), t0).await.unwrap();
        store.publish(post("r2", "bob"), t0 + MINUTE).await.unwrap();

        assert!(RecruitBoard::get(&store, "r1").await.unwrap().is_none());
        let listed = store.list_created_after(t0 + MINUTE - 30 * MINUTE).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "r2");
    }

    #[tokio::test]
    async fn test_session_keeps_created_at() {
        let store = MemoryStore::new();
        BattleSessionStore::save(&store, "s1", json!({ "turn": 1 }), 100).await.unwrap();
        let saved = BattleSessionStore::save(&store, "s1", json!({ "turn": 2 }), 250).await.unwrap();

        assert_eq!(saved.created_at, 100);
        assert_eq!(saved.updated_at, 250);
        assert_eq!(saved.data, json!({ "turn": 2 }));
    }

    #[tokio::test]
    async fn test_purge_counts_deleted_sessions() {
        let store = MemoryStore::new();
        BattleSessionStore::save(&store, "old", json!({}), 10).await.unwrap();
        BattleSessionStore::save(&store, "fresh", json!({}), 20).await.unwrap();

        assert_eq!(store.purge_updated_before(15).await.unwrap(), 1);
        assert_eq!(store.purge_updated_before(15).await.unwrap(), 0);
        assert!(BattleSessionStore::get(&store, "fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_blob_kinds_are_separate() {
        let store = MemoryStore::new();
        store.put(BlobKind::Character, "eve", json!({ "level": 1 }), 5).await.unwrap();

        assert!(BlobStore::get(&store, BlobKind::Inventory, "eve").await.unwrap().is_none());
        store.delete(BlobKind::Character, "eve").await.unwrap();
        store.delete(BlobKind::Character, "eve").await.unwrap();
        assert!(BlobStore::get(&store, BlobKind::Character, "eve").await.unwrap().is_none());
    }
}
