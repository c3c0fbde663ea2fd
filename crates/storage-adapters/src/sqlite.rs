//! # SQLite store
//!
//! Durable implementation of every port. Tables are created on connect.
//! JSON payloads are kept as TEXT and decoded on read.

use std::str::FromStr;

use async_trait::async_trait;
use domains::{
    AppError, BattleSession, BattleSessionStore, Blob, BlobKind, BlobStore, NewPartyRequest, NewRecruitmentPost,
    PartyRecord, PartyRequest, PartyRequestStore, PartyStore, RankingEntry, RankingIndex, RecruitBoard,
    RecruitmentPost, Result, Timestamp,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS players (
        username TEXT PRIMARY KEY,
        character_data TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS inventory (
        username TEXT PRIMARY KEY,
        items TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS ranking (
        username TEXT PRIMARY KEY,
        level INTEGER NOT NULL,
        power INTEGER NOT NULL,
        class TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS party_recruits (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL,
        class TEXT NOT NULL,
        level INTEGER NOT NULL,
        power INTEGER NOT NULL,
        message TEXT NOT NULL,
        max_members INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS party_recruits_username ON party_recruits (username)",
    "CREATE TABLE IF NOT EXISTS party_requests (
        id TEXT PRIMARY KEY,
        from_user TEXT NOT NULL,
        to_user TEXT NOT NULL,
        class TEXT NOT NULL,
        level INTEGER NOT NULL,
        power INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS party_requests_to_user ON party_requests (to_user, created_at)",
    "CREATE TABLE IF NOT EXISTS parties (
        party_id TEXT PRIMARY KEY,
        leader TEXT NOT NULL,
        party_data TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS battle_sessions (
        session_id TEXT PRIMARY KEY,
        session_data TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )",
];

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url` and ensures the schema.
    ///
    /// `sqlite::memory:` gives every connection its own database, so the pool
    /// is pinned to a single long-lived connection in that case.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(AppError::storage)?
            .create_if_missing(true);

        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(AppError::storage)?;

        let store = Self { pool };
        store.migrate().await?;
        tracing::info!(url, "sqlite store ready");
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA.iter().copied() {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(AppError::storage)?;
        }
        Ok(())
    }
}

/// (table, payload column) for each blob collection.
fn blob_table(kind: BlobKind) -> (&'static str, &'static str) {
    match kind {
        BlobKind::Character => ("players", "character_data"),
        BlobKind::Inventory => ("inventory", "items"),
    }
}

fn encode(data: &Value) -> Result<String> {
    serde_json::to_string(data).map_err(AppError::storage)
}

fn decode(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(AppError::storage)
}

fn limit(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[derive(FromRow)]
struct BlobRow {
    username: String,
    data: String,
    updated_at: i64,
}

#[derive(FromRow)]
struct RankingRow {
    username: String,
    level: i64,
    power: i64,
    class: String,
    updated_at: i64,
}

impl From<RankingRow> for RankingEntry {
    fn from(row: RankingRow) -> Self {
        RankingEntry {
            username: row.username,
            level: row.level,
            power: row.power,
            class: row.class,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct RecruitRow {
    id: String,
    username: String,
    class: String,
    level: i64,
    power: i64,
    message: String,
    max_members: i64,
    created_at: i64,
}

impl From<RecruitRow> for RecruitmentPost {
    fn from(row: RecruitRow) -> Self {
        RecruitmentPost {
            id: row.id,
            username: row.username,
            class: row.class,
            level: row.level,
            power: row.power,
            message: row.message,
            max_members: row.max_members,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct RequestRow {
    id: String,
    from_user: String,
    to_user: String,
    class: String,
    level: i64,
    power: i64,
    created_at: i64,
}

impl From<RequestRow> for PartyRequest {
    fn from(row: RequestRow) -> Self {
        PartyRequest {
            id: row.id,
            from_user: row.from_user,
            to_user: row.to_user,
            class: row.class,
            level: row.level,
            power: row.power,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct PartyRow {
    party_id: String,
    leader: String,
    party_data: String,
    updated_at: i64,
}

#[derive(FromRow)]
struct SessionRow {
    session_id: String,
    session_data: String,
    created_at: i64,
    updated_at: i64,
}

#[async_trait]
impl BlobStore for SqliteStore {
    async fn get(&self, kind: BlobKind, key: &str) -> Result<Option<Blob>> {
        let (table, column) = blob_table(kind);
        let sql = format!("SELECT username, {column} AS data, updated_at FROM {table} WHERE username = ?");
        let row = sqlx::query_as::<_, BlobRow>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::storage)?;

        row.map(|row| {
            Ok(Blob {
                key: row.username,
                data: decode(&row.data)?,
                updated_at: row.updated_at,
            })
        })
        .transpose()
    }

    async fn put(&self, kind: BlobKind, key: &str, data: Value, timestamp: Timestamp) -> Result<()> {
        let (table, column) = blob_table(kind);
        let sql = format!("INSERT OR REPLACE INTO {table} (username, {column}, updated_at) VALUES (?, ?, ?)");
        sqlx::query(&sql)
            .bind(key)
            .bind(encode(&data)?)
            .bind(timestamp)
            .execute(&self.pool)
            .await
            .map_err(AppError::storage)?;
        Ok(())
    }

    async fn delete(&self, kind: BlobKind, key: &str) -> Result<()> {
        let (table, _) = blob_table(kind);
        let sql = format!("DELETE FROM {table} WHERE username = ?");
        sqlx::query(&sql)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(AppError::storage)?;
        Ok(())
    }
}

#[async_trait]
impl RankingIndex for SqliteStore {
    /// Updates in place on conflict so the row keeps its position among ties.
    async fn upsert(&self, entry: RankingEntry) -> Result<()> {
        sqlx::query(
            "INSERT INTO ranking (username, level, power, class, updated_at) VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(username) DO UPDATE SET
                level = excluded.level,
                power = excluded.power,
                class = excluded.class,
                updated_at = excluded.updated_at",
        )
        .bind(&entry.username)
        .bind(entry.level)
        .bind(entry.power)
        .bind(&entry.class)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::storage)?;
        Ok(())
    }

    async fn top_n(&self, n: usize) -> Result<Vec<RankingEntry>> {
        let rows = sqlx::query_as::<_, RankingRow>(
            "SELECT username, level, power, class, updated_at FROM ranking
             ORDER BY power DESC, rowid ASC LIMIT ?",
        )
        .bind(limit(n))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::storage)?;
        Ok(rows.into_iter().map(RankingEntry::from).collect())
    }
}

#[async_trait]
impl RecruitBoard for SqliteStore {
    /// Owner replacement and insert share one transaction.
    async fn publish(&self, post: NewRecruitmentPost, now: Timestamp) -> Result<String> {
        let mut tx = self.pool.begin().await.map_err(AppError::storage)?;

        let replaced = sqlx::query("DELETE FROM party_recruits WHERE username = ?")
            .bind(&post.username)
            .execute(&mut *tx)
            .await
            .map_err(AppError::storage)?
            .rows_affected();

        sqlx::query(
            "INSERT OR REPLACE INTO party_recruits
                (id, username, class, level, power, message, max_members, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&post.id)
        .bind(&post.username)
        .bind(&post.class)
        .bind(post.level)
        .bind(post.power)
        .bind(&post.message)
        .bind(post.max_members)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(AppError::storage)?;

        tx.commit().await.map_err(AppError::storage)?;
        tracing::debug!(id = %post.id, replaced, "recruit row written");
        Ok(post.id)
    }

    async fn list_created_after(&self, cutoff: Timestamp) -> Result<Vec<RecruitmentPost>> {
        let rows = sqlx::query_as::<_, RecruitRow>(
            "SELECT * FROM party_recruits WHERE created_at > ? ORDER BY created_at DESC",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::storage)?;
        Ok(rows.into_iter().map(RecruitmentPost::from).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<RecruitmentPost>> {
        let row = sqlx::query_as::<_, RecruitRow>("SELECT * FROM party_recruits WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::storage)?;
        Ok(row.map(RecruitmentPost::from))
    }

    async fn remove(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM party_recruits WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::storage)?;
        Ok(())
    }
}

#[async_trait]
impl PartyRequestStore for SqliteStore {
    async fn send(&self, request: NewPartyRequest, now: Timestamp) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO party_requests
                (id, from_user, to_user, class, level, power, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.id)
        .bind(&request.from_user)
        .bind(&request.to_user)
        .bind(&request.class)
        .bind(request.level)
        .bind(request.power)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(AppError::storage)?;
        Ok(())
    }

    async fn list_for(&self, to_user: &str, cutoff: Timestamp) -> Result<Vec<PartyRequest>> {
        let rows = sqlx::query_as::<_, RequestRow>(
            "SELECT * FROM party_requests WHERE to_user = ? AND created_at > ? ORDER BY created_at DESC",
        )
        .bind(to_user)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::storage)?;
        Ok(rows.into_iter().map(PartyRequest::from).collect())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM party_requests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::storage)?;
        Ok(())
    }
}

#[async_trait]
impl PartyStore for SqliteStore {
    async fn save(&self, party_id: &str, leader: &str, data: Value, now: Timestamp) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO parties (party_id, leader, party_data, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(party_id)
        .bind(leader)
        .bind(encode(&data)?)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(AppError::storage)?;
        Ok(())
    }

    async fn get(&self, party_id: &str) -> Result<Option<PartyRecord>> {
        let row = sqlx::query_as::<_, PartyRow>("SELECT * FROM parties WHERE party_id = ?")
            .bind(party_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::storage)?;

        row.map(|row| {
            Ok(PartyRecord {
                party_id: row.party_id,
                leader: row.leader,
                data: decode(&row.party_data)?,
                updated_at: row.updated_at,
            })
        })
        .transpose()
    }

    async fn remove(&self, party_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM parties WHERE party_id = ?")
            .bind(party_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::storage)?;
        Ok(())
    }
}

#[async_trait]
impl BattleSessionStore for SqliteStore {
    /// A single upsert keeps the stored `created_at` on conflict.
    async fn save(&self, session_id: &str, data: Value, now: Timestamp) -> Result<BattleSession> {
        let created_at = sqlx::query_scalar::<_, i64>(
            "INSERT INTO battle_sessions (session_id, session_data, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(session_id) DO UPDATE SET
                session_data = excluded.session_data,
                updated_at = excluded.updated_at
             RETURNING created_at",
        )
        .bind(session_id)
        .bind(encode(&data)?)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::storage)?;

        Ok(BattleSession {
            session_id: session_id.to_string(),
            data,
            created_at,
            updated_at: now,
        })
    }

    async fn get(&self, session_id: &str) -> Result<Option<BattleSession>> {
        let row = sqlx::query_as::<_, SessionRow>("SELECT * FROM battle_sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::storage)?;

        row.map(|row| {
            Ok(BattleSession {
                session_id: row.session_id,
                data: decode(&row.session_data)?,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
        })
        .transpose()
    }

    async fn purge_updated_before(&self, cutoff: Timestamp) -> Result<u64> {
        let result = sqlx::query("DELETE FROM battle_sessions WHERE updated_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(AppError::storage)?;
        Ok(result.rows_affected())
    }
}
