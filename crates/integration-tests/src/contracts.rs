//! Behaviour every port implementation must share.

use domains::{
    BattleSessionStore, BlobKind, BlobStore, PartyRequestStore, PartyStore, RankingEntry, RankingIndex,
    RecruitBoard,
};
use serde_json::json;

use crate::{party_request, recruit, MINUTE, T0};

fn entry(username: &str, level: i64, power: i64, updated_at: i64) -> RankingEntry {
    RankingEntry {
        username: username.to_string(),
        level,
        power,
        class: "mage".to_string(),
        updated_at,
    }
}

pub async fn blob_store(store: &dyn BlobStore) {
    store
        .put(BlobKind::Character, "alice", json!({ "level": 1 }), T0)
        .await
        .unwrap();
    store
        .put(BlobKind::Character, "alice", json!({ "level": 2 }), T0 + 1)
        .await
        .unwrap();

    let blob = store.get(BlobKind::Character, "alice").await.unwrap().unwrap();
    assert_eq!(blob.key, "alice");
    assert_eq!(blob.data, json!({ "level": 2 }));
    assert_eq!(blob.updated_at, T0 + 1);

    assert!(store.get(BlobKind::Inventory, "alice").await.unwrap().is_none());

    store.delete(BlobKind::Character, "alice").await.unwrap();
    store.delete(BlobKind::Character, "alice").await.unwrap();
    assert!(store.get(BlobKind::Character, "alice").await.unwrap().is_none());
}

pub async fn ranking_index(index: &dyn RankingIndex) {
    index.upsert(entry("alice", 10, 500, T0)).await.unwrap();
    index.upsert(entry("bob", 9, 700, T0)).await.unwrap();
    index.upsert(entry("alice", 12, 900, T0 + 1)).await.unwrap();

    let top = index.top_n(10).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0], entry("alice", 12, 900, T0 + 1));
    assert_eq!(top[1].username, "bob");

    let first = index.top_n(1).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].username, "alice");

    assert!(index.top_n(0).await.unwrap().is_empty());
}

pub async fn recruit_board(board: &dyn RecruitBoard) {
    board.publish(recruit("r1", "bob"), T0).await.unwrap();
    board.publish(recruit("c1", "carol"), T0 + MINUTE).await.unwrap();
    let id = board.publish(recruit("r2", "bob"), T0 + 2 * MINUTE).await.unwrap();
    assert_eq!(id, "r2");

    assert!(board.get("r1").await.unwrap().is_none());

    let listed = board.list_created_after(T0 - MINUTE).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["r2", "c1"]);

    // carol's post (created at T0+1m) is excluded once the cutoff reaches it
    let listed = board.list_created_after(T0 + MINUTE).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "r2");
    assert_eq!(listed[0].created_at, T0 + 2 * MINUTE);
    assert_eq!(listed[0].max_members, 4);

    board.remove("c1").await.unwrap();
    board.remove("c1").await.unwrap();
    assert!(board.get("c1").await.unwrap().is_none());
}

pub async fn party_requests(store: &dyn PartyRequestStore) {
    store.send(party_request("q1", "carol", "bob"), T0).await.unwrap();
    store.send(party_request("q2", "dana", "bob"), T0 + MINUTE).await.unwrap();
    store.send(party_request("q3", "dana", "erin"), T0).await.unwrap();

    let for_bob = store.list_for("bob", T0 - MINUTE).await.unwrap();
    let ids: Vec<_> = for_bob.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["q2", "q1"]);

    // same id overwrites in place and restamps
    store.send(party_request("q1", "carol", "bob"), T0 + 2 * MINUTE).await.unwrap();
    let for_bob = store.list_for("bob", T0 - MINUTE).await.unwrap();
    assert_eq!(for_bob.len(), 2);
    assert_eq!(for_bob[0].id, "q1");
    assert_eq!(for_bob[0].created_at, T0 + 2 * MINUTE);

    let recent = store.list_for("bob", T0 + MINUTE).await.unwrap();
    assert_eq!(recent.len(), 1);

    store.remove("q1").await.unwrap();
    store.remove("missing").await.unwrap();
    assert_eq!(store.list_for("bob", T0 - MINUTE).await.unwrap().len(), 1);
}

pub async fn party_store(store: &dyn PartyStore) {
    store
        .save("p1", "dana", json!({ "leader": "dana", "members": ["dana"] }), T0)
        .await
        .unwrap();
    store
        .save("p1", "dana", json!({ "leader": "dana", "members": ["dana", "finn"] }), T0 + 5)
        .await
        .unwrap();

    let party = store.get("p1").await.unwrap().unwrap();
    assert_eq!(party.leader, "dana");
    assert_eq!(party.updated_at, T0 + 5);
    assert_eq!(party.data["members"], json!(["dana", "finn"]));

    store.remove("p1").await.unwrap();
    store.remove("p1").await.unwrap();
    assert!(store.get("p1").await.unwrap().is_none());
}

pub async fn battle_sessions(store: &dyn BattleSessionStore) {
    let first = store.save("s1", json!({ "round": 1 }), T0).await.unwrap();
    assert_eq!((first.created_at, first.updated_at), (T0, T0));

    store
        .save("s1", json!({ "round": 2 }), T0 + 10 * MINUTE)
        .await
        .unwrap();
    store.save("s2", json!({ "round": 1 }), T0 + 30 * MINUTE).await.unwrap();

    let s1 = store.get("s1").await.unwrap().unwrap();
    assert_eq!(s1.created_at, T0);
    assert_eq!(s1.updated_at, T0 + 10 * MINUTE);
    assert_eq!(s1.data, json!({ "round": 2 }));

    assert_eq!(store.purge_updated_before(T0 + 20 * MINUTE).await.unwrap(), 1);
    assert_eq!(store.purge_updated_before(T0 + 20 * MINUTE).await.unwrap(), 0);
    assert!(store.get("s1").await.unwrap().is_none());
    assert!(store.get("s2").await.unwrap().is_some());

    // the cutoff itself is exclusive: a session updated exactly at it stays
    assert_eq!(store.purge_updated_before(T0 + 30 * MINUTE).await.unwrap(), 0);
    assert!(store.get("s2").await.unwrap().is_some());
    assert_eq!(store.purge_updated_before(T0 + 30 * MINUTE + 1).await.unwrap(), 1);
    assert!(store.get("s2").await.unwrap().is_none());
}
