//! Runs the shared contract suites against each store implementation.

use integration_tests::contracts;
use storage_adapters::MemoryStore;

#[tokio::test]
async fn memory_blob_store() {
    contracts::blob_store(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_ranking_index() {
    contracts::ranking_index(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_recruit_board() {
    contracts::recruit_board(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_party_requests() {
    contracts::party_requests(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_party_store() {
    contracts::party_store(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_battle_sessions() {
    contracts::battle_sessions(&MemoryStore::new()).await;
}

#[cfg(feature = "db-sqlite")]
mod sqlite {
    use integration_tests::contracts;
    use storage_adapters::SqliteStore;

    async fn store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:").await.expect("in-memory sqlite")
    }

    #[tokio::test]
    async fn sqlite_blob_store() {
        contracts::blob_store(&store().await).await;
    }

    #[tokio::test]
    async fn sqlite_ranking_index() {
        contracts::ranking_index(&store().await).await;
    }

    #[tokio::test]
    async fn sqlite_recruit_board() {
        contracts::recruit_board(&store().await).await;
    }

    #[tokio::test]
    async fn sqlite_party_requests() {
        contracts::party_requests(&store().await).await;
    }

    #[tokio::test]
    async fn sqlite_party_store() {
        contracts::party_store(&store().await).await;
    }

    #[tokio::test]
    async fn sqlite_battle_sessions() {
        contracts::battle_sessions(&store().await).await;
    }

    #[tokio::test]
    async fn sqlite_data_survives_reconnect() {
        let dir = std::env::temp_dir().join(format!("questboard-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let url = format!("sqlite:{}", dir.join("reconnect.db").display());

        {
            let store = SqliteStore::connect(&url).await.unwrap();
            domains::RankingIndex::upsert(
                &store,
                domains::RankingEntry {
                    username: "gale".into(),
                    level: 20,
                    power: 1200,
                    class: "wizard".into(),
                    updated_at: 1,
                },
            )
            .await
            .unwrap();
        }

        let reopened = SqliteStore::connect(&url).await.unwrap();
        let top = domains::RankingIndex::top_n(&reopened, 5).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].username, "gale");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
