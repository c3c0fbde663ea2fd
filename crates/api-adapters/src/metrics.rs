//! Prometheus counters for the write paths.

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;
use services::RankingSync;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct SyncLabels {
    pub outcome: String,
}

pub struct Metrics {
    registry: Registry,
    pub character_saves: Counter,
    pub ranking_syncs: Family<SyncLabels, Counter>,
    pub posts_published: Counter,
    pub sessions_purged: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        let character_saves = Counter::default();
        let ranking_syncs = Family::<SyncLabels, Counter>::default();
        let posts_published = Counter::default();
        let sessions_purged = Counter::default();

        let mut registry = Registry::with_prefix("questboard");
        registry.register(
            "character_saves",
            "Character sheets stored",
            character_saves.clone(),
        );
        registry.register(
            "ranking_syncs",
            "Leaderboard updates after a character save, by outcome",
            ranking_syncs.clone(),
        );
        registry.register(
            "recruit_posts_published",
            "Recruitment posts published",
            posts_published.clone(),
        );
        registry.register(
            "battle_sessions_purged",
            "Battle sessions removed by cleanup sweeps",
            sessions_purged.clone(),
        );

        Self {
            registry,
            character_saves,
            ranking_syncs,
            posts_published,
            sessions_purged,
        }
    }

    pub fn record_ranking(&self, sync: &RankingSync) {
        let outcome = match sync {
            RankingSync::Updated { .. } => "updated",
            RankingSync::Skipped { .. } => "skipped",
            RankingSync::Failed { .. } => "failed",
        };
        self.ranking_syncs
            .get_or_create(&SyncLabels {
                outcome: outcome.to_string(),
            })
            .inc();
    }

    /// OpenMetrics text exposition of every registered metric.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
