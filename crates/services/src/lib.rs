//! # services
//!
//! Game-facing operations built on the `domains` ports: the power formula,
//! the leaderboard write-through, and the expiry rules for ephemeral records.
//! Nothing here reads a clock; every operation takes `now` from its caller.

pub mod expiry;
pub mod players;
pub mod power;
pub mod recruitment;
pub mod sessions;

use std::sync::Arc;

use domains::{BattleSessionStore, BlobStore, PartyRequestStore, PartyStore, RankingIndex, RecruitBoard};

pub use players::{CharacterSaved, Inventory, PlayerService, RankingSync};
pub use power::compute_power;
pub use recruitment::{PartyRequestService, RecruitmentService};
pub use sessions::{BattleService, PartyService};

/// One handle per port. Adapters usually back all of them with a single
/// shared store.
#[derive(Clone)]
pub struct Stores {
    pub blobs: Arc<dyn BlobStore>,
    pub ranking: Arc<dyn RankingIndex>,
    pub recruits: Arc<dyn RecruitBoard>,
    pub requests: Arc<dyn PartyRequestStore>,
    pub parties: Arc<dyn PartyStore>,
    pub sessions: Arc<dyn BattleSessionStore>,
}

impl Stores {
    /// Uses one store for every port.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: BlobStore + RankingIndex + RecruitBoard + PartyRequestStore + PartyStore + BattleSessionStore + 'static,
    {
        Self {
            blobs: store.clone(),
            ranking: store.clone(),
            recruits: store.clone(),
            requests: store.clone(),
            parties: store.clone(),
            sessions: store,
        }
    }
}

/// Every service, wired to the same set of stores.
pub struct Services {
    pub players: PlayerService,
    pub recruitment: RecruitmentService,
    pub requests: PartyRequestService,
    pub parties: PartyService,
    pub battles: BattleService,
}

impl Services {
    pub fn new(stores: Stores) -> Self {
        Self {
            players: PlayerService::new(stores.blobs, stores.ranking),
            recruitment: RecruitmentService::new(stores.recruits),
            requests: PartyRequestService::new(stores.requests),
            parties: PartyService::new(stores.parties),
            battles: BattleService::new(stores.sessions),
        }
    }
}
