//! # Recruitment Service
//!
//! "Looking for members" posts and the join requests players send in
//! response. Both are listed only inside the listing window; expired rows
//! are hidden, not deleted.

use std::sync::Arc;

use domains::{
    NewPartyRequest, NewRecruitmentPost, PartyRequest, PartyRequestStore, RecruitBoard, RecruitmentPost,
    Result, Timestamp,
};

use crate::expiry::listing_cutoff;

pub struct RecruitmentService {
    board: Arc<dyn RecruitBoard>,
}

impl RecruitmentService {
    pub fn new(board: Arc<dyn RecruitBoard>) -> Self {
        Self { board }
    }

    /// Replaces any earlier post by the same user.
    pub async fn publish(&self, post: NewRecruitmentPost, now: Timestamp) -> Result<String> {
        let username = post.username.clone();
        let id = self.board.publish(post, now).await?;
        tracing::debug!(%id, %username, "recruitment post published");
        Ok(id)
    }

    pub async fn list_visible(&self, now: Timestamp) -> Result<Vec<RecruitmentPost>> {
        self.board.list_created_after(listing_cutoff(now)).await
    }

    /// Direct lookup. Expired posts are still returned.
    pub async fn get(&self, id: &str) -> Result<Option<RecruitmentPost>> {
        self.board.get(id).await
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        self.board.remove(id).await
    }
}

pub struct PartyRequestService {
    requests: Arc<dyn PartyRequestStore>,
}

impl PartyRequestService {
    pub fn new(requests: Arc<dyn PartyRequestStore>) -> Self {
        Self { requests }
    }

    /// Upserts by id and returns it.
    pub async fn send(&self, request: NewPartyRequest, now: Timestamp) -> Result<String> {
        let id = request.id.clone();
        tracing::debug!(%id, from = %request.from_user, to = %request.to_user, "party request sent");
        self.requests.send(request, now).await?;
        Ok(id)
    }

    pub async fn list_for(&self, to_user: &str, now: Timestamp) -> Result<Vec<PartyRequest>> {
        self.requests.list_for(to_user, listing_cutoff(now)).await
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        self.requests.remove(id).await
    }
}
