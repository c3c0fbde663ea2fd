//! Character, inventory and leaderboard routes.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use services::Inventory;

use super::now_millis;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InventoryBody {
    pub items: Value,
}

pub async fn get_character(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<Json<Value>> {
    let blob = state.services.players.load_character(&username).await?;
    Ok(Json(json!({
        "username": blob.key,
        "data": blob.data,
        "updated_at": blob.updated_at,
    })))
}

/// Stores the sheet and reports the leaderboard outcome alongside it.
pub async fn save_character(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(character): Json<Value>,
) -> ApiResult<Json<Value>> {
    let saved = state
        .services
        .players
        .save_character(&username, character, now_millis())
        .await?;

    state.metrics.character_saves.inc();
    state.metrics.record_ranking(&saved.ranking);

    Ok(Json(json!({
        "success": true,
        "updated_at": saved.updated_at,
        "ranking": saved.ranking,
    })))
}

/// A player with no stored inventory gets `{ "items": [] }`.
pub async fn get_inventory(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<Json<Inventory>> {
    let inventory = state.services.players.load_inventory(&username).await?;
    Ok(Json(inventory))
}

pub async fn save_inventory(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(body): Json<InventoryBody>,
) -> ApiResult<Json<Value>> {
    let updated_at = state
        .services
        .players
        .save_inventory(&username, body.items, now_millis())
        .await?;
    Ok(Json(json!({ "success": true, "updated_at": updated_at })))
}

pub async fn ranking(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let ranking = state.services.players.ranking(state.ranking_limit).await?;
    Ok(Json(json!({ "ranking": ranking })))
}
