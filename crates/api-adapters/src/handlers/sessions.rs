//! Party rosters and cooperative battle sessions.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use super::now_millis;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_party(State(state): State<AppState>, Path(party_id): Path<String>) -> ApiResult<Json<Value>> {
    let party = state.services.parties.get(&party_id).await?;
    Ok(Json(json!({
        "party_id": party.party_id,
        "data": party.data,
        "updated_at": party.updated_at,
    })))
}

pub async fn save_party(
    State(state): State<AppState>,
    Path(party_id): Path<String>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<Value>> {
    let updated_at = state.services.parties.save(&party_id, payload, now_millis()).await?;
    Ok(Json(json!({ "success": true, "updated_at": updated_at })))
}

pub async fn remove_party(State(state): State<AppState>, Path(party_id): Path<String>) -> ApiResult<Json<Value>> {
    state.services.parties.remove(&party_id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn get_battle(State(state): State<AppState>, Path(session_id): Path<String>) -> ApiResult<Json<Value>> {
    let session = state.services.battles.get(&session_id).await?;
    Ok(Json(json!({
        "session_id": session.session_id,
        "data": session.data,
        "created_at": session.created_at,
        "updated_at": session.updated_at,
    })))
}

pub async fn save_battle(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<Value>> {
    let session = state.services.battles.save(&session_id, payload, now_millis()).await?;
    Ok(Json(json!({ "success": true, "updated_at": session.updated_at })))
}

/// One-shot sweep; nothing schedules this on the server side.
pub async fn cleanup_battles(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let deleted = state.services.battles.purge_expired(now_millis()).await?;
    state.metrics.sessions_purged.inc_by(deleted);
    Ok(Json(json!({ "success": true, "deleted": deleted })))
}
