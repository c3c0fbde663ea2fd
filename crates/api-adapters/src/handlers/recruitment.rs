//! Recruitment board and party join requests.
//!
//! Request bodies use the client's camelCase field names; listings are
//! returned with snake_case columns.

use axum::extract::{Path, State};
use axum::Json;
use domains::{NewPartyRequest, NewRecruitmentPost};
use serde::Deserialize;
use serde_json::{json, Value};

use super::now_millis;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitBody {
    pub id: String,
    pub username: String,
    pub class: String,
    pub level: i64,
    pub power: i64,
    pub message: String,
    pub max_members: i64,
}

impl From<RecruitBody> for NewRecruitmentPost {
    fn from(body: RecruitBody) -> Self {
        NewRecruitmentPost {
            id: body.id,
            username: body.username,
            class: body.class,
            level: body.level,
            power: body.power,
            message: body.message,
            max_members: body.max_members,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyRequestBody {
    pub id: String,
    pub from_user: String,
    pub to_user: String,
    pub class: String,
    pub level: i64,
    pub power: i64,
}

impl From<PartyRequestBody> for NewPartyRequest {
    fn from(body: PartyRequestBody) -> Self {
        NewPartyRequest {
            id: body.id,
            from_user: body.from_user,
            to_user: body.to_user,
            class: body.class,
            level: body.level,
            power: body.power,
        }
    }
}

pub async fn list_recruits(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let recruits = state.services.recruitment.list_visible(now_millis()).await?;
    Ok(Json(json!({ "recruits": recruits })))
}

pub async fn publish_recruit(State(state): State<AppState>, Json(body): Json<RecruitBody>) -> ApiResult<Json<Value>> {
    let id = state
        .services
        .recruitment
        .publish(body.into(), now_millis())
        .await?;
    state.metrics.posts_published.inc();
    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn remove_recruit(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    state.services.recruitment.remove(&id).await?;
    Ok(Json(json!({ "success": true })))
}

/// `GET /api/party-requests/{username}`: requests addressed to `username`.
pub async fn list_requests(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<Json<Value>> {
    let requests = state.services.requests.list_for(&username, now_millis()).await?;
    Ok(Json(json!({ "requests": requests })))
}

pub async fn send_request(
    State(state): State<AppState>,
    Json(body): Json<PartyRequestBody>,
) -> ApiResult<Json<Value>> {
    let id = state.services.requests.send(body.into(), now_millis()).await?;
    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn remove_request(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    state.services.requests.remove(&id).await?;
    Ok(Json(json!({ "success": true })))
}
