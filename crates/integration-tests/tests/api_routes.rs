//! HTTP surface tests driven through `tower::ServiceExt::oneshot`.

use api_adapters::{build_router, AppState};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use integration_tests::memory_services;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    build_router(AppState::new(memory_services(), 100), 1024 * 1024)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn call_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = call(app, method, uri, body).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = call_json(&app(), Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn character_save_feeds_the_ranking() {
    let app = app();
    let sheet = json!({ "level": 12, "class": "mage", "maxHp": 0, "equipment": [] });

    let (status, saved) = call_json(&app, Method::POST, "/api/character/alice", Some(sheet.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["success"], true);
    assert_eq!(saved["ranking"]["status"], "updated");
    assert_eq!(saved["ranking"]["power"], 65);

    let (status, loaded) = call_json(&app, Method::GET, "/api/character/alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded["username"], "alice");
    assert_eq!(loaded["data"], sheet);
    assert_eq!(loaded["updated_at"], saved["updated_at"]);

    let (_, ranking) = call_json(&app, Method::GET, "/api/ranking", None).await;
    let rows = ranking["ranking"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["username"], "alice");
    assert_eq!(rows[0]["level"], 12);
    assert_eq!(rows[0]["power"], 65);
}

#[tokio::test]
async fn sheet_without_class_is_saved_but_not_ranked() {
    let app = app();
    let (status, saved) = call_json(&app, Method::POST, "/api/character/bo", Some(json!({ "level": 2 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["ranking"]["status"], "skipped");

    let (_, ranking) = call_json(&app, Method::GET, "/api/ranking", None).await;
    assert!(ranking["ranking"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_character_is_404() {
    let (status, body) = call_json(&app(), Method::GET, "/api/character/nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("nobody"));
}

#[tokio::test]
async fn inventory_defaults_to_empty_list() {
    let app = app();
    let (status, body) = call_json(&app, Method::GET, "/api/inventory/newbie", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "items": [] }));

    let items = json!([{ "id": "herb", "qty": 2 }]);
    let (status, _) = call_json(
        &app,
        Method::POST,
        "/api/inventory/newbie",
        Some(json!({ "items": items.clone() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call_json(&app, Method::GET, "/api/inventory/newbie", None).await;
    assert_eq!(body["items"], items);
    assert!(body["updated_at"].is_i64());
}

#[tokio::test]
async fn recruit_posts_replace_per_user() {
    let app = app();
    for id in ["r1", "r2"] {
        let (status, body) = call_json(
            &app,
            Method::POST,
            "/api/party-recruits",
            Some(json!({
                "id": id,
                "username": "bob",
                "class": "knight",
                "level": 8,
                "power": 240,
                "message": "crypt run",
                "maxMembers": 4
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id);
    }

    let (_, body) = call_json(&app, Method::GET, "/api/party-recruits", None).await;
    let recruits = body["recruits"].as_array().unwrap();
    assert_eq!(recruits.len(), 1);
    assert_eq!(recruits[0]["id"], "r2");
    assert_eq!(recruits[0]["max_members"], 4);

    let (status, body) = call_json(&app, Method::DELETE, "/api/party-recruits/r2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let (status, _) = call_json(&app, Method::DELETE, "/api/party-recruits/r2", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_recruit_body_is_rejected() {
    let (status, _) = call(
        &app(),
        Method::POST,
        "/api/party-recruits",
        Some(json!({ "id": "r1", "username": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn party_requests_round_trip() {
    let app = app();
    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/party-requests",
        Some(json!({
            "id": "q1",
            "fromUser": "carol",
            "toUser": "bob",
            "class": "cleric",
            "level": 6,
            "power": 150
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "q1");

    let (_, body) = call_json(&app, Method::GET, "/api/party-requests/bob", None).await;
    let requests = body["requests"].as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["from_user"], "carol");

    let (_, body) = call_json(&app, Method::GET, "/api/party-requests/carol", None).await;
    assert!(body["requests"].as_array().unwrap().is_empty());

    let (status, _) = call_json(&app, Method::DELETE, "/api/party-requests/q1", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call_json(&app, Method::GET, "/api/party-requests/bob", None).await;
    assert!(body["requests"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn party_requires_a_leader() {
    let app = app();
    let (status, _) = call_json(&app, Method::POST, "/api/party/p1", Some(json!({ "members": [] }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let roster = json!({ "leader": "dana", "members": ["dana", "finn"] });
    let (status, _) = call_json(&app, Method::POST, "/api/party/p1", Some(roster.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call_json(&app, Method::GET, "/api/party/p1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["party_id"], "p1");
    assert_eq!(body["data"], roster);

    let (status, _) = call_json(&app, Method::DELETE, "/api/party/p1", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call_json(&app, Method::GET, "/api/party/p1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn battle_session_keeps_created_at_across_saves() {
    let app = app();
    let (status, _) = call_json(&app, Method::POST, "/api/battle-session/s1", Some(json!({ "turn": 1 }))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, first) = call_json(&app, Method::GET, "/api/battle-session/s1", None).await;

    let (status, _) = call_json(&app, Method::POST, "/api/battle-session/s1", Some(json!({ "turn": 2 }))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = call_json(&app, Method::GET, "/api/battle-session/s1", None).await;

    assert_eq!(second["created_at"], first["created_at"]);
    assert_eq!(second["data"], json!({ "turn": 2 }));
    assert!(second["updated_at"].as_i64() >= first["updated_at"].as_i64());

    // a fresh session is not idle yet
    let (status, body) = call_json(&app, Method::DELETE, "/api/battle-sessions/cleanup", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 0);
}

#[tokio::test]
async fn metrics_count_character_saves() {
    let app = app();
    call(&app, Method::POST, "/api/character/zed", Some(json!({ "level": 1, "class": "monk" }))).await;

    let (status, bytes) = call(&app, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("questboard_character_saves_total 1"));
    assert!(text.contains("outcome=\"updated\""));
}
