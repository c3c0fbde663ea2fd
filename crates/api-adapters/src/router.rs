use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, players, recruitment, sessions};
use crate::state::AppState;

/// Builds the full route table.
///
/// `GET /api/party-requests/{id}` treats the segment as the recipient's
/// username; `DELETE` on the same path treats it as a request id.
pub fn build_router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/", get(health::index))
        .route("/metrics", get(health::metrics))
        .route(
            "/api/character/{username}",
            get(players::get_character).post(players::save_character),
        )
        .route(
            "/api/inventory/{username}",
            get(players::get_inventory).post(players::save_inventory),
        )
        .route("/api/ranking", get(players::ranking))
        .route(
            "/api/party-recruits",
            get(recruitment::list_recruits).post(recruitment::publish_recruit),
        )
        .route("/api/party-recruits/{id}", delete(recruitment::remove_recruit))
        .route("/api/party-requests", post(recruitment::send_request))
        .route(
            "/api/party-requests/{id}",
            get(recruitment::list_requests).delete(recruitment::remove_request),
        )
        .route(
            "/api/party/{party_id}",
            get(sessions::get_party)
                .post(sessions::save_party)
                .delete(sessions::remove_party),
        )
        .route(
            "/api/battle-session/{session_id}",
            get(sessions::get_battle).post(sessions::save_battle),
        )
        .route("/api/battle-sessions/cleanup", delete(sessions::cleanup_battles))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
