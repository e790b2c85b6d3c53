//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the room registry, the suggestion endpoint, and the
//! per-room sockets. Every route is open to any origin.

pub mod autocomplete;
pub mod rooms;
pub mod ws;

use axum::Json;
use axum::Router;
use axum::routing::{get, post};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route(frames::ROOMS_PATH, get(rooms::list_rooms).post(rooms::create_room))
        .route(frames::AUTOCOMPLETE_PATH, post(autocomplete::autocomplete))
        .route("/ws/room/{room_id}", get(ws::handle_ws))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "message": "ok" }))
}

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use tokio::net::TcpListener;

    /// Serve the full app on an ephemeral port and return its `host:port`.
    pub async fn spawn_app(state: AppState) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });
        addr.to_string()
    }
}
