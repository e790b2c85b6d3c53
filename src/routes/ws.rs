//! Room socket handler — whole-document relay.
//!
//! DESIGN
//! ======
//! Each connection gets a client ID and a bounded outbound channel, then
//! enters a `select!` loop:
//! - Inbound text from the client → becomes the room's document and is
//!   relayed to every peer
//! - Text from peers → forwarded to the client
//!
//! LIFECYCLE
//! =========
//! 1. Unknown or malformed room id → 404 before upgrade
//! 2. Upgrade → admission; a full room is closed with code 1013
//! 3. Peers get `{"joined": ...}`; the newcomer gets the current document
//! 4. Close → part (evicting an empty room) → peers get `{"left": ...}`

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use frames::{Frame, encode_frame};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::services::room::{self, RoomError};
use crate::state::AppState;

/// Close code for a room at capacity ("try again later").
const CLOSE_TRY_AGAIN_LATER: u16 = 1013;

const JOINED_MESSAGE: &str = "new user joined";
const LEFT_MESSAGE: &str = "User left the room";

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    let Ok(room_id) = Uuid::parse_str(&room_id) else {
        return (StatusCode::NOT_FOUND, "room not found").into_response();
    };
    if !room::room_exists(&state, room_id).await {
        return (StatusCode::NOT_FOUND, "room not found").into_response();
    }

    ws.on_upgrade(move |socket| run_ws(socket, state, room_id))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, room_id: Uuid) {
    let client_id = Uuid::new_v4();

    // Per-connection channel for receiving relayed text from peers.
    let (client_tx, mut client_rx) = mpsc::channel::<String>(256);

    let content = match room::join_room(&state, room_id, client_id, client_tx).await {
        Ok(content) => content,
        Err(e) => {
            refuse(&mut socket, &e).await;
            return;
        }
    };

    room::broadcast(&state, room_id, &encode_frame(&Frame::joined(JOINED_MESSAGE)), Some(client_id)).await;
    info!(%room_id, %client_id, "ws: client connected");

    if !content.is_empty() && socket.send(Message::Text(content.into())).await.is_err() {
        leave(&state, room_id, client_id).await;
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        room::store_content(&state, room_id, text.as_str()).await;
                        room::broadcast(&state, room_id, text.as_str(), Some(client_id)).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(text) = client_rx.recv() => {
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    leave(&state, room_id, client_id).await;
}

async fn leave(state: &AppState, room_id: Uuid, client_id: Uuid) {
    room::part_room(state, room_id, client_id).await;
    room::broadcast(state, room_id, &encode_frame(&Frame::left(LEFT_MESSAGE)), Some(client_id)).await;
    info!(%room_id, %client_id, "ws: client disconnected");
}

async fn refuse(socket: &mut WebSocket, error: &RoomError) {
    warn!(error = %error, "ws: join refused");
    let close = CloseFrame { code: CLOSE_TRY_AGAIN_LATER, reason: error.to_string().into() };
    let _ = socket.send(Message::Close(Some(close))).await;
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
