//! Room service — registry, admission, relay, and part.
//!
//! DESIGN
//! ======
//! Rooms are created through the HTTP API and live in the registry for the
//! life of the process. Admission to a room's socket checks the registry and
//! the capacity under one write lock on the live map, so two racing joins can
//! never both take the last seat.
//!
//! Relay is last-writer-wins: each inbound document replaces the registry
//! copy and is forwarded verbatim to every other client in the room.
//! Forwarding is best-effort. A client whose outbound channel is full misses
//! that frame, and if it was the room's last edit the client stays behind
//! until the next one arrives.

use frames::RoomSummary;
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::state::{AppState, LiveRoom};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RoomError {
    #[error("room not found: {0}")]
    NotFound(Uuid),
    #[error("Room {room_id} is full (Max: {capacity})")]
    Full { room_id: Uuid, capacity: usize },
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Register a new, empty room.
pub async fn create_room(state: &AppState) -> RoomSummary {
    let room_id = Uuid::new_v4();
    state.registry.write().await.insert(room_id, String::new());
    info!(%room_id, "room created");
    summary(room_id, String::new())
}

/// Every registered room.
pub async fn list_rooms(state: &AppState) -> Vec<RoomSummary> {
    let registry = state.registry.read().await;
    registry.iter().map(|(id, content)| summary(*id, content.clone())).collect()
}

pub async fn room_exists(state: &AppState, room_id: Uuid) -> bool {
    state.registry.read().await.contains_key(&room_id)
}

fn summary(room_id: Uuid, content: String) -> RoomSummary {
    RoomSummary { id: room_id.to_string(), content: Some(content) }
}

// =============================================================================
// JOIN / PART
// =============================================================================

/// Admit a client and return the room's current document.
///
/// # Errors
///
/// [`RoomError::NotFound`] for an unregistered room and [`RoomError::Full`]
/// when the room is at capacity.
pub async fn join_room(
    state: &AppState,
    room_id: Uuid,
    client_id: Uuid,
    tx: mpsc::Sender<String>,
) -> Result<String, RoomError> {
    let content = state.registry.read().await.get(&room_id).cloned().ok_or(RoomError::NotFound(room_id))?;

    let mut live = state.live.write().await;
    let room = live.entry(room_id).or_insert_with(LiveRoom::new);
    if room.clients.len() >= state.room_capacity {
        if room.clients.is_empty() {
            live.remove(&room_id);
        }
        return Err(RoomError::Full { room_id, capacity: state.room_capacity });
    }

    room.clients.insert(client_id, tx);
    info!(%room_id, %client_id, clients = room.clients.len(), "client joined room");
    Ok(content)
}

/// Remove a client, evicting the live room when it empties.
pub async fn part_room(state: &AppState, room_id: Uuid, client_id: Uuid) {
    let mut live = state.live.write().await;
    let Some(room) = live.get_mut(&room_id) else {
        return;
    };

    room.clients.remove(&client_id);
    info!(%room_id, %client_id, remaining = room.clients.len(), "client left room");

    if room.clients.is_empty() {
        live.remove(&room_id);
        info!(%room_id, "evicted live room");
    }
}

// =============================================================================
// RELAY
// =============================================================================

/// Record `text` as the room's document.
pub async fn store_content(state: &AppState, room_id: Uuid, text: &str) {
    if let Some(content) = state.registry.write().await.get_mut(&room_id) {
        text.clone_into(content);
    }
}

/// Send `text` to every client in the room except `exclude`.
pub async fn broadcast(state: &AppState, room_id: Uuid, text: &str, exclude: Option<Uuid>) {
    let live = state.live.read().await;
    let Some(room) = live.get(&room_id) else {
        return;
    };

    for (client_id, tx) in &room.clients {
        if exclude == Some(*client_id) {
            continue;
        }
        // Best-effort: a client with a full channel misses this frame.
        let _ = tx.try_send(text.to_owned());
    }
}

#[cfg(test)]
#[path = "room_test.rs"]
mod tests;
