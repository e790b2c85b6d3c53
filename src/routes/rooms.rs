//! Room registry endpoints.

use axum::Json;
use axum::extract::State;
use frames::RoomSummary;

use crate::services;
use crate::state::AppState;

pub async fn create_room(State(state): State<AppState>) -> Json<RoomSummary> {
    Json(services::room::create_room(&state).await)
}

pub async fn list_rooms(State(state): State<AppState>) -> Json<Vec<RoomSummary>> {
    Json(services::room::list_rooms(&state).await)
}

#[cfg(test)]
#[path = "rooms_test.rs"]
mod tests;
