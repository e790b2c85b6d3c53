//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds two maps: the room registry (every room ever created, with its last
//! document) and the live rooms (clients currently connected). A live entry
//! exists only while at least one client is connected; the registry entry
//! outlives it for the life of the process.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::services::completer::{Completer, StaticCompleter};

// =============================================================================
// ROOM STATE
// =============================================================================

/// Per-room connection set.
pub struct LiveRoom {
    /// Connected clients: `client_id` -> sender for outgoing text frames.
    pub clients: HashMap<Uuid, mpsc::Sender<String>>,
}

impl LiveRoom {
    #[must_use]
    pub fn new() -> Self {
        Self { clients: HashMap::new() }
    }
}

impl Default for LiveRoom {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

#[derive(Clone)]
pub struct AppState {
    /// Room id -> last document. Empty until someone types.
    pub registry: Arc<RwLock<HashMap<Uuid, String>>>,
    pub live: Arc<RwLock<HashMap<Uuid, LiveRoom>>>,
    pub room_capacity: usize,
    pub completer: Arc<dyn Completer>,
}

impl AppState {
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_completer(config.room_capacity, Arc::new(StaticCompleter::new(config.suggestion.clone())))
    }

    #[must_use]
    pub fn with_completer(room_capacity: usize, completer: Arc<dyn Completer>) -> Self {
        Self {
            registry: Arc::new(RwLock::new(HashMap::new())),
            live: Arc::new(RwLock::new(HashMap::new())),
            room_capacity,
            completer,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
