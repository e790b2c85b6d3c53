//! Room registry client — create, list, and validate-before-join.
//!
//! The registry lives behind plain request/response calls. Joining never opens
//! a socket for an id the registry does not list; every failure here turns
//! into a message for the user instead of propagating further.

use std::fmt;

use frames::{ROOMS_PATH, RoomSummary};
use tracing::{info, warn};

use crate::config::ClientConfig;

/// Opaque, externally issued room identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// Wrap a raw id, trimming surrounding whitespace. `None` when nothing is left.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() { None } else { Some(Self(trimmed.to_owned())) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RoomsError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("server returned an empty room id")]
    EmptyId,
}

/// Why a join attempt was refused. `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    #[error("Please enter a Room ID.")]
    EmptyId,
    #[error("Room ID '{0}' not found. Please check the ID or create a new room.")]
    NotFound(String),
    #[error("Error connecting to backend. Is the server running?")]
    Unreachable,
}

#[derive(Clone)]
pub struct RoomsClient {
    http: reqwest::Client,
    url: String,
}

impl RoomsClient {
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self { http: reqwest::Client::new(), url: config.api_url(ROOMS_PATH) }
    }

    /// `POST /rooms`.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success statuses, and an empty id in the reply.
    pub async fn create_room(&self) -> Result<RoomId, RoomsError> {
        let response = self.http.post(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RoomsError::Status(status.as_u16()));
        }
        let room = response.json::<RoomSummary>().await?;
        let id = RoomId::parse(&room.id).ok_or(RoomsError::EmptyId)?;
        info!(room_id = %id, "room created");
        Ok(id)
    }

    /// `GET /rooms`.
    ///
    /// # Errors
    ///
    /// Transport failures and non-success statuses.
    pub async fn list_rooms(&self) -> Result<Vec<RoomSummary>, RoomsError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RoomsError::Status(status.as_u16()));
        }
        Ok(response.json::<Vec<RoomSummary>>().await?)
    }

    /// Validate user input against the registry before any socket is opened.
    ///
    /// # Errors
    ///
    /// [`JoinError::EmptyId`] for blank input (no request is made),
    /// [`JoinError::NotFound`] when the id is not listed, and
    /// [`JoinError::Unreachable`] when the listing itself fails.
    pub async fn resolve_join(&self, input: &str) -> Result<RoomId, JoinError> {
        let id = RoomId::parse(input).ok_or(JoinError::EmptyId)?;

        let rooms = match self.list_rooms().await {
            Ok(rooms) => rooms,
            Err(e) => {
                warn!(error = %e, "room listing failed");
                return Err(JoinError::Unreachable);
            }
        };

        if rooms.iter().any(|room| room.id == id.as_str()) {
            Ok(id)
        } else {
            Err(JoinError::NotFound(id.0))
        }
    }
}

#[cfg(test)]
#[path = "rooms_test.rs"]
mod tests;
