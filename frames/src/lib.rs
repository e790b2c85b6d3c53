//! Shared wire model for the room socket and the HTTP API.
//!
//! This crate owns the representation used by both the relay server and the
//! editing client. The room socket carries plain text frames: a small JSON
//! object announces presence changes, anything else is the full document.
//! Classification happens once, here, so nothing downstream probes payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collection endpoint for room creation and listing.
pub const ROOMS_PATH: &str = "/rooms";

/// Suggestion endpoint.
pub const AUTOCOMPLETE_PATH: &str = "/autocomplete";

/// Content-language tag sent with every suggestion request.
pub const DEFAULT_LANGUAGE: &str = "python";

const JOINED_KEY: &str = "joined";
const LEFT_KEY: &str = "left";

// =============================================================================
// FRAMES
// =============================================================================

/// Presence change announced by the relay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Joined,
    Left,
}

impl Presence {
    /// JSON key carrying this presence change on the wire.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Joined => JOINED_KEY,
            Self::Left => LEFT_KEY,
        }
    }
}

/// One discrete message on the room socket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// Presence announcement. `who` is whatever the relay put in the payload.
    Control { kind: Presence, who: String },
    /// The full current document. Always a whole-state replace, never a delta.
    Content { text: String },
}

impl Frame {
    #[must_use]
    pub fn joined(who: impl Into<String>) -> Self {
        Self::Control { kind: Presence::Joined, who: who.into() }
    }

    #[must_use]
    pub fn left(who: impl Into<String>) -> Self {
        Self::Control { kind: Presence::Left, who: who.into() }
    }

    #[must_use]
    pub fn content(text: impl Into<String>) -> Self {
        Self::Content { text: text.into() }
    }
}

/// Classify one raw text payload.
///
/// Total by construction: a payload that is not a presence object, including
/// one that is not JSON at all, is the document itself and is kept verbatim.
#[must_use]
pub fn decode_frame(raw: &str) -> Frame {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) {
        for kind in [Presence::Joined, Presence::Left] {
            if let Some(who) = map.get(kind.key()).and_then(presence_label) {
                return Frame::Control { kind, who };
            }
        }
    }
    Frame::content(raw)
}

/// Render a frame as the text payload the socket carries.
#[must_use]
pub fn encode_frame(frame: &Frame) -> String {
    match frame {
        Frame::Control { kind, who } => {
            let mut map = serde_json::Map::new();
            map.insert(kind.key().to_owned(), Value::String(who.clone()));
            Value::Object(map).to_string()
        }
        Frame::Content { text } => text.clone(),
    }
}

/// Falsy presence values (`null`, `false`, `""`, `0`) do not announce anything.
fn presence_label(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|v| v.abs() < f64::EPSILON) => None,
        other => Some(other.to_string()),
    }
}

/// Socket path for one room.
#[must_use]
pub fn room_socket_path(room_id: &str) -> String {
    format!("/ws/room/{room_id}")
}

// =============================================================================
// HTTP BODIES
// =============================================================================

/// Room as returned by `POST /rooms` and each element of `GET /rooms`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: String,
    /// Last saved document. `None` for a room nobody has typed into yet.
    #[serde(default)]
    pub content: Option<String>,
}

/// Body of `POST /autocomplete`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteRequest {
    pub code_context: String,
    pub cursor_line: u32,
    pub cursor_column: u32,
    pub language: String,
}

/// Reply of `POST /autocomplete`. An empty suggestion means "nothing to offer".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    #[serde(default)]
    pub suggestion: String,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
