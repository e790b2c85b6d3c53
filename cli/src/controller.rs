//! Editing session controller — the composition root of one room visit.
//!
//! DESIGN
//! ======
//! `EditingSession` owns the document text, the room connection, the
//! suggestion client, and the notification queue. Nothing outside holds any of
//! them. Every local write goes through one path: replace the text, broadcast
//! the full document, restart the suggestion debounce.
//!
//! Key arbitration is a two-state machine. Entering `SuggestionShown` attaches
//! a [`KeyInterceptor`]; leaving it detaches the interceptor. While attached,
//! Tab accepts and Escape rejects; any other key drops the suggestion and is
//! then applied to the document as usual.
//!
//! LIFECYCLE
//! =========
//! 1. `connect` → socket starts connecting, document holds the placeholder
//! 2. Front end feeds keys/edits and polls `next_update` for async events
//! 3. `close` (or drop) → interceptor detached, timer cancelled, socket closed;
//!    `next_update` returns `None` from then on

use std::sync::Arc;

use frames::Frame;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::connection::{ConnectionEvent, ConnectionState, SessionConnection};
use crate::notify::{Notification, NotificationQueue};
use crate::rooms::RoomId;
use crate::suggest::{SuggestionClient, SuggestionEvent, SuggestionSource};

/// Document text before anything is typed or received.
pub const INITIAL_DOCUMENT: &str = "# Code here";

/// Text inserted by Tab when no suggestion is on offer.
const INDENT: &str = "    ";

// =============================================================================
// KEYS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Reserved: accepts a shown suggestion.
    Tab,
    /// Reserved: rejects a shown suggestion.
    Escape,
    Enter,
    Backspace,
    Char(char),
}

/// What a key did once arbitration ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Accepted,
    Rejected,
    Edited,
    /// The key left the document as it was.
    Unchanged,
}

/// Apply an unreserved key to a document.
#[must_use]
pub fn apply_key(document: &str, key: Key) -> String {
    let mut next = document.to_owned();
    match key {
        Key::Tab => next.push_str(INDENT),
        Key::Escape => {}
        Key::Enter => next.push('\n'),
        Key::Backspace => {
            next.pop();
        }
        Key::Char(c) => next.push(c),
    }
    next
}

// =============================================================================
// ARBITRATION
// =============================================================================

enum Interception {
    Accept,
    Reject,
    PassThrough,
}

/// Attached while a suggestion is shown.
#[derive(Debug)]
struct KeyInterceptor {
    suggestion: String,
}

impl KeyInterceptor {
    fn attach(suggestion: String) -> Self {
        debug!(len = suggestion.len(), "key interceptor attached");
        Self { suggestion }
    }

    fn intercept(&self, key: Key) -> Interception {
        match key {
            Key::Tab => Interception::Accept,
            Key::Escape => Interception::Reject,
            _ => Interception::PassThrough,
        }
    }
}

impl Drop for KeyInterceptor {
    fn drop(&mut self) {
        debug!("key interceptor detached");
    }
}

enum Arbitration {
    NoSuggestion,
    SuggestionShown(KeyInterceptor),
}

/// Something the front end may want to re-render after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    Connected,
    /// The socket closed; the session keeps working locally.
    Disconnected,
    /// A peer's document replaced ours.
    DocumentReplaced,
    Notified(Notification),
    NotificationsExpired(Vec<Notification>),
    SuggestionRequested,
    SuggestionShown(String),
    /// A fetch finished without producing anything to show.
    SuggestionDropped,
}

// =============================================================================
// SESSION
// =============================================================================

pub struct EditingSession {
    document: String,
    connection: SessionConnection,
    suggestions: SuggestionClient,
    notifications: NotificationQueue,
    arbitration: Arbitration,
    closed: bool,
}

impl EditingSession {
    #[must_use]
    pub fn new(connection: SessionConnection, suggestions: SuggestionClient, notifications: NotificationQueue) -> Self {
        Self {
            document: INITIAL_DOCUMENT.to_owned(),
            connection,
            suggestions,
            notifications,
            arbitration: Arbitration::NoSuggestion,
            closed: false,
        }
    }

    /// Open the room socket and wire up a session around it.
    #[must_use]
    pub fn connect(config: &ClientConfig, room_id: RoomId, source: Arc<dyn SuggestionSource>) -> Self {
        let connection = SessionConnection::open(config, room_id);
        let suggestions = SuggestionClient::new(source, &config.tuning);
        let notifications = NotificationQueue::new(config.tuning.notification_ttl);
        Self::new(connection, suggestions, notifications)
    }

    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        self.connection.room_id()
    }

    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// The suggestion on offer, if one is shown.
    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        match &self.arbitration {
            Arbitration::SuggestionShown(interceptor) => Some(&interceptor.suggestion),
            Arbitration::NoSuggestion => None,
        }
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Run one keystroke through arbitration, then through the document.
    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        if self.closed {
            return KeyOutcome::Unchanged;
        }

        if let Arbitration::SuggestionShown(interceptor) = &self.arbitration {
            match interceptor.intercept(key) {
                Interception::Accept => {
                    self.apply_suggestion();
                    return KeyOutcome::Accepted;
                }
                Interception::Reject => {
                    self.dismiss_suggestion();
                    return KeyOutcome::Rejected;
                }
                Interception::PassThrough => self.leave_suggestion_shown(),
            }
        }

        let next = apply_key(&self.document, key);
        if self.write_local(next) { KeyOutcome::Edited } else { KeyOutcome::Unchanged }
    }

    /// Replace the whole buffer, as an editor widget's change callback would.
    /// Returns whether the document changed.
    pub fn replace_text(&mut self, text: impl Into<String>) -> bool {
        if self.closed {
            return false;
        }
        self.leave_suggestion_shown();
        self.write_local(text.into())
    }

    /// Append the shown suggestion and broadcast the result.
    pub fn apply_suggestion(&mut self) -> bool {
        let Arbitration::SuggestionShown(interceptor) = std::mem::replace(&mut self.arbitration, Arbitration::NoSuggestion)
        else {
            return false;
        };
        self.suggestions.clear();

        let mut next = self.document.clone();
        next.push_str(&interceptor.suggestion);
        info!(room_id = %self.room_id(), len = interceptor.suggestion.len(), "suggestion accepted");
        drop(interceptor);
        self.write_local(next);
        true
    }

    /// Drop the shown suggestion; the document is untouched and nothing is sent.
    pub fn dismiss_suggestion(&mut self) -> bool {
        if matches!(self.arbitration, Arbitration::NoSuggestion) {
            return false;
        }
        debug!(room_id = %self.room_id(), "suggestion dismissed");
        self.leave_suggestion_shown();
        true
    }

    /// Wait for the next inbound frame, suggestion event, or notification
    /// expiry and apply it. `None` once the session is closed.
    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        if self.closed {
            return None;
        }

        tokio::select! {
            event = self.connection.next_event(), if self.connection.is_live() => {
                Some(match event {
                    None => SessionUpdate::Disconnected,
                    Some(ConnectionEvent::Opened) => SessionUpdate::Connected,
                    Some(ConnectionEvent::Frame(frame)) => self.apply_frame(frame),
                })
            }
            event = self.suggestions.next_event(&self.document) => {
                Some(match event {
                    SuggestionEvent::Requested => SessionUpdate::SuggestionRequested,
                    SuggestionEvent::Ready(text) => {
                        self.enter_suggestion_shown(text.clone());
                        SessionUpdate::SuggestionShown(text)
                    }
                    SuggestionEvent::Discarded | SuggestionEvent::Failed => SessionUpdate::SuggestionDropped,
                })
            }
            expired = self.notifications.next_expiry(), if !self.notifications.is_empty() => {
                Some(SessionUpdate::NotificationsExpired(expired))
            }
        }
    }

    /// End the session. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.arbitration = Arbitration::NoSuggestion;
        self.suggestions.shutdown();
        self.notifications.clear();
        self.connection.close();
        info!(room_id = %self.room_id(), "editing session closed");
    }

    fn apply_frame(&mut self, frame: Frame) -> SessionUpdate {
        match frame {
            Frame::Control { kind, who } => {
                info!(room_id = %self.room_id(), ?kind, %who, "presence change");
                let notification = self.notifications.enqueue(who, kind.into()).clone();
                SessionUpdate::Notified(notification)
            }
            Frame::Content { text } => {
                if text != self.document {
                    // A suggestion computed for the old text no longer fits.
                    self.leave_suggestion_shown();
                    self.document = text;
                    self.suggestions.schedule(&self.document);
                }
                SessionUpdate::DocumentReplaced
            }
        }
    }

    /// The single local write path. Returns whether the text changed.
    fn write_local(&mut self, next: String) -> bool {
        if next == self.document {
            return false;
        }
        self.document = next;
        self.connection.send(&self.document);
        self.suggestions.schedule(&self.document);
        true
    }

    fn enter_suggestion_shown(&mut self, suggestion: String) {
        self.arbitration = Arbitration::SuggestionShown(KeyInterceptor::attach(suggestion));
    }

    fn leave_suggestion_shown(&mut self) {
        if matches!(self.arbitration, Arbitration::SuggestionShown(_)) {
            self.arbitration = Arbitration::NoSuggestion;
            self.suggestions.clear();
        }
    }
}

impl Drop for EditingSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
