//! Session connection — one room socket per room visit.
//!
//! DESIGN
//! ======
//! `open` returns immediately in `Connecting`. A pump task owns the socket:
//! it performs the handshake, classifies every inbound text payload into a
//! [`Frame`], and writes outbound document snapshots. The owner observes the
//! pump only through [`SessionConnection::next_event`], so state transitions
//! happen on the owner's task, one event at a time.
//!
//! `send` transmits only while `Open`. Anything sent while connecting or after
//! close is dropped on the floor: the next keystroke resends the whole
//! document, so nothing needs buffering.
//!
//! ERROR HANDLING
//! ==============
//! Handshake and transport failures are logged and surface only as the
//! connection reaching `Closed`. There is no retry.

use frames::{Frame, decode_frame};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::rooms::RoomId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// What the pump reports to the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Handshake finished; `send` now transmits.
    Opened,
    /// One classified inbound frame.
    Frame(Frame),
}

pub struct SessionConnection {
    room_id: RoomId,
    state: ConnectionState,
    outbound: Option<mpsc::UnboundedSender<String>>,
    inbound: Option<mpsc::UnboundedReceiver<ConnectionEvent>>,
}

impl SessionConnection {
    /// Start connecting to the room socket. Never fails: an unreachable
    /// endpoint shows up later as the connection closing.
    #[must_use]
    pub fn open(config: &ClientConfig, room_id: RoomId) -> Self {
        let url = config.room_socket_url(room_id.as_str());
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();

        info!(%room_id, %url, "room socket connecting");
        tokio::spawn(pump(url, out_rx, in_tx));

        Self { room_id, state: ConnectionState::Connecting, outbound: Some(out_tx), inbound: Some(in_rx) }
    }

    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True until the connection is closed, locally or by the peer.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.inbound.is_some()
    }

    /// Transmit the full document as one frame. Returns whether it went out.
    pub fn send(&mut self, text: &str) -> bool {
        if self.state != ConnectionState::Open {
            debug!(room_id = %self.room_id, state = ?self.state, "send dropped: socket not open");
            return false;
        }
        let Some(outbound) = &self.outbound else {
            return false;
        };
        if outbound.send(text.to_owned()).is_err() {
            // Pump already gone. Frames it queued are still drained by
            // `next_event`, which then reports the close.
            self.state = ConnectionState::Closed;
            self.outbound = None;
            return false;
        }
        true
    }

    /// Wait for the next event from the socket.
    ///
    /// Returns `None` once the connection is closed; every later call returns
    /// `None` immediately.
    pub async fn next_event(&mut self) -> Option<ConnectionEvent> {
        let inbound = self.inbound.as_mut()?;
        let Some(event) = inbound.recv().await else {
            info!(room_id = %self.room_id, "room socket closed");
            self.mark_closed();
            return None;
        };
        if event == ConnectionEvent::Opened {
            info!(room_id = %self.room_id, "room socket open");
            self.state = ConnectionState::Open;
        }
        Some(event)
    }

    /// Tear down the socket. Safe to call any number of times; no event is
    /// delivered afterwards.
    pub fn close(&mut self) {
        if self.inbound.is_none() && self.outbound.is_none() {
            return;
        }
        info!(room_id = %self.room_id, "room socket closing");
        self.mark_closed();
    }

    fn mark_closed(&mut self) {
        self.state = ConnectionState::Closed;
        // Dropping the sender makes the pump send a close frame and exit;
        // dropping the receiver discards anything it had already queued.
        self.outbound = None;
        self.inbound = None;
    }
}

impl Drop for SessionConnection {
    fn drop(&mut self) {
        self.close();
    }
}

async fn pump(
    url: String,
    mut outbound: mpsc::UnboundedReceiver<String>,
    inbound: mpsc::UnboundedSender<ConnectionEvent>,
) {
    let mut socket = match connect_async(url.as_str()).await {
        Ok((socket, _)) => socket,
        Err(e) => {
            warn!(%url, error = %e, "room socket connect failed");
            return;
        }
    };

    if inbound.send(ConnectionEvent::Opened).is_err() {
        let _ = socket.close(None).await;
        return;
    }

    loop {
        tokio::select! {
            msg = socket.next() => {
                let Some(msg) = msg else { break };
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!(%url, error = %e, "room socket read failed");
                        break;
                    }
                };
                match msg {
                    Message::Text(text) => {
                        let frame = decode_frame(text.as_str());
                        if inbound.send(ConnectionEvent::Frame(frame)).is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            text = outbound.recv() => {
                let Some(text) = text else { break };
                if let Err(e) = socket.send(Message::text(text)).await {
                    warn!(%url, error = %e, "room socket write failed");
                    break;
                }
            }
        }
    }

    let _ = socket.close(None).await;
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
