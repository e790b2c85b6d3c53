//! Notification queue — short-lived presence messages.
//!
//! Items are appended in arrival order and each carries its own deadline, set
//! once at insertion. Later arrivals never extend an earlier item's life.
//! Removal is purely time-driven; the consumer only reads.

use std::collections::VecDeque;
use std::time::Duration;

use frames::Presence;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

impl From<Presence> for NotificationKind {
    fn from(presence: Presence) -> Self {
        match presence {
            Presence::Joined => Self::Success,
            Presence::Left => Self::Failure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    expires_at: Instant,
}

impl Notification {
    #[must_use]
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

/// FIFO of visible notifications. Unbounded.
#[derive(Debug)]
pub struct NotificationQueue {
    ttl: Duration,
    items: VecDeque<Notification>,
}

impl NotificationQueue {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, items: VecDeque::new() }
    }

    pub fn enqueue(&mut self, message: impl Into<String>, kind: NotificationKind) -> &Notification {
        self.enqueue_at(message, kind, Instant::now())
    }

    pub fn enqueue_at(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) -> &Notification {
        self.items.push_back(Notification { message: message.into(), kind, expires_at: now + self.ttl });
        &self.items[self.items.len() - 1]
    }

    /// Remove and return every item whose deadline has passed at `now`.
    pub fn expire_at(&mut self, now: Instant) -> Vec<Notification> {
        let mut expired = Vec::new();
        let mut kept = VecDeque::with_capacity(self.items.len());
        for item in self.items.drain(..) {
            if item.expires_at <= now {
                expired.push(item);
            } else {
                kept.push_back(item);
            }
        }
        self.items = kept;
        expired
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.items.iter().map(|item| item.expires_at).min()
    }

    /// Sleep until the earliest deadline, then evict what is due.
    ///
    /// Never resolves while the queue is empty.
    pub async fn next_expiry(&mut self) -> Vec<Notification> {
        let Some(deadline) = self.next_deadline() else {
            return std::future::pending().await;
        };
        tokio::time::sleep_until(deadline).await;
        self.expire_at(Instant::now())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }
}

#[cfg(test)]
#[path = "notify_test.rs"]
mod tests;
