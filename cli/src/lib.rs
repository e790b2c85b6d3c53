//! Terminal client for wsscribe rooms: room registry calls, the room socket,
//! debounced suggestions, presence notifications, and the editing session that
//! ties them together.

pub mod config;
pub mod connection;
pub mod controller;
pub mod notify;
pub mod rooms;
pub mod suggest;
pub mod terminal;

#[cfg(test)]
mod test_support;
