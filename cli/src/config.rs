//! Client configuration.
//!
//! Both base URLs are required inputs. There is no fallback
//! address: a missing value stops the client before any socket or request is
//! attempted, with an error naming the variable to set.

use std::time::Duration;

/// Environment variable for the HTTP API base URL.
pub const API_URL_ENV: &str = "WSSCRIBE_API_URL";
/// Environment variable for the room socket base URL.
pub const WS_URL_ENV: &str = "WSSCRIBE_WS_URL";

pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;
pub const DEFAULT_MIN_CONTEXT_CHARS: usize = 5;
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 3000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: set {var}")]
    Missing { var: &'static str },
    #[error("invalid {var} '{value}': expected a URL starting with {expected}")]
    InvalidUrl { var: &'static str, value: String, expected: &'static str },
}

/// Timing and threshold knobs for the editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTuning {
    /// Quiet period after the last edit before a suggestion is requested.
    pub debounce: Duration,
    /// Documents shorter than this never trigger a suggestion request.
    pub min_context_chars: usize,
    /// How long each notification stays visible.
    pub notification_ttl: Duration,
    /// Content-language tag sent to the suggestion endpoint.
    pub language: String,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            min_context_chars: DEFAULT_MIN_CONTEXT_CHARS,
            notification_ttl: Duration::from_millis(DEFAULT_NOTIFICATION_TTL_MS),
            language: frames::DEFAULT_LANGUAGE.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub ws_base_url: String,
    pub tuning: SessionTuning,
}

impl ClientConfig {
    /// Build a config from optional base URLs, as handed over by clap.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] when either URL is absent or blank, and
    /// [`ConfigError::InvalidUrl`] when a URL has the wrong scheme.
    pub fn from_parts(
        api_base_url: Option<String>,
        ws_base_url: Option<String>,
        tuning: SessionTuning,
    ) -> Result<Self, ConfigError> {
        let api_base_url = require_url(API_URL_ENV, api_base_url, &["http://", "https://"], "http:// or https://")?;
        let ws_base_url = require_url(WS_URL_ENV, ws_base_url, &["ws://", "wss://"], "ws:// or wss://")?;
        Ok(Self { api_base_url, ws_base_url, tuning })
    }

    /// Build a config from `WSSCRIBE_API_URL` and `WSSCRIBE_WS_URL`.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_parts`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_parts(std::env::var(API_URL_ENV).ok(), std::env::var(WS_URL_ENV).ok(), SessionTuning::default())
    }

    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url)
    }

    #[must_use]
    pub fn room_socket_url(&self, room_id: &str) -> String {
        format!("{}{}", self.ws_base_url, frames::room_socket_path(room_id))
    }
}

fn require_url(
    var: &'static str,
    raw: Option<String>,
    schemes: &[&str],
    expected: &'static str,
) -> Result<String, ConfigError> {
    let value = raw.map(|v| v.trim().to_owned()).unwrap_or_default();
    if value.is_empty() {
        return Err(ConfigError::Missing { var });
    }
    if !schemes.iter().any(|scheme| value.starts_with(scheme)) {
        return Err(ConfigError::InvalidUrl { var, value, expected });
    }
    Ok(value.trim_end_matches('/').to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
