//! Relay server configuration parsed from environment variables.

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ROOM_CAPACITY: usize = 2;
pub const DEFAULT_SUGGESTION: &str = "print('Hello World')";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ServerConfigError {
    #[error("ROOM_CAPACITY must be at least 1")]
    ZeroCapacity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Most clients a room admits at once.
    pub room_capacity: usize,
    /// Fixed continuation returned by the static completer.
    pub suggestion: String,
}

impl ServerConfig {
    /// Build server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `ROOM_CAPACITY`: default 2
    /// - `AUTOCOMPLETE_SUGGESTION`: default `print('Hello World')`
    ///
    /// Unparseable numbers fall back to their defaults.
    ///
    /// # Errors
    ///
    /// [`ServerConfigError::ZeroCapacity`] when `ROOM_CAPACITY` is 0.
    pub fn from_env() -> Result<Self, ServerConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`], reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// [`ServerConfigError::ZeroCapacity`] when the capacity is 0.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerConfigError> {
        let port = env_parse(&lookup, "PORT", DEFAULT_PORT);
        let room_capacity = env_parse(&lookup, "ROOM_CAPACITY", DEFAULT_ROOM_CAPACITY);
        if room_capacity == 0 {
            return Err(ServerConfigError::ZeroCapacity);
        }
        let suggestion = lookup("AUTOCOMPLETE_SUGGESTION").unwrap_or_else(|| DEFAULT_SUGGESTION.to_owned());

        Ok(Self { port, room_capacity, suggestion })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT, room_capacity: DEFAULT_ROOM_CAPACITY, suggestion: DEFAULT_SUGGESTION.to_owned() }
    }
}

fn env_parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
