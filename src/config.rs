//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::pacing::{
    DEFAULT_TYPING_BASE_MS, DEFAULT_TYPING_CHARS_PER_SEC, DEFAULT_TYPING_MAX_MS, PacingPolicy,
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_VICTORY_DELAY_MS: u64 = 1000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JIBBER_TYPING_CHARS_PER_SEC must be greater than zero")]
    ZeroTypingSpeed,
    #[error("typing ceiling {max_ms}ms is below the floor {base_ms}ms")]
    CeilingBelowFloor { base_ms: u64, max_ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeouts: HttpTimeouts,
    pub pacing: PacingPolicy,
    pub victory_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeouts: HttpTimeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            pacing: PacingPolicy::default(),
            victory_delay: Duration::from_millis(DEFAULT_VICTORY_DELAY_MS),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `JIBBER_BASE_URL`: backend origin (default `http://127.0.0.1:5000`)
    /// - `JIBBER_REQUEST_TIMEOUT_SECS`: default 60
    /// - `JIBBER_CONNECT_TIMEOUT_SECS`: default 10
    /// - `JIBBER_TYPING_BASE_MS`: default 600
    /// - `JIBBER_TYPING_MAX_MS`: default 2000
    /// - `JIBBER_TYPING_CHARS_PER_SEC`: default 35
    /// - `JIBBER_VICTORY_DELAY_MS`: default 1000
    ///
    /// # Errors
    ///
    /// Returns an error when the typing speed is zero or the typing ceiling
    /// is below its floor.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("JIBBER_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let timeouts = HttpTimeouts {
            request_secs: env_parse("JIBBER_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("JIBBER_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        let base_ms = env_parse("JIBBER_TYPING_BASE_MS", DEFAULT_TYPING_BASE_MS);
        let max_ms = env_parse("JIBBER_TYPING_MAX_MS", DEFAULT_TYPING_MAX_MS);
        let chars_per_sec = env_parse("JIBBER_TYPING_CHARS_PER_SEC", DEFAULT_TYPING_CHARS_PER_SEC);
        if chars_per_sec == 0 {
            return Err(ConfigError::ZeroTypingSpeed);
        }
        if max_ms < base_ms {
            return Err(ConfigError::CeilingBelowFloor { base_ms, max_ms });
        }
        let pacing = PacingPolicy {
            base: Duration::from_millis(base_ms),
            max: Duration::from_millis(max_ms),
            chars_per_sec,
            ..PacingPolicy::default()
        };

        let victory_delay = Duration::from_millis(env_parse("JIBBER_VICTORY_DELAY_MS", DEFAULT_VICTORY_DELAY_MS));

        Ok(Self { base_url, timeouts, pacing, victory_delay })
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
