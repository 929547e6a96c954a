//! Engine configuration

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Configuration for the authorization service
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub events: EventConfig,
}

/// Session validity window
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Used when a session is created without an explicit ttl
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,

    /// Longest ttl a caller may request
    #[serde(default = "default_max_ttl_secs")]
    pub max_ttl_secs: u64,
}

impl SessionConfig {
    /// Saturates at the longest representable duration
    pub fn default_ttl(&self) -> Duration {
        i64::try_from(self.default_ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl_secs(),
            max_ttl_secs: default_max_ttl_secs(),
        }
    }
}

/// Session event broadcasting
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventConfig {
    /// Buffered events per subscriber before lagging ones miss events
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    15 * 60
}

fn default_max_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_channel_capacity() -> usize {
    256
}
