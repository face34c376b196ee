//! Device kind — the fixed set of five virtual devices.
//!
//! The kind is the key everywhere: topic suffix, registry key, routing key.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base prefix shared by every device topic (`Home/<kind>`).
pub const TOPIC_BASE: &str = "Home";

/// One of the five fixed virtual device kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Combined temperature/humidity sensor.
    Dht,
    /// Ambient light sensor (lux).
    Light,
    /// Motion detector.
    Motion,
    /// Momentary doorbell button.
    Button,
    /// Binary relay actuator.
    Relay,
}

impl DeviceKind {
    /// All kinds, in registry construction order.
    pub const ALL: [Self; 5] = [
        Self::Dht,
        Self::Light,
        Self::Motion,
        Self::Button,
        Self::Relay,
    ];

    /// The lowercase string key used in topics and storage.
    #[must_use]
    pub fn as_key(self) -> &'static str {
        match self {
            Self::Dht => "dht",
            Self::Light => "light",
            Self::Motion => "motion",
            Self::Button => "button",
            Self::Relay => "relay",
        }
    }

    /// Parse a string key back into a kind. Unknown keys yield `None`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "dht" => Some(Self::Dht),
            "light" => Some(Self::Light),
            "motion" => Some(Self::Motion),
            "button" => Some(Self::Button),
            "relay" => Some(Self::Relay),
            _ => None,
        }
    }

    /// The full publish/subscribe topic for this kind.
    #[must_use]
    pub fn topic(self) -> String {
        format!("{TOPIC_BASE}/{}", self.as_key())
    }

    /// Polling cadence for periodic kinds; `None` for event-driven kinds
    /// (button, relay).
    #[must_use]
    pub fn poll_interval(self) -> Option<Duration> {
        match self {
            Self::Dht => Some(Duration::from_millis(5000)),
            Self::Light => Some(Duration::from_millis(2000)),
            Self::Motion => Some(Duration::from_millis(3000)),
            Self::Button | Self::Relay => None,
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_key())
    }
}
