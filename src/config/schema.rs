//! Configuration schema definitions.
//!
//! All types derive Serde traits and carry defaults, so a minimal setup
//! (just a listening port) needs no config file at all.

use serde::{Deserialize, Serialize};

/// Root configuration for the forwarding proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Access-log settings.
    pub access_log: AccessLogConfig,

    /// Relay settings.
    pub relay: RelayConfig,
}

impl ProxyConfig {
    /// Defaults with the listener bound to the given port on all interfaces,
    /// matching the single-argument command line.
    pub fn for_port(port: u16) -> Self {
        Self {
            listener: ListenerConfig {
                bind_address: format!("0.0.0.0:{port}"),
            },
            ..Self::default()
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Access-log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccessLogConfig {
    /// Path of the append-only log file.
    pub path: String,
}

impl Default for AccessLogConfig {
    fn default() -> Self {
        Self {
            path: "proxy.log".to_string(),
        }
    }
}

/// Relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Size in bytes of each chunk read from the origin.
    pub chunk_size: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { chunk_size: 8192 }
    }
}
