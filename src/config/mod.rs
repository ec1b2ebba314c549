//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line (port)  ──┐
//!                        ├─→ ProxyConfig (immutable)
//! TOML text (optional) ──┘        → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once built
//! - All fields have defaults; the CLI only supplies the port

pub mod loader;
pub mod schema;

pub use loader::{load_config_str, ConfigError};
pub use schema::{AccessLogConfig, ListenerConfig, ProxyConfig, RelayConfig};
