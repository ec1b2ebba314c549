//! Cross-session mutual exclusion.
//!
//! Exactly two operations are unsafe to run concurrently from multiple
//! sessions and are serialized process-wide: establishing the upstream
//! connection and appending to the access log. Everything else a session
//! does touches only state it owns.
//!
//! The guards are constructed once at startup and passed by `Arc` to the
//! relay and the access logger; they are never ambient globals.

use tokio::sync::Mutex;

/// The process-wide guard set.
#[derive(Debug, Default)]
pub struct Guards {
    /// Held across the upstream connect call.
    pub connect: Mutex<()>,
    /// Held across each access-log append, so records never interleave.
    pub log: Mutex<()>,
}

impl Guards {
    pub fn new() -> Self {
        Self::default()
    }
}
