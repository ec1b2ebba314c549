//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, one task per connection)
//!     → session.rs (pipeline: assemble → resolve → rewrite → relay → log)
//!     → relay.rs (guarded upstream connect, chunked response streaming)
//! ```
//!
//! # Design Decisions
//! - Fire-and-forget sessions: no joining, no tracking, no connection cap
//! - Sessions share nothing mutable except the guard-protected resources
//! - No timeouts: a session blocked on a silent peer blocks only itself

pub mod listener;
pub mod relay;
pub mod session;

pub use listener::{Dispatcher, ListenerError};
pub use relay::{Relay, RelayError};
pub use session::{ProxyContext, Session, SessionId};
