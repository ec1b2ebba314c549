//! Concurrent forwarding proxy for plain-text HTTP GET traffic.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                FORWARDING PROXY              │
//!                        │                                              │
//!   Client Request       │  ┌──────────┐   ┌──────────┐   ┌─────────┐  │
//!   ─────────────────────┼─▶│   net    │──▶│   http   │──▶│ rewrite │  │
//!                        │  │dispatcher│   │ assemble │   │ HTTP/1.0│  │
//!                        │  └──────────┘   │ + target │   └────┬────┘  │
//!                        │                 └──────────┘        │       │
//!                        │                                     ▼       │
//!   Client Response      │  ┌──────────┐                 ┌─────────┐   │        Origin
//!   ◀────────────────────┼──│  chunked │◀────────────────│  relay  │◀──┼──────▶ Server
//!                        │  │  stream  │                 └─────────┘   │
//!                        │  └──────────┘                               │
//!                        │                                             │
//!                        │  ┌───────────────────────────────────────┐  │
//!                        │  │          Cross-Cutting Concerns       │  │
//!                        │  │  ┌────────┐ ┌────────┐ ┌───────────┐  │  │
//!                        │  │  │ config │ │ guards │ │access log │  │  │
//!                        │  │  └────────┘ └────────┘ └───────────┘  │  │
//!                        │  └───────────────────────────────────────┘  │
//!                        └──────────────────────────────────────────────┘
//! ```
//!
//! One spawned task per accepted connection runs the whole pipeline
//! independently; the only cross-session synchronization points are the
//! upstream connect and the access-log append, both behind `guard::Guards`.

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod rewrite;

// Cross-cutting concerns
pub mod error;
pub mod guard;
pub mod observability;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use guard::Guards;
pub use net::{Dispatcher, ProxyContext};
