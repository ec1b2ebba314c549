//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Sessions produce:
//!     → tracing events (structured diagnostics, stdout)
//!     → access_log.rs (one record per completed response, shared file)
//! ```
//!
//! # Design Decisions
//! - Diagnostics go through `tracing`; the access log is a separate,
//!   append-only artifact with a fixed record format
//! - Access-log appends run under the process-wide log guard so records
//!   from concurrent sessions never interleave

pub mod access_log;

pub use access_log::AccessLog;
