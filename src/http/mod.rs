//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! client connection
//!     → request.rs (assemble header block, drop Connection:, require GET)
//!     → target.rs (resolve the absolute URI into host/port/path)
//!     → [rewrite layer normalizes the version token]
//!     → [relay forwards the block upstream]
//! ```

pub mod request;
pub mod target;

pub use request::{read_request, AssembleError, Request, RequestBuf};
pub use target::{resolve, ResolveError, ResolvedTarget};
