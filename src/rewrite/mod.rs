//! Text rewrite subsystem.
//!
//! # Data Flow
//! ```text
//! pattern + replacement + flags
//!     → Substitution::new (compile pattern, parse template)
//!     → Substitution::apply (sizing pass, then writing pass)
//!     → Rewritten { bytes, found }
//! ```
//!
//! # Design Decisions
//! - Binary-safe: sources with embedded NUL bytes are copied verbatim
//! - Output length is computed exactly before any byte is written, so the
//!   result buffer is never over- or under-allocated
//! - Engine errors are per-call `Result`s, never process aborts

pub mod engine;
pub mod template;

pub use engine::{Flags, Rewritten, Substitution};

use thiserror::Error;

/// Error type for rewrite-engine operations.
///
/// Both variants are scoped to the call that produced them; a failed
/// substitution aborts at most the session that requested it.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The pattern failed to compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    Compile {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The replacement template referenced a capture group that did not
    /// participate in the match.
    #[error("replacement references capture group {group}, which did not participate in the match")]
    GroupNotMatched { group: usize },
}
