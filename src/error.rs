//! Crate-level error type.
//!
//! Every variant aborts at most the session it occurred in. The only error
//! that stops the process is an accept failure, which never reaches this
//! type — see `net::listener`.

use thiserror::Error;

use crate::http::request::AssembleError;
use crate::net::listener::ListenerError;
use crate::net::relay::RelayError;
use crate::rewrite::RewriteError;

/// Error type for the proxy pipeline.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The request header block could not be assembled.
    #[error("request assembly failed: {0}")]
    Assemble(#[from] AssembleError),

    /// A substitution failed.
    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    /// The relay could not complete the exchange.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// The access-log record could not be appended.
    #[error("access log append failed: {0}")]
    AccessLog(#[source] std::io::Error),

    /// The dispatcher failed to bind or accept.
    #[error(transparent)]
    Listener(#[from] ListenerError),
}
