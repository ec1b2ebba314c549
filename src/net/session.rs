//! Per-connection sessions and the shared pipeline context.
//!
//! # Responsibilities
//! - Give each accepted connection a unique ID for tracing
//! - Run the full pipeline for one connection:
//!   assemble → resolve → rewrite → relay → log
//!
//! A session owns its connection and buffers outright; the only state it
//! shares with other sessions is behind the guard set.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::BufReader;
use tokio::net::TcpStream;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::guard::Guards;
use crate::http::request::{read_request, AssembleError};
use crate::http::target::{resolve, ResolvedTarget};
use crate::net::relay::Relay;
use crate::observability::AccessLog;
use crate::rewrite::{Flags, RewriteError, Substitution};

/// Global counter for session IDs. Relaxed ordering is enough; only
/// uniqueness matters.
static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new() -> Self {
        Self(SESSION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Everything the pipeline shares across sessions: the guard set, the
/// access log, the relay, and the precompiled substitutions.
#[derive(Debug)]
pub struct ProxyContext {
    pub guards: Arc<Guards>,
    pub access_log: AccessLog,
    pub relay: Relay,
    /// Forces the request-line version token to HTTP/1.0 before forwarding.
    normalize_version: Substitution,
    /// Diagnostic-only: strips the method prefix for tracing output.
    strip_method: Substitution,
    /// Diagnostic-only: strips the trailing version/terminator sequence.
    strip_tail: Substitution,
}

impl ProxyContext {
    pub fn new(config: &ProxyConfig) -> Result<Self, RewriteError> {
        let guards = Arc::new(Guards::new());
        let access_log = AccessLog::new(&config.access_log.path, Arc::clone(&guards));
        let relay = Relay::new(Arc::clone(&guards), config.relay.chunk_size);

        let normalize_version = Substitution::new(r" HTTP/1\..", " HTTP/1.0", Flags::default())?;
        let strip_method = Substitution::new("GET ", "", Flags::default())?;
        let strip_tail = Substitution::new(r" HTTP/1\..\r\n\r\n", "", Flags::default())?;

        Ok(Self {
            guards,
            access_log,
            relay,
            normalize_version,
            strip_method,
            strip_tail,
        })
    }
}

/// One accepted connection, owned by exactly one spawned task.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    stream: TcpStream,
    peer: SocketAddr,
}

impl Session {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self {
            id: SessionId::new(),
            stream,
            peer,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Run the pipeline for this connection. Any error aborts the session
    /// silently: the connection closes and the client gets no response.
    pub async fn run(self, ctx: &ProxyContext) -> Result<(), ProxyError> {
        let Session { id, stream, peer } = self;
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        let request = read_request(&mut reader).await.map_err(|error| {
            if let AssembleError::UnexpectedEof { partial } = &error {
                tracing::warn!(
                    session_id = %id,
                    partial = %String::from_utf8_lossy(partial),
                    "client issued a bad request"
                );
            }
            ProxyError::from(error)
        })?;

        let uri = String::from_utf8_lossy(request.target().unwrap_or_default()).into_owned();

        // Human-readable trace of the assembled request; never transmitted.
        let stripped = ctx.strip_method.apply(request.as_bytes())?;
        let stripped = ctx.strip_tail.apply(&stripped.bytes)?;
        tracing::debug!(
            session_id = %id,
            request = %String::from_utf8_lossy(&stripped.bytes).trim_end(),
            "assembled request"
        );

        let target = match resolve(&uri) {
            Ok(target) => target,
            Err(error) => {
                // Lenient on purpose: the empty host makes the upstream
                // connect fail, which then aborts the session.
                tracing::warn!(session_id = %id, error = %error, "target resolution failed");
                ResolvedTarget::unresolved()
            }
        };

        let rewritten = ctx.normalize_version.apply(request.as_bytes())?;
        // The send length follows the pre-rewrite request, not the buffer
        // actually transmitted.
        let relayed = ctx
            .relay
            .run(&mut write_half, &target, &rewritten.bytes, request.len())
            .await?;

        tracing::info!(
            session_id = %id,
            peer_addr = %peer,
            target = %uri,
            bytes = relayed,
            "relay complete"
        );

        if relayed > 0 {
            ctx.access_log
                .append(peer.ip(), &uri, relayed)
                .await
                .map_err(ProxyError::AccessLog)?;
        }

        Ok(())
    }
}
