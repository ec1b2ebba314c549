//! Session dispatch.
//!
//! # Responsibilities
//! - Bind the listening socket
//! - Accept connections in an unbounded loop
//! - Spawn one fire-and-forget task per connection
//!
//! Sessions are never joined or tracked, and there is no cap on how many
//! run at once — a documented limitation of this design, not an accident.
//! An accept failure is fatal to the whole process.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::net::session::{ProxyContext, Session};

/// Error type for dispatcher operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to the configured address.
    #[error("failed to bind {addr:?}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to accept a connection.
    #[error("failed to accept: {0}")]
    Accept(#[source] std::io::Error),
}

/// Accepts connections and hands each to its own session task.
#[derive(Debug)]
pub struct Dispatcher {
    inner: TcpListener,
}

impl Dispatcher {
    /// Bind to the given address.
    pub async fn bind(addr: &str) -> Result<Self, ListenerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ListenerError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        if let Ok(local) = listener.local_addr() {
            tracing::info!(address = %local, "listener bound");
        }

        Ok(Self { inner: listener })
    }

    /// The local address this dispatcher is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Accept connections forever, spawning one session task per
    /// connection. Returns only when an accept fails.
    pub async fn run(self, ctx: Arc<ProxyContext>) -> Result<(), ListenerError> {
        loop {
            let (stream, peer) = self.inner.accept().await.map_err(ListenerError::Accept)?;
            let session = Session::new(stream, peer);
            tracing::debug!(
                session_id = %session.id(),
                peer_addr = %peer,
                "connection accepted"
            );

            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move {
                let id = session.id();
                if let Err(error) = session.run(&ctx).await {
                    tracing::warn!(session_id = %id, error = %error, "session aborted");
                }
            });
        }
    }
}
