//! Forwarding relay.
//!
//! # Responsibilities
//! - Open the upstream connection under the process-wide connect guard
//! - Send the rewritten request to the origin
//! - Stream the response back to the client in bounded chunks, in order
//!
//! The relay ends when the origin closes or a read from it fails; the two
//! are deliberately not distinguished. Nothing is retried.

use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::guard::Guards;
use crate::http::target::ResolvedTarget;

/// Error type for relay operations. Each aborts the session with no
/// response to the client.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The upstream connection could not be established.
    #[error("could not open connection to {host:?}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// The request could not be written to the origin.
    #[error("write to origin failed: {0}")]
    UpstreamWrite(#[source] std::io::Error),

    /// A response chunk could not be written back to the client.
    #[error("write to client failed: {0}")]
    ClientWrite(#[source] std::io::Error),
}

/// Streams one request/response exchange between a client and an origin.
#[derive(Debug)]
pub struct Relay {
    guards: Arc<Guards>,
    chunk_size: usize,
}

impl Relay {
    pub fn new(guards: Arc<Guards>, chunk_size: usize) -> Self {
        Self {
            guards,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Forward `request` to `target` and stream the response into `client`.
    /// Returns the total number of response bytes relayed.
    ///
    /// `send_len` is the number of request bytes to write upstream. Callers
    /// pass the pre-rewrite request length here; it is clamped to the
    /// rewritten buffer.
    pub async fn run<C>(
        &self,
        client: &mut C,
        target: &ResolvedTarget,
        request: &[u8],
        send_len: usize,
    ) -> Result<u64, RelayError>
    where
        C: AsyncWrite + Unpin,
    {
        let mut upstream = {
            // Upstream connects are serialized process-wide.
            let _held = self.guards.connect.lock().await;
            TcpStream::connect((target.host.as_str(), target.port))
                .await
                .map_err(|source| RelayError::Connect {
                    host: target.host.clone(),
                    port: target.port,
                    source,
                })?
        };

        let send = send_len.min(request.len());
        upstream
            .write_all(&request[..send])
            .await
            .map_err(RelayError::UpstreamWrite)?;

        let mut chunk = vec![0u8; self.chunk_size];
        let mut total: u64 = 0;
        loop {
            let n = match upstream.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(error) => {
                    // An origin read error simply ends the relay, exactly
                    // like a clean close.
                    tracing::debug!(error = %error, "origin read ended the relay");
                    break;
                }
            };
            client
                .write_all(&chunk[..n])
                .await
                .map_err(RelayError::ClientWrite)?;
            total += n as u64;
        }

        Ok(total)
    }
}
