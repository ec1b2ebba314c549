//! Request assembly.
//!
//! # Responsibilities
//! - Read a full header block off a client connection, line by line
//! - Drop `Connection:` headers so origins never hold the socket open
//! - Grow the request buffer geometrically, never truncating
//! - Reject anything that is not a GET request
//!
//! A request that cannot be assembled aborts its session with no response;
//! nothing here is retried.

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Initial request-buffer capacity in bytes.
const INITIAL_CAPACITY: usize = 8192;

/// Header prefix that is stripped during assembly. Matched case-sensitively
/// against the start of each line.
const CONNECTION_PREFIX: &[u8] = b"Connection:";

/// Error type for request assembly.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// A read from the client failed.
    #[error("read from client failed: {0}")]
    Read(#[source] std::io::Error),

    /// The client closed the connection before the blank line arrived.
    #[error("connection closed before the header block completed")]
    UnexpectedEof {
        /// Whatever had been assembled so far, for diagnostics only.
        partial: Vec<u8>,
    },

    /// The header block is complete but the method is not GET.
    #[error("request method is not GET")]
    NotGet,
}

/// A growable byte buffer for request assembly.
///
/// Capacity grows by repeated doubling whenever an append would not fit, and
/// existing content is always preserved. Length only ever increases while a
/// request is being assembled.
#[derive(Debug, Default)]
pub struct RequestBuf {
    bytes: Vec<u8>,
}

impl RequestBuf {
    pub fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Append a line, doubling capacity until it fits.
    pub fn append(&mut self, line: &[u8]) {
        let needed = self.bytes.len() + line.len();
        if needed > self.bytes.capacity() {
            let mut capacity = self.bytes.capacity().max(1);
            while needed > capacity {
                capacity *= 2;
            }
            self.bytes.reserve_exact(capacity - self.bytes.len());
        }
        self.bytes.extend_from_slice(line);
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// A fully assembled request header block.
#[derive(Debug)]
pub struct Request {
    raw: Vec<u8>,
}

impl Request {
    fn new(buf: RequestBuf) -> Self {
        Self {
            raw: buf.into_bytes(),
        }
    }

    /// The raw header block, `Connection:` lines already removed.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Total length of the header block in bytes.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The request line, without its line terminator.
    pub fn request_line(&self) -> &[u8] {
        let end = self
            .raw
            .iter()
            .position(|&b| b == b'\r' || b == b'\n')
            .unwrap_or(self.raw.len());
        &self.raw[..end]
    }

    /// The method token of the request line.
    pub fn method(&self) -> Option<&[u8]> {
        self.line_token(0)
    }

    /// The absolute-URI token of the request line.
    pub fn target(&self) -> Option<&[u8]> {
        self.line_token(1)
    }

    /// The protocol-version token of the request line.
    pub fn version(&self) -> Option<&[u8]> {
        self.line_token(2)
    }

    fn line_token(&self, index: usize) -> Option<&[u8]> {
        self.request_line()
            .split(|&b| b == b' ')
            .filter(|token| !token.is_empty())
            .nth(index)
    }
}

/// Read one header block from `reader`.
///
/// Lines arrive one at a time; `Connection:` lines are dropped, everything
/// else is appended until a bare line terminator ends the block. A failed or
/// empty read aborts assembly, as does a method other than `GET `.
pub async fn read_request<R>(reader: &mut R) -> Result<Request, AssembleError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = RequestBuf::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        let n = reader
            .read_until(b'\n', &mut line)
            .await
            .map_err(AssembleError::Read)?;
        if n == 0 {
            return Err(AssembleError::UnexpectedEof {
                partial: buf.into_bytes(),
            });
        }

        // Connection headers cause long hangs against origins that honor
        // persistent-connection semantics.
        if line.starts_with(CONNECTION_PREFIX) {
            continue;
        }

        buf.append(&line);

        if line == b"\r\n" || line == b"\n" {
            break;
        }
    }

    let request = Request::new(buf);
    if !request.as_bytes().starts_with(b"GET ") {
        return Err(AssembleError::NotGet);
    }
    Ok(request)
}
