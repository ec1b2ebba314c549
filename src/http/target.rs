//! Absolute-URI resolution.
//!
//! # Responsibilities
//! - Validate the `http://` scheme prefix (case-insensitive)
//! - Extract host, port (default 80), and path from a request target
//!
//! Resolution is purely lexical; no name lookup happens here.

use thiserror::Error;

/// Error type for target resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The request target does not begin with `http://`.
    #[error("request target {uri:?} does not begin with http://")]
    MissingScheme { uri: String },
}

/// The parsed destination of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Origin host name or address. Empty when resolution failed.
    pub host: String,
    /// Origin port, 80 unless the URI carries an explicit `:port`.
    pub port: u16,
    /// Everything after the first `/` following the authority. May be empty.
    pub path: String,
}

impl ResolvedTarget {
    /// The target a session falls back to when resolution fails: an empty
    /// host, which deterministically fails the upstream connect later.
    pub fn unresolved() -> Self {
        Self {
            host: String::new(),
            port: 80,
            path: String::new(),
        }
    }
}

/// Parse an absolute URI into host, port, and path.
///
/// The host runs from the end of the scheme to the first space, `:`, `/`,
/// CR, or LF. The port is the decimal integer after a `:` immediately
/// following the host; absent means 80, non-numeric means 0. The path is
/// everything after the first `/` past the scheme; a URI without one yields
/// the empty path.
pub fn resolve(uri: &str) -> Result<ResolvedTarget, ResolveError> {
    let bytes = uri.as_bytes();
    if bytes.len() < 7 || !bytes[..7].eq_ignore_ascii_case(b"http://") {
        return Err(ResolveError::MissingScheme {
            uri: uri.to_string(),
        });
    }

    let rest = &bytes[7..];
    let host_end = rest
        .iter()
        .position(|b| matches!(b, b' ' | b':' | b'/' | b'\r' | b'\n'))
        .unwrap_or(rest.len());
    let host = String::from_utf8_lossy(&rest[..host_end]).into_owned();

    let port = if rest.get(host_end) == Some(&b':') {
        parse_port(&rest[host_end + 1..])
    } else {
        80
    };

    let path = match rest.iter().position(|&b| b == b'/') {
        Some(slash) => String::from_utf8_lossy(&rest[slash + 1..]).into_owned(),
        None => String::new(),
    };

    Ok(ResolvedTarget { host, port, path })
}

/// Decimal port parse with `atoi` semantics: take leading digits, and yield
/// 0 when there are none or the value does not fit.
fn parse_port(bytes: &[u8]) -> u16 {
    let digits = bytes
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(bytes.len());
    std::str::from_utf8(&bytes[..digits])
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}
