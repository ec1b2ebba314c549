//! Access-log records.
//!
//! # Responsibilities
//! - Format one record per completed (non-empty) response
//! - Append records to the shared log file under the log guard
//!
//! Record format:
//! `<weekday day month year time zone>: <a>.<b>.<c>.<d> <target> <bytes>`

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::guard::Guards;

/// Appender for the shared access log.
///
/// Each append opens the file, writes one record, and closes it again,
/// holding the process-wide log guard for the whole sequence.
#[derive(Debug)]
pub struct AccessLog {
    path: PathBuf,
    guards: Arc<Guards>,
}

impl AccessLog {
    pub fn new(path: impl Into<PathBuf>, guards: Arc<Guards>) -> Self {
        Self {
            path: path.into(),
            guards,
        }
    }

    /// The log file path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Append one record for a completed response.
    pub async fn append(
        &self,
        client: IpAddr,
        target: &str,
        bytes: u64,
    ) -> std::io::Result<()> {
        let line = format_entry(Local::now(), client, target, bytes);

        let _held = self.guards.log.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Format a single record, including the trailing newline.
fn format_entry<Tz: TimeZone>(when: DateTime<Tz>, client: IpAddr, target: &str, bytes: u64) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let time = when.format("%a %d %b %Y %H:%M:%S %Z");
    let [a, b, c, d] = octets(client);
    format!("{time}: {a}.{b}.{c}.{d} {target} {bytes}\n")
}

/// Decompose the client address into dotted-decimal octets from its
/// host-order 32-bit value. IPv6 peers without a v4 mapping log 0.0.0.0.
fn octets(client: IpAddr) -> [u8; 4] {
    let host: u32 = match client {
        IpAddr::V4(v4) => v4.into(),
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(u32::from).unwrap_or(0),
    };
    [
        (host >> 24) as u8,
        (host >> 16) as u8,
        (host >> 8) as u8,
        host as u8,
    ]
}
