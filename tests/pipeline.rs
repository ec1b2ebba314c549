//! End-to-end tests for the forwarding pipeline.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use relay_proxy::{Dispatcher, ProxyConfig, ProxyContext};

mod common;

/// Start the proxy on an ephemeral port with the given access-log path.
async fn start_proxy(log_path: &Path) -> SocketAddr {
    let mut config = ProxyConfig::default();
    config.access_log.path = log_path.to_string_lossy().into_owned();

    let context = Arc::new(ProxyContext::new(&config).unwrap());
    let dispatcher = Dispatcher::bind("127.0.0.1:0").await.unwrap();
    let addr = dispatcher.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = dispatcher.run(context).await;
    });
    addr
}

#[tokio::test]
async fn forwards_the_response_and_logs_the_exchange() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("proxy.log");
    let proxy = start_proxy(&log_path).await;
    let origin = common::start_origin("hello from origin").await;

    let uri = format!("http://{origin}/greeting");
    let response = common::proxied_get(proxy, &uri).await;

    let text = String::from_utf8_lossy(&response);
    assert!(text.starts_with("HTTP/1.0 200 OK"));
    assert!(text.ends_with("hello from origin"));

    let log = tokio::fs::read_to_string(&log_path).await.unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(": 127.0.0.1 "));
    assert!(lines[0].contains(&uri));
    assert!(lines[0].ends_with(&format!("{} {}", uri, response.len())));
}

#[tokio::test]
async fn origin_sees_a_normalized_request() {
    let dir = tempfile::tempdir().unwrap();
    let proxy = start_proxy(&dir.path().join("proxy.log")).await;
    let (origin, mut seen) = common::start_capturing_origin().await;

    let uri = format!("http://{origin}/path");
    let _response = common::proxied_get(proxy, &uri).await;

    let forwarded = seen.recv().await.unwrap();
    let forwarded = String::from_utf8_lossy(&forwarded);
    assert!(forwarded.starts_with(&format!("GET {uri} HTTP/1.0\r\n")));
    assert!(!forwarded.contains("HTTP/1.1"));
    assert!(!forwarded.contains("Connection:"));
}

#[tokio::test]
async fn non_get_requests_are_closed_silently() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("proxy.log");
    let proxy = start_proxy(&log_path).await;

    let mut stream = TcpStream::connect(proxy).await.unwrap();
    stream
        .write_all(b"POST http://127.0.0.1:1/ HTTP/1.1\r\nHost: x\r\n\r\n")
        .await
        .unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();

    assert!(response.is_empty());
    assert!(!log_path.exists());
}

#[tokio::test]
async fn missing_scheme_aborts_without_a_response() {
    let dir = tempfile::tempdir().unwrap();
    let proxy = start_proxy(&dir.path().join("proxy.log")).await;

    let mut stream = TcpStream::connect(proxy).await.unwrap();
    stream
        .write_all(b"GET example.com/no-scheme HTTP/1.1\r\n\r\n")
        .await
        .unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();

    // Resolution fails leniently, then the connect to the empty host fails.
    assert!(response.is_empty());
}

#[tokio::test]
async fn truncated_header_block_aborts_without_a_response() {
    let dir = tempfile::tempdir().unwrap();
    let proxy = start_proxy(&dir.path().join("proxy.log")).await;

    let mut stream = TcpStream::connect(proxy).await.unwrap();
    stream
        .write_all(b"GET http://127.0.0.1:1/ HTTP/1.1\r\nHost: x\r\n")
        .await
        .unwrap();
    stream.shutdown().await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();

    assert!(response.is_empty());
}

#[tokio::test]
async fn concurrent_sessions_write_clean_log_lines() {
    const SESSIONS: usize = 16;

    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("proxy.log");
    let proxy = start_proxy(&log_path).await;
    let origin = common::start_origin("concurrent response body").await;

    let mut tasks = Vec::new();
    for i in 0..SESSIONS {
        let uri = format!("http://{origin}/item/{i}");
        tasks.push(tokio::spawn(async move {
            common::proxied_get(proxy, &uri).await
        }));
    }
    let mut response_len = 0;
    for task in tasks {
        let response = task.await.unwrap();
        assert!(!response.is_empty());
        response_len = response.len();
    }

    let log = tokio::fs::read_to_string(&log_path).await.unwrap();
    assert!(log.ends_with('\n'));
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), SESSIONS);
    for line in lines {
        // Every record is whole: timestamp, client, target, byte count.
        assert!(line.contains(": 127.0.0.1 http://"), "corrupt line: {line:?}");
        let count: u64 = line.rsplit(' ').next().unwrap().parse().unwrap();
        assert_eq!(count, response_len as u64);
    }
}

#[tokio::test]
async fn a_blocked_session_does_not_delay_others() {
    let dir = tempfile::tempdir().unwrap();
    let proxy = start_proxy(&dir.path().join("proxy.log")).await;
    let silent = common::start_silent_origin().await;
    let origin = common::start_origin("fast response").await;

    // Session A: its origin never answers, so it blocks indefinitely.
    let blocked_uri = format!("http://{silent}/stuck");
    let blocked = tokio::spawn(async move {
        common::proxied_get(proxy, &blocked_uri).await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Session B completes promptly regardless.
    let uri = format!("http://{origin}/quick");
    let response = timeout(Duration::from_secs(5), common::proxied_get(proxy, &uri))
        .await
        .expect("well-behaved session was delayed by a blocked one");
    assert!(String::from_utf8_lossy(&response).ends_with("fast response"));

    blocked.abort();
}
