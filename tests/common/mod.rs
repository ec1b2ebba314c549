//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Start a mock origin that returns a fixed HTTP response to every
/// connection, then closes it.
pub async fn start_origin(body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        read_header_block(&mut socket).await;
                        let response = format!(
                            "HTTP/1.0 200 OK\r\nContent-Length: {}\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock origin that captures each received header block and sends
/// it through the returned channel before responding.
pub async fn start_capturing_origin() -> (SocketAddr, mpsc::UnboundedReceiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let seen = read_header_block(&mut socket).await;
                        let _ = tx.send(seen);
                        let _ = socket.write_all(b"HTTP/1.0 200 OK\r\n\r\nok").await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, rx)
}

/// Start a mock origin that accepts connections and never responds.
pub async fn start_silent_origin() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    // Keep the socket open without ever writing to it.
                    held.push(socket);
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Issue one proxied GET through the proxy and read until the connection
/// closes.
pub async fn proxied_get(proxy: SocketAddr, uri: &str) -> Vec<u8> {
    let mut stream = TcpStream::connect(proxy).await.unwrap();
    let request = format!("GET {uri} HTTP/1.1\r\nHost: test\r\nConnection: keep-alive\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    response
}

/// Read one request header block (up to and including the blank line).
async fn read_header_block(socket: &mut TcpStream) -> Vec<u8> {
    let mut seen = Vec::new();
    let mut byte = [0u8; 1];
    while !seen.ends_with(b"\r\n\r\n") && !seen.ends_with(b"\n\n") {
        match tokio::time::timeout(Duration::from_secs(10), socket.read(&mut byte)).await {
            Ok(Ok(n)) if n > 0 => seen.push(byte[0]),
            _ => break,
        }
    }
    seen
}
