use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::models::Configuration;

/// A request as it arrived on the socket. Header names and values are lowercased.
#[derive(Debug)]
pub struct Captured {
    pub request_line: String,
    pub headers: Vec<String>,
    pub body: String
}

impl Captured {
    pub fn has_header(&self, line: &str) -> bool {
        self.headers.iter().any(|header| header == &line.to_lowercase())
    }
}

/// Answers exactly one request on 127.0.0.1 with `status` and `body`.
pub async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let captured = read_request(&mut socket).await;
        let reply = format!("HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                            status, body.len(), body);
        socket.write_all(reply.as_bytes()).await.expect("reply");
        socket.shutdown().await.ok();
        captured
    });
    (base, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Captured {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        let read = socket.read(&mut chunk).await.expect("read");
        assert!(read > 0, "connection closed before headers ended");
        raw.extend_from_slice(&chunk[..read]);
        if let Some(at) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            break at;
        }
    };

    let head = String::from_utf8_lossy(&raw[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers = lines.map(str::to_lowercase).collect::<Vec<String>>();
    let length = headers.iter()
        .find_map(|h| h.strip_prefix("content-length: ").map(|v| v.trim().parse::<usize>().expect("length")))
        .unwrap_or(0);

    let mut body = raw[head_end + 4..].to_vec();
    while body.len() < length {
        let read = socket.read(&mut chunk).await.expect("read");
        assert!(read > 0, "connection closed before body ended");
        body.extend_from_slice(&chunk[..read]);
    }

    Captured { request_line, headers, body: String::from_utf8_lossy(&body).to_string() }
}

/// An address nothing listens on.
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    listener.local_addr().expect("addr")
}

pub fn config_for(status_base: &str, provider_base: &str) -> Configuration {
    serde_json::from_value(serde_json::json!({
        "api_key": "k",
        "zone_identifier": "z",
        "id": "r",
        "twitch_redis_cache_url": status_base,
        "provider_base_url": provider_base,
        "request_timeout_secs": 5
    })).expect("config")
}

/// Loopback traffic must not go through a proxy picked up from the environment.
pub fn local_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().expect("client")
}
