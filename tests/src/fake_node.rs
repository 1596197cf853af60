//! In-process fake node.
//!
//! Answers `GET /` with a body containing the network marker and `POST /`
//! with JSON-RPC for the handful of methods the wallet uses. One request per
//! connection; every response closes the socket.

use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Network id returned by `net_version`
pub const FAKE_NETWORK_ID: &str = "7";

#[derive(Debug, Default)]
struct NodeState {
    height: AtomicU64,
    /// Serve a foreign root page instead of the marker
    foreign: AtomicBool,
    reject_registrations: AtomicBool,
    delay: Mutex<Duration>,
    registrations: Mutex<Vec<String>>,
    rpc_calls: Mutex<Vec<String>>,
}

/// Fake node bound to a random local port. Dropping it stops the listener.
pub struct FakeNode {
    address: String,
    state: Arc<NodeState>,
    task: JoinHandle<()>,
}

impl FakeNode {
    /// Bind and start serving at `height`.
    pub async fn start(height: u64) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let state = Arc::new(NodeState::default());
        state.height.store(height, Ordering::SeqCst);

        let shared = Arc::clone(&state);
        let task = tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    return;
                };
                let state = Arc::clone(&shared);
                tokio::spawn(async move {
                    let _ = handle(socket, state).await;
                });
            }
        });

        Self {
            address,
            state,
            task,
        }
    }

    /// `host:port` of this node.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Change the reported chain height.
    pub fn set_height(&self, height: u64) {
        self.state.height.store(height, Ordering::SeqCst);
    }

    /// Serve a root page without the marker (the node looks dead).
    pub fn set_foreign(&self, foreign: bool) {
        self.state.foreign.store(foreign, Ordering::SeqCst);
    }

    /// Delay every response.
    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock() = delay;
    }

    /// Answer registration submissions with a JSON-RPC error.
    pub fn reject_registrations(&self, reject: bool) {
        self.state.reject_registrations.store(reject, Ordering::SeqCst);
    }

    /// Raw registration payloads received, in order.
    pub fn registrations(&self) -> Vec<String> {
        self.state.registrations.lock().clone()
    }

    /// JSON-RPC method names received, in order.
    pub fn rpc_calls(&self) -> Vec<String> {
        self.state.rpc_calls.lock().clone()
    }
}

impl Drop for FakeNode {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle(mut socket: TcpStream, state: Arc<NodeState>) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(header_end + content_length);
    let body = &buf[header_end..body_end];

    let delay = *state.delay.lock();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let (content_type, payload) = if head.starts_with("GET") {
        let page = if state.foreign.load(Ordering::SeqCst) {
            "<html>It works!</html>".to_string()
        } else {
            format!(
                "quantum-chain node (height {})",
                state.height.load(Ordering::SeqCst)
            )
        };
        ("text/plain", page)
    } else {
        ("application/json", rpc_response(&state, body).to_string())
    };

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        content_type,
        payload.len(),
        payload
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}

fn rpc_response(state: &NodeState, body: &[u8]) -> Value {
    let Ok(request) = serde_json::from_slice::<Value>(body) else {
        return json!({
            "jsonrpc": "2.0",
            "id": null,
            "error": { "code": -32700, "message": "parse error" }
        });
    };
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    state.rpc_calls.lock().push(method.clone());

    let result = match method.as_str() {
        "eth_blockNumber" => Ok(json!(format!(
            "0x{:x}",
            state.height.load(Ordering::SeqCst)
        ))),
        "net_version" => Ok(json!(FAKE_NETWORK_ID)),
        "qc_registerAccount" => {
            let raw = request["params"][0].as_str().unwrap_or_default().to_string();
            state.registrations.lock().push(raw.clone());
            if state.reject_registrations.load(Ordering::SeqCst) {
                Err((-32000, "registration rejected".to_string()))
            } else {
                // Deterministic id derived from the payload tail
                let tail = raw.get(raw.len().saturating_sub(16)..).unwrap_or_default();
                Ok(json!(format!("0x{}", tail)))
            }
        }
        other => Err((-32601, format!("method not found: {}", other))),
    };

    match result {
        Ok(value) => json!({ "jsonrpc": "2.0", "id": id, "result": value }),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message }
        }),
    }
}

/// An address nothing listens on.
pub async fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);
    address
}
