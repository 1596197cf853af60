//! Mock adapters for testing.

use crate::domain::{ProbeFailure, ProbeOutcome};
use crate::events::ConnectivityEvent;
use crate::ports::{ChainHeightReader, ConnectivityNotifier, EndpointProber, NodeConnection, WalletModeControl};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

// =============================================================================
// MOCK PROBER
// =============================================================================

#[derive(Debug, Clone)]
struct MockNode {
    latency: Duration,
    failure: Option<ProbeFailure>,
}

/// Mock prober with per-address latency and liveness.
///
/// Unknown addresses are reported as refused. Latencies are reported, not
/// slept, unless `with_real_latency` is set.
#[derive(Debug, Default)]
pub struct MockEndpointProber {
    nodes: Mutex<HashMap<String, MockNode>>,
    calls: Mutex<Vec<String>>,
    real_latency: bool,
}

impl MockEndpointProber {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Actually sleep for each node's latency before answering.
    pub fn with_real_latency(mut self) -> Self {
        self.real_latency = true;
        self
    }

    /// Mark `address` alive at `latency`.
    pub fn set_alive(&self, address: &str, latency: Duration) {
        self.nodes.lock().insert(
            address.to_string(),
            MockNode {
                latency,
                failure: None,
            },
        );
    }

    /// Mark `address` dead with `failure`.
    pub fn set_dead(&self, address: &str, failure: ProbeFailure) {
        self.nodes.lock().insert(
            address.to_string(),
            MockNode {
                latency: Duration::from_millis(1),
                failure: Some(failure),
            },
        );
    }

    /// Every address probed so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of probes against `address`.
    pub fn call_count(&self, address: &str) -> usize {
        self.calls.lock().iter().filter(|a| *a == address).count()
    }
}

#[async_trait]
impl EndpointProber for MockEndpointProber {
    async fn probe(&self, address: &str) -> ProbeOutcome {
        self.calls.lock().push(address.to_string());
        let node = self.nodes.lock().get(address).cloned();

        let Some(node) = node else {
            return ProbeOutcome::dead(address, Duration::from_millis(1), ProbeFailure::Refused);
        };
        if self.real_latency {
            tokio::time::sleep(node.latency).await;
        }
        match node.failure {
            None => ProbeOutcome::alive(address, node.latency),
            Some(failure) => ProbeOutcome::dead(address, node.latency, failure),
        }
    }
}

// =============================================================================
// MOCK HEIGHT READER / CONNECTION
// =============================================================================

/// Height reader returning a settable height for every address.
#[derive(Debug, Default)]
pub struct MockHeightReader {
    height: AtomicU64,
}

impl MockHeightReader {
    /// Reader starting at `height`.
    pub fn new(height: u64) -> Self {
        Self {
            height: AtomicU64::new(height),
        }
    }

    /// Change the reported height.
    pub fn set_height(&self, height: u64) {
        self.height.store(height, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChainHeightReader for MockHeightReader {
    async fn chain_height(&self, _address: &str) -> Result<u64, String> {
        Ok(self.height.load(Ordering::SeqCst))
    }
}

/// Connection handle that records reconnects and can be told to fail.
#[derive(Debug, Default)]
pub struct MockNodeConnection {
    fail: AtomicBool,
    reconnects: Mutex<Vec<String>>,
}

impl MockNodeConnection {
    /// Healthy connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent reconnects fail (or succeed again).
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Reconnect targets in call order.
    pub fn reconnects(&self) -> Vec<String> {
        self.reconnects.lock().clone()
    }
}

#[async_trait]
impl NodeConnection for MockNodeConnection {
    async fn reconnect(&self, address: &str) -> Result<(), String> {
        self.reconnects.lock().push(address.to_string());
        if self.fail.load(Ordering::SeqCst) {
            Err("mock reconnect failure".to_string())
        } else {
            Ok(())
        }
    }
}

// =============================================================================
// MOCK WALLET / NOTIFIER
// =============================================================================

/// Wallet mode switch recording the last mode applied.
#[derive(Debug, Default)]
pub struct MockWalletMode {
    authenticated: AtomicBool,
    offline_calls: AtomicU64,
    online_calls: AtomicU64,
}

impl MockWalletMode {
    /// Wallet with the given session state.
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated: AtomicBool::new(authenticated),
            ..Self::default()
        }
    }

    /// Times offline mode was forced.
    pub fn offline_calls(&self) -> u64 {
        self.offline_calls.load(Ordering::SeqCst)
    }

    /// Times online mode was restored.
    pub fn online_calls(&self) -> u64 {
        self.online_calls.load(Ordering::SeqCst)
    }
}

impl WalletModeControl for MockWalletMode {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    fn set_online_mode(&self) {
        self.online_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn set_offline_mode(&self) {
        self.offline_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Notifier that keeps every event.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<ConnectivityEvent>>,
}

impl RecordingNotifier {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far.
    pub fn events(&self) -> Vec<ConnectivityEvent> {
        self.events.lock().clone()
    }

    /// Number of one-time warnings delivered.
    pub fn warning_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, ConnectivityEvent::ConnectionWarning { .. }))
            .count()
    }
}

impl ConnectivityNotifier for RecordingNotifier {
    fn notify(&self, event: ConnectivityEvent) {
        self.events.lock().push(event);
    }
}
