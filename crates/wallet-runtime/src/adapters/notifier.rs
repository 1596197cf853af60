//! UI notification sink.
//!
//! Logs every subsystem event and fans it out on a broadcast channel so a
//! front end (or a test) can subscribe. Slow subscribers lose the oldest
//! events rather than blocking the supervisor or the miners.

use qw_01_connectivity::{ConnectivityEvent, ConnectivityNotifier};
use qw_02_registration::{RegistrationEvent, RegistrationNotifier};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Default broadcast buffer depth
const EVENT_BUFFER: usize = 256;

/// Event from either subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "event")]
pub enum WalletEvent {
    /// From the connectivity supervisor
    Connectivity(ConnectivityEvent),
    /// From the registration engine
    Registration(RegistrationEvent),
}

/// Notifier for both subsystems.
#[derive(Debug, Clone)]
pub struct TracingNotifier {
    sender: broadcast::Sender<WalletEvent>,
}

impl Default for TracingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingNotifier {
    /// Create a notifier with the default buffer.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER);
        Self { sender }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.sender.subscribe()
    }

    fn publish(&self, event: WalletEvent) {
        // No subscribers is the normal headless case
        let _ = self.sender.send(event);
    }
}

impl ConnectivityNotifier for TracingNotifier {
    fn notify(&self, event: ConnectivityEvent) {
        match &event {
            ConnectivityEvent::Online {
                endpoint,
                chain_height,
            } => info!(%endpoint, chain_height, "Wallet online"),
            ConnectivityEvent::Degraded {
                endpoint,
                consecutive_failures,
            } => warn!(%endpoint, consecutive_failures, "Node connection lost"),
            ConnectivityEvent::HeightChanged { chain_height, .. } => {
                debug!(chain_height, "Chain height")
            }
            ConnectivityEvent::ConnectionWarning { message } => warn!("{}", message),
            ConnectivityEvent::EndpointRejected { address, reason } => {
                warn!(%address, %reason, "Custom endpoint rejected")
            }
        }
        self.publish(WalletEvent::Connectivity(event));
    }
}

impl RegistrationNotifier for TracingNotifier {
    fn notify(&self, event: RegistrationEvent) {
        match &event {
            RegistrationEvent::Progress(p) => debug!(
                threads = p.threads,
                remaining = p.remaining_estimate,
                fails = p.fail_count,
                hash = %p.hash_preview,
                "Mining"
            ),
            RegistrationEvent::MiningStopped => debug!("Mining stopped"),
            RegistrationEvent::Completed { tx_id } => {
                info!(%tx_id, "Account registered; wallet ready")
            }
            RegistrationEvent::Failed { error } => warn!(%error, "Registration failed"),
        }
        self.publish(WalletEvent::Registration(event));
    }
}
