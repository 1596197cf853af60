//! # Driven Ports (Outbound SPI)
//!
//! Interfaces the host application implements for the supervisor.
//!
//! # Thread Safety
//!
//! All ports are `Send + Sync`: the race calls the prober from several
//! tasks at once.

use crate::domain::ProbeOutcome;
use crate::events::ConnectivityEvent;
use async_trait::async_trait;

/// Port: bounded-time liveness check against one node.
///
/// Implementations must not retry; retry policy belongs to the supervisor.
#[async_trait]
pub trait EndpointProber: Send + Sync {
    /// Probe `address` (`host:port`) and report liveness plus elapsed time.
    async fn probe(&self, address: &str) -> ProbeOutcome;
}

/// Port: chain height accessor on a node.
#[async_trait]
pub trait ChainHeightReader: Send + Sync {
    /// Current chain height as reported by `address`.
    async fn chain_height(&self, address: &str) -> Result<u64, String>;
}

/// Port: the primary connection handle used by every network call.
#[async_trait]
pub trait NodeConnection: Send + Sync {
    /// Re-point the connection at `address`.
    async fn reconnect(&self, address: &str) -> Result<(), String>;
}

/// Port: wallet online/offline switch.
pub trait WalletModeControl: Send + Sync {
    /// True when a wallet session is open.
    fn is_authenticated(&self) -> bool;

    /// Resume network-backed operation.
    fn set_online_mode(&self);

    /// Stop network-backed operation; the wallet keeps working locally.
    fn set_offline_mode(&self);
}

/// Port: UI notification sink.
pub trait ConnectivityNotifier: Send + Sync {
    /// Deliver one event. Must not block.
    fn notify(&self, event: ConnectivityEvent);
}
