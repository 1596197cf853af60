//! Candidate endpoints and the shared "current endpoint" cell.

use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::Arc;

/// A node the wallet may connect to.
///
/// Immutable once configured. The "preferred" slot may carry an empty
/// address, meaning the user has not configured a custom node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CandidateEndpoint {
    /// `host:port` of the node, or empty for an unconfigured preferred slot
    #[serde(default)]
    pub address: String,
    /// Human readable label shown in the UI
    pub display_name: String,
}

impl CandidateEndpoint {
    /// Create a new candidate.
    pub fn new(address: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            display_name: display_name.into(),
        }
    }

    /// True when the slot has no address (unconfigured preferred node).
    pub fn is_unconfigured(&self) -> bool {
        self.address.trim().is_empty()
    }
}

/// Validate that an address looks like `host:port`.
///
/// Only the shape is checked; name resolution happens when the node is probed.
pub fn is_host_port(address: &str) -> bool {
    let Some((host, port)) = address.rsplit_once(':') else {
        return false;
    };
    !host.is_empty() && !host.contains('/') && port.parse::<u16>().map_or(false, |p| p != 0)
}

/// Thread-safe handle to the active node address.
///
/// Written only by the connectivity supervisor; read by anything that talks
/// to the network. Readers get a snapshot and must tolerate the value
/// changing between two reads.
#[derive(Debug, Clone, Default)]
pub struct EndpointCell {
    inner: Arc<RwLock<String>>,
}

impl EndpointCell {
    /// Create a cell holding `initial` (may be empty).
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial.into())),
        }
    }

    /// Snapshot of the current address.
    pub fn get(&self) -> String {
        self.inner.read().clone()
    }

    /// True when no endpoint has been committed yet.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Replace the active address. Crate-private: only the supervisor commits.
    pub(crate) fn set(&self, address: &str) {
        let mut guard = self.inner.write();
        if *guard != address {
            *guard = address.to_string();
        }
    }
}
