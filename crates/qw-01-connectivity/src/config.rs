//! Configuration types for connectivity supervision

use crate::domain::CandidateEndpoint;
use crate::error::{ConnectivityError, Result};
use serde::Deserialize;
use std::time::Duration;

/// Runtime configuration for the connectivity supervisor
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    /// Ordered candidate list. The first entry is the preferred slot and
    /// may have an empty address.
    pub candidates: Vec<CandidateEndpoint>,

    /// Tick period of the health loop (default: 1000 ms)
    pub tick_interval_ms: u64,

    /// Upper bound on a single liveness probe (default: 1000 ms)
    pub probe_timeout_ms: u64,

    /// Signature string a node of this network includes in its root response
    pub network_marker: String,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            candidates: vec![
                CandidateEndpoint::new("", "preferred"),
                CandidateEndpoint::new(crate::DEFAULT_LOCAL_ENDPOINT, "localhost"),
            ],
            tick_interval_ms: crate::DEFAULT_TICK_INTERVAL_MS,
            probe_timeout_ms: crate::DEFAULT_PROBE_TIMEOUT_MS,
            network_marker: crate::DEFAULT_NETWORK_MARKER.to_string(),
        }
    }
}

impl ConnectivityConfig {
    /// Fast intervals for tests
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_testing(candidates: Vec<CandidateEndpoint>) -> Self {
        Self {
            candidates,
            tick_interval_ms: 10,
            probe_timeout_ms: 200,
            ..Self::default()
        }
    }

    /// Address of the preferred slot, empty when unconfigured.
    pub fn preferred_address(&self) -> String {
        self.candidates
            .first()
            .map(|c| c.address.trim().to_string())
            .unwrap_or_default()
    }

    /// Tick period
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Probe timeout
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Check the configuration before starting the supervisor.
    pub fn validate(&self) -> Result<()> {
        if self.candidates.is_empty() {
            return Err(ConnectivityError::InvalidConfig(
                "candidate list is empty".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 || self.probe_timeout_ms == 0 {
            return Err(ConnectivityError::InvalidConfig(
                "tick interval and probe timeout must be non-zero".to_string(),
            ));
        }
        if self.network_marker.is_empty() {
            return Err(ConnectivityError::InvalidConfig(
                "network marker is empty".to_string(),
            ));
        }
        Ok(())
    }
}
