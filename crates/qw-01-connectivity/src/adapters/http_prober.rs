//! HTTP liveness prober.
//!
//! A node is alive when `GET http://<address>/` completes within the probe
//! timeout and the body contains the network marker. Any HTTP server that
//! answers without the marker is reported dead.

use crate::domain::{is_host_port, ProbeFailure, ProbeOutcome};
use crate::error::{ConnectivityError, Result};
use crate::ports::EndpointProber;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::debug;

/// Probes nodes over plain HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpEndpointProber {
    client: reqwest::Client,
    marker: String,
}

impl HttpEndpointProber {
    /// Create a prober with a whole-request `timeout`.
    pub fn new(timeout: Duration, marker: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ConnectivityError::InvalidConfig(format!("http client: {}", e)))?;

        Ok(Self {
            client,
            marker: marker.into(),
        })
    }

    async fn fetch_root(&self, address: &str) -> std::result::Result<String, ProbeFailure> {
        let url = format!("http://{}/", address);
        let response = self.client.get(&url).send().await.map_err(classify)?;
        response.text().await.map_err(classify)
    }
}

#[async_trait]
impl EndpointProber for HttpEndpointProber {
    async fn probe(&self, address: &str) -> ProbeOutcome {
        if !is_host_port(address) {
            return ProbeOutcome::dead(address, Duration::ZERO, ProbeFailure::InvalidAddress);
        }

        let started = Instant::now();
        let result = self.fetch_root(address).await;
        let elapsed = started.elapsed();

        let outcome = match result {
            Ok(body) if body.contains(&self.marker) => ProbeOutcome::alive(address, elapsed),
            Ok(_) => ProbeOutcome::dead(address, elapsed, ProbeFailure::MarkerMissing),
            Err(failure) => ProbeOutcome::dead(address, elapsed, failure),
        };

        debug!(
            endpoint = %address,
            elapsed_ms = elapsed.as_millis() as u64,
            alive = outcome.is_alive(),
            "[qw-01] probe finished"
        );
        outcome
    }
}

fn classify(error: reqwest::Error) -> ProbeFailure {
    if error.is_timeout() {
        ProbeFailure::Timeout
    } else if error.is_connect() {
        ProbeFailure::Refused
    } else {
        ProbeFailure::Http(error.to_string())
    }
}
