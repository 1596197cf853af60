//! Configuration types for the registration engine

use crate::error::{RegistrationError, Result};
use serde::Deserialize;
use std::time::Duration;

/// Runtime configuration for registration mining
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Number of mining workers (default: available processing units)
    pub workers: Option<usize>,

    /// Leading zero bytes a winning hash must have (default: 3)
    pub zero_prefix_bytes: usize,

    /// Starting value of the remaining-attempts estimate (default: 21,000,000)
    pub expected_attempts: i64,

    /// Content hash of an attempt
    pub algorithm: HashAlgorithm,

    /// Progress report period (default: 500 ms)
    pub progress_interval_ms: u64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            workers: None,
            zero_prefix_bytes: crate::DEFAULT_ZERO_PREFIX_BYTES,
            expected_attempts: crate::DEFAULT_EXPECTED_ATTEMPTS,
            algorithm: HashAlgorithm::default(),
            progress_interval_ms: crate::DEFAULT_PROGRESS_INTERVAL_MS,
        }
    }
}

impl RegistrationConfig {
    /// Cheap target and fast reporting for tests
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_testing(workers: usize) -> Self {
        Self {
            workers: Some(workers),
            zero_prefix_bytes: 1,
            expected_attempts: 256,
            progress_interval_ms: 10,
            ..Self::default()
        }
    }

    /// Worker count, queried once per run.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Progress report period
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    /// Check the configuration before a run.
    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(RegistrationError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.zero_prefix_bytes > 32 {
            return Err(RegistrationError::InvalidConfig(format!(
                "zero_prefix_bytes {} exceeds hash length",
                self.zero_prefix_bytes
            )));
        }
        if self.progress_interval_ms == 0 {
            return Err(RegistrationError::InvalidConfig(
                "progress interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Content hash used for attempts
#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// SHA-256 of the attempt payload
    #[default]
    #[serde(rename = "sha256")]
    Sha256,

    /// SHA-256d (Bitcoin-style): sha256(sha256(payload))
    #[serde(rename = "sha256d")]
    Sha256d,
}
