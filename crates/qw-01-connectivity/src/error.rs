//! Error types for the connectivity subsystem

use crate::domain::ProbeFailure;
use thiserror::Error;

/// Result type alias for connectivity operations
pub type Result<T> = std::result::Result<T, ConnectivityError>;

/// Errors that can occur while supervising node connectivity
#[derive(Debug, Error)]
pub enum ConnectivityError {
    /// Liveness probe against a node failed
    #[error("Probe of {address} failed: {reason}")]
    ProbeFailed {
        /// Probed address
        address: String,
        /// Failure reason
        reason: ProbeFailure,
    },

    /// No candidate endpoint answered during a race
    #[error("No reachable endpoint among {candidates} candidates")]
    NoReachableEndpoint {
        /// Number of candidates raced
        candidates: usize,
    },

    /// User-supplied endpoint failed its one-shot probe
    #[error("Endpoint {address} rejected: {reason}")]
    EndpointRejected {
        /// Rejected address
        address: String,
        /// Why it was rejected
        reason: ProbeFailure,
    },

    /// Address is not a `host:port` pair
    #[error("Invalid endpoint address: {0:?}")]
    InvalidAddress(String),

    /// Primary connection could not be re-pointed at the new endpoint
    #[error("Reconnect to {address} failed: {reason}")]
    ReconnectFailed {
        /// Target address
        address: String,
        /// Adapter-supplied reason
        reason: String,
    },

    /// Chain height query failed
    #[error("Height query failed: {0}")]
    HeightQuery(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConnectivityError {
    /// Transient failures that the tick loop absorbs and retries.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ProbeFailed { .. }
                | Self::NoReachableEndpoint { .. }
                | Self::ReconnectFailed { .. }
                | Self::HeightQuery(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_recoverability() {
        assert!(ConnectivityError::NoReachableEndpoint { candidates: 2 }.is_recoverable());
        assert!(ConnectivityError::ProbeFailed {
            address: "a:1".into(),
            reason: ProbeFailure::Timeout,
        }
        .is_recoverable());
        assert!(!ConnectivityError::EndpointRejected {
            address: "a:1".into(),
            reason: ProbeFailure::MarkerMissing,
        }
        .is_recoverable());
        assert!(!ConnectivityError::InvalidAddress(String::new()).is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = ConnectivityError::EndpointRejected {
            address: "10.0.0.1:8545".into(),
            reason: ProbeFailure::Refused,
        };
        assert_eq!(
            err.to_string(),
            "Endpoint 10.0.0.1:8545 rejected: connection refused"
        );
    }
}
