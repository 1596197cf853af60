//! Error types for the registration engine

use thiserror::Error;

/// Result type alias for registration operations
pub type Result<T> = std::result::Result<T, RegistrationError>;

/// Errors that can end a registration run
///
/// Mining itself cannot fail; only setup and the final submission can.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The node rejected the winning attempt. Terminal for the run.
    #[error("Registration submission failed: {0}")]
    SubmissionFailed(String),

    /// Every worker exited without publishing a winner
    #[error("All {workers} mining workers exited without a winner")]
    WorkersExited {
        /// Workers started for the run
        workers: usize,
    },

    /// A worker thread could not be started
    #[error("Failed to spawn mining worker: {0}")]
    WorkerSpawn(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RegistrationError {
    /// True when the user can simply trigger registration again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::SubmissionFailed(_) | Self::WorkersExited { .. } | Self::WorkerSpawn(_)
        )
    }
}
