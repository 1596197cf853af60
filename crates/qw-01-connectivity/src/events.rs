//! Outbound events (published to the UI collaborator)

use serde::Serialize;

/// Discrete connectivity notifications.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ConnectivityEvent {
    /// The wallet is online against `endpoint`
    Online {
        /// Active endpoint
        endpoint: String,
        /// Latest known chain height
        chain_height: u64,
    },

    /// The active endpoint stopped answering
    Degraded {
        /// Endpoint that failed (may be empty before the first commit)
        endpoint: String,
        /// Failed attempts in the current streak
        consecutive_failures: u32,
    },

    /// Chain height increased while healthy
    HeightChanged {
        /// Active endpoint
        endpoint: String,
        /// New height
        chain_height: u64,
    },

    /// One-time warning per disconnect episode
    ConnectionWarning {
        /// User-facing text
        message: String,
    },

    /// A user-supplied endpoint failed its probe and was not applied
    EndpointRejected {
        /// Rejected address
        address: String,
        /// Reason
        reason: String,
    },
}

/// Text of the one-time degraded warning.
pub const DEGRADED_WARNING: &str =
    "Unable to reach any known node. Configure a custom node endpoint in settings.";
