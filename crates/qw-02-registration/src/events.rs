//! Outbound events (published to the UI collaborator)

use serde::Serialize;

/// Mining progress tuple shown while a run is active.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MiningProgress {
    /// Worker count
    pub threads: usize,
    /// Advisory estimate of attempts still needed (may be negative)
    pub remaining_estimate: i64,
    /// Losing attempts so far
    pub fail_count: u64,
    /// Winning attempts so far
    pub win_count: u64,
    /// Hex of the first bytes of a recent hash
    pub hash_preview: String,
}

/// Registration notifications.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum RegistrationEvent {
    /// Periodic progress while mining
    Progress(MiningProgress),

    /// Mining finished; hide progress indicators
    MiningStopped,

    /// The registration was accepted; the wallet is ready to transact
    Completed {
        /// Transaction id of the registration
        tx_id: String,
    },

    /// The winning attempt was rejected on submission
    Failed {
        /// User-facing error
        error: String,
    },
}
