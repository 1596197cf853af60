//! # Driven Ports (Outbound SPI)
//!
//! Interfaces the host application implements for the engine.
//!
//! # Thread Safety
//!
//! The wallet and hasher are called from every mining thread at once and
//! must be `Send + Sync`.

use crate::domain::{AttemptHash, RegistrationAttempt, SubmissionReceipt};
use crate::events::RegistrationEvent;
use async_trait::async_trait;

/// Port: the wallet collaborator.
///
/// The engine never looks inside an attempt beyond hashing its payload.
#[async_trait]
pub trait RegistrationWallet: Send + Sync {
    /// True when a wallet is open.
    fn is_loaded(&self) -> bool;

    /// True when the open account is already registered on the network.
    fn is_registered(&self) -> bool;

    /// Build a fresh nonce-bearing attempt. Two calls never return the same
    /// attempt. Called on mining threads, so it must not block on I/O.
    fn new_registration_attempt(&self) -> RegistrationAttempt;

    /// Send the winning attempt to the network.
    async fn submit(&self, attempt: &RegistrationAttempt) -> Result<SubmissionReceipt, String>;
}

/// Port: content hash of an attempt.
pub trait AttemptHasher: Send + Sync {
    /// Hash `payload`. Pure computation; cannot fail.
    fn hash(&self, payload: &[u8]) -> AttemptHash;
}

/// Port: UI notification sink.
pub trait RegistrationNotifier: Send + Sync {
    /// Deliver one event. Must not block.
    fn notify(&self, event: RegistrationEvent);
}
