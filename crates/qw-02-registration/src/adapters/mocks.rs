//! Mock adapters for testing.

use crate::domain::{AttemptHash, RegistrationAttempt, SubmissionReceipt};
use crate::events::RegistrationEvent;
use crate::ports::{AttemptHasher, RegistrationNotifier, RegistrationWallet};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

// =============================================================================
// STUB WALLET
// =============================================================================

/// Wallet that issues counter-based attempts and records submissions.
#[derive(Debug)]
pub struct StubWallet {
    loaded: AtomicBool,
    registered: AtomicBool,
    issued: AtomicU64,
    submissions: Mutex<Vec<RegistrationAttempt>>,
    reject_with: Mutex<Option<String>>,
}

impl StubWallet {
    /// Loaded, unregistered wallet that accepts submissions.
    pub fn new() -> Self {
        Self {
            loaded: AtomicBool::new(true),
            registered: AtomicBool::new(false),
            issued: AtomicU64::new(0),
            submissions: Mutex::new(Vec::new()),
            reject_with: Mutex::new(None),
        }
    }

    /// Wallet with no account open.
    pub fn unloaded() -> Self {
        let wallet = Self::new();
        wallet.loaded.store(false, Ordering::SeqCst);
        wallet
    }

    /// Wallet whose account is already registered.
    pub fn registered() -> Self {
        let wallet = Self::new();
        wallet.registered.store(true, Ordering::SeqCst);
        wallet
    }

    /// Make the node reject submissions with `reason`.
    pub fn reject_submissions(&self, reason: &str) {
        *self.reject_with.lock() = Some(reason.to_string());
    }

    /// Attempts handed out so far.
    pub fn attempts_issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Every submitted attempt, in order.
    pub fn submissions(&self) -> Vec<RegistrationAttempt> {
        self.submissions.lock().clone()
    }
}

impl Default for StubWallet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistrationWallet for StubWallet {
    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    fn new_registration_attempt(&self) -> RegistrationAttempt {
        let nonce = self.issued.fetch_add(1, Ordering::SeqCst);
        let mut payload = b"register:".to_vec();
        payload.extend_from_slice(&nonce.to_be_bytes());
        RegistrationAttempt::new(payload)
    }

    async fn submit(&self, attempt: &RegistrationAttempt) -> Result<SubmissionReceipt, String> {
        self.submissions.lock().push(attempt.clone());
        if let Some(reason) = self.reject_with.lock().clone() {
            return Err(reason);
        }
        Ok(SubmissionReceipt {
            tx_id: format!("0x{}", hex::encode(&attempt.payload()[9..])),
        })
    }
}

// =============================================================================
// DETERMINISTIC HASHER
// =============================================================================

/// Hasher that returns an all-zero hash on exactly the Nth call (1-based)
/// and `0xff..` otherwise, counting calls across all workers.
#[derive(Debug)]
pub struct NthCallHasher {
    winning_call: u64,
    calls: AtomicU64,
    winning_payload: Mutex<Option<Vec<u8>>>,
}

impl NthCallHasher {
    /// Win on call `n`.
    pub fn new(n: u64) -> Self {
        Self {
            winning_call: n,
            calls: AtomicU64::new(0),
            winning_payload: Mutex::new(None),
        }
    }

    /// Hash calls so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Payload that produced the winning hash, once it happened.
    pub fn winning_payload(&self) -> Option<Vec<u8>> {
        self.winning_payload.lock().clone()
    }
}

impl AttemptHasher for NthCallHasher {
    fn hash(&self, payload: &[u8]) -> AttemptHash {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.winning_call {
            *self.winning_payload.lock() = Some(payload.to_vec());
            AttemptHash([0u8; 32])
        } else {
            AttemptHash([0xffu8; 32])
        }
    }
}

/// Hasher that never wins.
#[derive(Debug, Default)]
pub struct LosingHasher;

impl AttemptHasher for LosingHasher {
    fn hash(&self, _payload: &[u8]) -> AttemptHash {
        AttemptHash([0xffu8; 32])
    }
}

// =============================================================================
// RECORDING NOTIFIER
// =============================================================================

/// Notifier that keeps every event.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<RegistrationEvent>>,
}

impl RecordingNotifier {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far.
    pub fn events(&self) -> Vec<RegistrationEvent> {
        self.events.lock().clone()
    }

    /// Progress events only.
    pub fn progress_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, RegistrationEvent::Progress(_)))
            .count()
    }
}

impl RegistrationNotifier for RecordingNotifier {
    fn notify(&self, event: RegistrationEvent) {
        self.events.lock().push(event);
    }
}
