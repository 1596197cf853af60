//! Registration attempts and their content hashes.

use std::fmt;

/// A freshly built, unsubmitted registration transaction.
///
/// Opaque to the engine: only its content hash matters here. A new attempt
/// is requested for every hash trial; attempts are never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationAttempt {
    payload: Vec<u8>,
}

impl RegistrationAttempt {
    /// Wrap the serialized attempt produced by the wallet.
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }

    /// Bytes that are hashed.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consume the attempt, returning its bytes.
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

impl fmt::Debug for RegistrationAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationAttempt")
            .field("len", &self.payload.len())
            .field(
                "head",
                &hex::encode(&self.payload[..self.payload.len().min(8)]),
            )
            .finish()
    }
}

/// 32-byte content hash of an attempt.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptHash(pub [u8; 32]);

impl AttemptHash {
    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Number of leading zero bytes.
    pub fn leading_zero_bytes(&self) -> usize {
        self.0.iter().take_while(|b| **b == 0).count()
    }

    /// Truncated hex shown in progress reports.
    pub fn preview(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl fmt::Debug for AttemptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttemptHash({}..)", self.preview())
    }
}

impl fmt::Display for AttemptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Network acknowledgement of a submitted registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Transaction id assigned by the node
    pub tx_id: String,
}
