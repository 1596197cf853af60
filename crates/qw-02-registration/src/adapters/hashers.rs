//! SHA-256 based attempt hashers.

use crate::config::HashAlgorithm;
use crate::domain::AttemptHash;
use crate::ports::AttemptHasher;
use crate::utils::hashing::{sha256, sha256d};
use std::sync::Arc;

/// Single SHA-256 over the attempt payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl AttemptHasher for Sha256Hasher {
    #[inline]
    fn hash(&self, payload: &[u8]) -> AttemptHash {
        AttemptHash(sha256(payload))
    }
}

/// Double SHA-256 over the attempt payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256dHasher;

impl AttemptHasher for Sha256dHasher {
    #[inline]
    fn hash(&self, payload: &[u8]) -> AttemptHash {
        AttemptHash(sha256d(payload))
    }
}

/// Hasher for the configured algorithm.
pub fn hasher_for(algorithm: HashAlgorithm) -> Arc<dyn AttemptHasher> {
    match algorithm {
        HashAlgorithm::Sha256 => Arc::new(Sha256Hasher),
        HashAlgorithm::Sha256d => Arc::new(Sha256dHasher),
    }
}
