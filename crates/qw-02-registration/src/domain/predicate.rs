//! Winning predicate for registration proof-of-work.

use super::attempt::AttemptHash;

/// Fixed-difficulty target: the first `zero_prefix_bytes` bytes of the hash
/// must be zero.
///
/// Difficulty is never adjusted during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinningPredicate {
    zero_prefix_bytes: usize,
}

impl WinningPredicate {
    /// Target requiring `zero_prefix_bytes` leading zero bytes (capped at 32).
    pub fn new(zero_prefix_bytes: usize) -> Self {
        Self {
            zero_prefix_bytes: zero_prefix_bytes.min(32),
        }
    }

    /// Required leading zero bytes.
    pub fn zero_prefix_bytes(&self) -> usize {
        self.zero_prefix_bytes
    }

    /// True if `hash` meets the target.
    #[inline]
    pub fn is_winning(&self, hash: &AttemptHash) -> bool {
        hash.0[..self.zero_prefix_bytes].iter().all(|b| *b == 0)
    }
}

impl Default for WinningPredicate {
    fn default() -> Self {
        Self::new(crate::DEFAULT_ZERO_PREFIX_BYTES)
    }
}
