//! # Adapters Layer
//!
//! Concrete hashers and test doubles.

pub mod hashers;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use hashers::{hasher_for, Sha256Hasher, Sha256dHasher};
