//! # Quantum Wallet - Registration Engine (Subsystem 02)
//!
//! **Bounded Context:** Account Registration Proof-of-Work
//!
//! ## Purpose
//!
//! Mines the proof-of-work a new account needs before the network accepts
//! it. One worker thread per processing unit draws fresh attempts from the
//! wallet and hashes them; the first hash with the required zero prefix wins,
//! all workers stop, and that one attempt is submitted.
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Adapters (Outer)                                   │
//! │  - Sha256Hasher, Sha256dHasher                      │
//! │  - StubWallet, NthCallHasher (test-utils)           │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports (Middle)                                     │
//! │  - RegistrationWallet, AttemptHasher                │
//! │  - RegistrationNotifier                             │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Inner - Pure Logic)                        │
//! │  - RegistrationAttempt, AttemptHash                 │
//! │  - WinningPredicate                                 │
//! │  - RaceState, WinnerSignal                          │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Single Submission**: exactly one attempt is submitted per run
//! 2. **First Writer Wins**: the winner signal accepts one publish only
//! 3. **Cooperative Stop**: workers check the stop flag once per attempt
//! 4. **No Re-Mining**: a rejected submission ends the run
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let engine = RegistrationEngine::new(RegistrationConfig::default(), wallet, notifier)?;
//! match engine.register().await? {
//!     RegistrationOutcome::Registered { receipt, .. } => println!("{}", receipt.tx_id),
//!     RegistrationOutcome::Skipped(reason) => println!("nothing to do: {:?}", reason),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Concrete hashers and test doubles
pub mod adapters;
/// Pure registration logic
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;
pub mod utils;

mod config;
mod error;
mod metrics;

pub use config::{HashAlgorithm, RegistrationConfig};
pub use error::{RegistrationError, Result};
pub use metrics::Metrics;

pub use domain::{
    AttemptHash, RegistrationAttempt, RegistrationStats, SubmissionReceipt, WinningPredicate,
};

pub use ports::{AttemptHasher, RegistrationNotifier, RegistrationWallet};

pub use events::{MiningProgress, RegistrationEvent};

pub use service::{RegistrationEngine, RegistrationOutcome, SkipReason};

/// Subsystem identifier used in log prefixes
pub const SUBSYSTEM_ID: u8 = 2;

/// Leading zero bytes a winning hash needs
pub const DEFAULT_ZERO_PREFIX_BYTES: usize = 3;

/// Initial remaining-attempts estimate for a three-zero-byte target
pub const DEFAULT_EXPECTED_ATTEMPTS: i64 = 21_000_000;

/// Progress report period in milliseconds
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 500;
