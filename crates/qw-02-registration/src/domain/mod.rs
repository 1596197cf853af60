//! # Domain Layer
//!
//! Pure registration logic: attempts, the winning predicate and the per-run
//! race state shared by workers.

pub mod attempt;
pub mod predicate;
pub mod race;

pub use attempt::{AttemptHash, RegistrationAttempt, SubmissionReceipt};
pub use predicate::WinningPredicate;
pub use race::{RaceState, RegistrationStats, Winner, WinnerSignal};
