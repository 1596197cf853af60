//! Hexagonal ports for registration mining

pub mod outbound;

pub use outbound::{AttemptHasher, RegistrationNotifier, RegistrationWallet};
