//! Utility functions for the registration engine

pub mod hashing;

pub use hashing::{sha256, sha256d};
