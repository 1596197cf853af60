//! # Quantum Wallet Test Suite
//!
//! Unified test crate for flows that cross subsystem boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fake_node.rs      # In-process node: HTTP root + JSON-RPC
//! └── integration/      # Cross-crate flows
//!     ├── connectivity_flows.rs
//!     ├── registration_flows.rs
//!     └── runtime_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qw-tests
//! cargo test -p qw-tests integration::runtime_flows
//! ```

#![allow(dead_code)]

pub mod fake_node;
pub mod integration;
