//! # Quantum Wallet - Connectivity Supervisor (Subsystem 01)
//!
//! **Bounded Context:** Node Connectivity & Failover
//!
//! ## Purpose
//!
//! Keeps the wallet attached to one live node out of a fixed candidate list:
//! - Periodic health check of the current endpoint (1s tick)
//! - Parallel latency race across all candidates when it fails
//! - Commit of the fastest live candidate and reconnect of the primary handle
//! - One-time warning per disconnect episode, forced offline mode
//! - Manual endpoint override, probed once before it is applied
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Adapters (Outer)                                   │
//! │  - HttpEndpointProber: GET http://<addr>/ + marker  │
//! │  - Mocks (test-utils)                               │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports (Middle)                                     │
//! │  - EndpointProber, ChainHeightReader                │
//! │  - NodeConnection, WalletModeControl, Notifier      │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Inner - Pure Logic)                        │
//! │  - CandidateEndpoint, EndpointCell                  │
//! │  - RaceBoard, select_fastest                        │
//! │  - ConnectivityState machine                        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Single Writer**: only the supervisor writes the [`EndpointCell`]
//! 2. **Live Commit**: a candidate is committed only after a successful probe
//! 3. **Stable Tie-Break**: equal latencies keep list order
//! 4. **Edge-Triggered Warning**: at most one warning per failure streak
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let supervisor = Arc::new(ConnectivitySupervisor::new(config, ports)?);
//! let cell = supervisor.cell();
//! let handle = Arc::clone(&supervisor).spawn();
//! // ... every network call reads cell.get()
//! handle.shutdown().await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Concrete port implementations
pub mod adapters;
/// Pure connectivity logic
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

mod config;
mod error;

pub use config::ConnectivityConfig;
pub use error::{ConnectivityError, Result};

pub use domain::{
    is_host_port, CandidateEndpoint, ConnectivitySnapshot, ConnectivityState, EndpointCell,
    ProbeFailure, ProbeOutcome, SupervisorPhase,
};

pub use ports::{
    ChainHeightReader, ConnectivityNotifier, EndpointProber, NodeConnection, WalletModeControl,
};

pub use events::{ConnectivityEvent, DEGRADED_WARNING};

#[cfg(feature = "http")]
pub use adapters::HttpEndpointProber;

pub use service::{ConnectivitySupervisor, SupervisorHandle, SupervisorPorts};

/// Subsystem identifier used in log prefixes
pub const SUBSYSTEM_ID: u8 = 1;

/// Built-in local node candidate
pub const DEFAULT_LOCAL_ENDPOINT: &str = "127.0.0.1:10102";

/// Health loop period in milliseconds
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

/// Liveness probe timeout in milliseconds
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 1_000;

/// Signature string a node of the network includes in its root response
pub const DEFAULT_NETWORK_MARKER: &str = "quantum-chain";
