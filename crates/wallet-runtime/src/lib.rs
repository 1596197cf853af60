//! # Quantum Wallet Runtime
//!
//! Wires the connectivity supervisor (qw-01) and the registration engine
//! (qw-02) to a live node over JSON-RPC.
//!
//! ## Modules
//!
//! - `config` - TOML config file with `[connectivity]`, `[registration]`
//!   and `[wallet]` sections
//! - `adapters` - node JSON-RPC client, local wallet, event notifier
//! - `runtime` - [`WalletRuntime`] assembly and lifecycle
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry from the environment
//! 2. Load the config file (defaults when missing)
//! 3. Build adapters around one shared endpoint cell
//! 4. Start the connectivity loop
//! 5. Apply a manual endpoint override, if any
//! 6. Run registration, if requested

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod error;
pub mod runtime;

pub use config::{parse_account, WalletConfig, WalletSection};
pub use error::{Result, RpcError, RuntimeError};
pub use runtime::WalletRuntime;

/// Default config file path
pub const DEFAULT_CONFIG_PATH: &str = "qw-wallet.toml";

/// Timeout for node JSON-RPC calls in milliseconds
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 10_000;

/// JSON-RPC method accepting a registration transaction
pub const DEFAULT_REGISTER_METHOD: &str = "qc_registerAccount";
