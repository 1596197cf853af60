//! # Wallet Telemetry
//!
//! Structured logging for the Quantum Wallet process.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wallet_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `qw-wallet` | Service name in logs |
//! | `QW_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `QW_JSON_LOGS` | `false` (`true` in containers) | JSON output |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};

use thiserror::Error;

/// Service name used when `OTEL_SERVICE_NAME` is unset
pub const DEFAULT_SERVICE_NAME: &str = "qw-wallet";

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The level filter could not be parsed
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber is already installed
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),
}
