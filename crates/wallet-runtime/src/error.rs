//! Error types for the wallet runtime

use qw_01_connectivity::ConnectivityError;
use qw_02_registration::RegistrationError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors raised while assembling or driving the wallet runtime
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Account key is not valid hex
    #[error("Invalid account key: {0}")]
    InvalidAccount(String),

    /// Connectivity subsystem error
    #[error(transparent)]
    Connectivity(#[from] ConnectivityError),

    /// Registration subsystem error
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// HTTP client construction failed
    #[error("HTTP client: {0}")]
    HttpClient(String),
}

/// Errors from the node JSON-RPC client
#[derive(Debug, Error)]
pub enum RpcError {
    /// No endpoint has been committed yet
    #[error("No active node endpoint")]
    NoEndpoint,

    /// Transport-level failure
    #[error("Request to {address} failed: {source}")]
    Transport {
        /// Node address
        address: String,
        /// reqwest error
        source: reqwest::Error,
    },

    /// The node answered with a JSON-RPC error
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message
        message: String,
    },

    /// Response carried neither result nor error
    #[error("RPC response missing result")]
    MissingResult,

    /// A quantity was not `0x`-prefixed hex
    #[error("Invalid hex quantity: {0:?}")]
    InvalidQuantity(String),
}
