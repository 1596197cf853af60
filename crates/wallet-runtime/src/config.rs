//! Wallet configuration file.
//!
//! # Config File Format
//!
//! ```toml
//! [connectivity]
//! tick_interval_ms = 1000
//! probe_timeout_ms = 1000
//! network_marker = "quantum-chain"
//! candidates = [
//!     { address = "", display_name = "preferred" },
//!     { address = "127.0.0.1:10102", display_name = "localhost" },
//! ]
//!
//! [registration]
//! workers = 8
//! zero_prefix_bytes = 3
//! algorithm = "sha256"
//!
//! [wallet]
//! account = "9f2c...e1"
//! registered = false
//! ```
//!
//! Every section and field is optional.

use crate::error::{Result, RuntimeError};
use qw_01_connectivity::ConnectivityConfig;
use qw_02_registration::RegistrationConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Top-level wallet configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Node supervision
    pub connectivity: ConnectivityConfig,
    /// Registration mining
    pub registration: RegistrationConfig,
    /// Local wallet settings
    pub wallet: WalletSection,
}

/// `[wallet]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WalletSection {
    /// Hex account key; no key means no wallet is loaded
    pub account: Option<String>,
    /// Whether the account is already registered on the network
    pub registered: bool,
    /// Timeout for node JSON-RPC calls (default: 10 s)
    pub rpc_timeout_ms: u64,
    /// JSON-RPC method that accepts a registration transaction
    pub register_method: String,
}

impl Default for WalletSection {
    fn default() -> Self {
        Self {
            account: None,
            registered: false,
            rpc_timeout_ms: crate::DEFAULT_RPC_TIMEOUT_MS,
            register_method: crate::DEFAULT_REGISTER_METHOD.to_string(),
        }
    }
}

impl WalletConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                info!("Loading config from {}", path.display());
                Self::from_toml_str(&contents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Config {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(RuntimeError::ConfigRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.connectivity.validate()?;
        self.registration.validate()?;
        if let Some(account) = &self.wallet.account {
            parse_account(account)?;
        }
        Ok(())
    }
}

/// Decode a hex account key, with or without `0x`.
pub fn parse_account(account: &str) -> Result<Vec<u8>> {
    let trimmed = account.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(RuntimeError::InvalidAccount("empty key".to_string()));
    }
    hex::decode(digits).map_err(|e| RuntimeError::InvalidAccount(e.to_string()))
}
