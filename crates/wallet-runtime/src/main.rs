//! # Quantum Wallet
//!
//! Headless wallet process: keeps a connection to the fastest reachable
//! node and optionally mines the account registration.
//!
//! ```text
//! qw-wallet --config qw-wallet.toml --endpoint 10.0.0.5:10102 --register
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use wallet_runtime::{WalletConfig, WalletRuntime, DEFAULT_CONFIG_PATH};
use wallet_telemetry::{init_logging, TelemetryConfig};

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "qw-wallet", version, about = "Quantum Wallet node client")]
struct Args {
    /// Config file (missing file means defaults)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Use this node (host:port) instead of racing the candidate list
    #[arg(long)]
    endpoint: Option<String>,

    /// Mine and submit the account registration
    #[arg(long)]
    register: bool,

    /// Account key in hex, overrides the config file
    #[arg(long)]
    account: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&TelemetryConfig::from_env()).context("Failed to initialize logging")?;

    let mut config = WalletConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    if let Some(account) = args.account {
        config.wallet.account = Some(account);
    }

    let runtime = WalletRuntime::new(config).context("Failed to build wallet runtime")?;
    runtime.start();

    if let Some(endpoint) = &args.endpoint {
        match runtime.set_endpoint(endpoint).await {
            Ok(()) => info!("Using node {}", endpoint),
            Err(e) => error!("Custom endpoint not applied: {}", e),
        }
    }

    if args.register {
        runtime.spawn_register();
    }

    info!("Wallet is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    Ok(())
}
