//! Wallet runtime: wires both subsystems to a live node.
//!
//! ```text
//!              ┌──────────────────────┐
//!              │  ConnectivitySupervisor (qw-01)
//!              └──────────┬───────────┘
//!                         │ commits
//!                         ▼
//!                   EndpointCell ◄──── NodeRpcClient ◄──── LocalWallet
//!                                                            ▲
//!              ┌──────────────────────┐                      │ submit
//!              │  RegistrationEngine (qw-02) ─────────────────┘
//!              └──────────────────────┘
//! ```

use crate::adapters::{LocalWallet, NodeRpcClient, TracingNotifier, WalletEvent};
use crate::config::{parse_account, WalletConfig};
use crate::error::Result;
use parking_lot::Mutex;
use qw_01_connectivity::{
    ConnectivitySnapshot, ConnectivitySupervisor, EndpointCell, EndpointProber,
    HttpEndpointProber, SupervisorHandle, SupervisorPorts,
};
use qw_02_registration::{RegistrationEngine, RegistrationOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Running wallet process.
pub struct WalletRuntime {
    supervisor: Arc<ConnectivitySupervisor>,
    engine: Arc<RegistrationEngine>,
    rpc: Arc<NodeRpcClient>,
    wallet: Arc<LocalWallet>,
    notifier: Arc<TracingNotifier>,
    handle: Mutex<Option<SupervisorHandle>>,
    registration: Mutex<Option<JoinHandle<()>>>,
}

impl WalletRuntime {
    /// Build the runtime with the HTTP liveness prober.
    pub fn new(config: WalletConfig) -> Result<Self> {
        let prober = HttpEndpointProber::new(
            config.connectivity.probe_timeout(),
            config.connectivity.network_marker.clone(),
        )?;
        Self::with_prober(config, Arc::new(prober))
    }

    /// Build the runtime around a custom prober.
    pub fn with_prober(config: WalletConfig, prober: Arc<dyn EndpointProber>) -> Result<Self> {
        config.validate()?;

        let account = config
            .wallet
            .account
            .as_deref()
            .map(parse_account)
            .transpose()?;

        let cell = EndpointCell::default();
        let rpc = Arc::new(NodeRpcClient::new(
            cell.clone(),
            Duration::from_millis(config.wallet.rpc_timeout_ms),
        )?);
        let wallet = Arc::new(LocalWallet::new(
            account,
            config.wallet.registered,
            Arc::clone(&rpc),
            config.wallet.register_method.clone(),
        ));
        let notifier = Arc::new(TracingNotifier::new());

        let ports = SupervisorPorts {
            prober,
            heights: rpc.clone(),
            connection: rpc.clone(),
            wallet: wallet.clone(),
            notifier: notifier.clone(),
        };
        let supervisor = Arc::new(ConnectivitySupervisor::with_cell(
            config.connectivity,
            ports,
            cell,
        )?);
        let engine = Arc::new(RegistrationEngine::new(
            config.registration,
            wallet.clone(),
            notifier.clone(),
        )?);

        Ok(Self {
            supervisor,
            engine,
            rpc,
            wallet,
            notifier,
            handle: Mutex::new(None),
            registration: Mutex::new(None),
        })
    }

    /// Start the connectivity loop. Calling it twice has no effect.
    pub fn start(&self) {
        let mut handle = self.handle.lock();
        if handle.is_some() {
            return;
        }
        info!("===========================================");
        info!("  Quantum Wallet Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");
        if let Some(account) = self.wallet.account_hex() {
            info!("  Account: {}", account);
        }
        *handle = Some(Arc::clone(&self.supervisor).spawn());
    }

    /// Probe `address` once and switch to it if it answers.
    pub async fn set_endpoint(&self, address: &str) -> Result<()> {
        self.supervisor.set_custom_endpoint(address).await?;
        Ok(())
    }

    /// Mine and submit the account registration.
    pub async fn register(&self) -> Result<RegistrationOutcome> {
        Ok(self.engine.register().await?)
    }

    /// Run [`register`](Self::register) in the background and log the
    /// outcome. The task is cancelled by [`shutdown`](Self::shutdown).
    /// Does nothing while an earlier background run is unfinished.
    pub fn spawn_register(&self) {
        let mut slot = self.registration.lock();
        if slot.as_ref().is_some_and(|task| !task.is_finished()) {
            info!("Registration already running in the background");
            return;
        }
        let engine = Arc::clone(&self.engine);
        *slot = Some(tokio::spawn(async move {
            report_registration(engine.register().await);
        }));
    }

    /// Connectivity state for display.
    pub fn snapshot(&self) -> ConnectivitySnapshot {
        self.supervisor.snapshot()
    }

    /// Subscribe to events from both subsystems.
    pub fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.notifier.subscribe()
    }

    /// Connectivity supervisor.
    pub fn supervisor(&self) -> Arc<ConnectivitySupervisor> {
        Arc::clone(&self.supervisor)
    }

    /// Registration engine.
    pub fn engine(&self) -> Arc<RegistrationEngine> {
        Arc::clone(&self.engine)
    }

    /// Node client following the active endpoint.
    pub fn rpc(&self) -> Arc<NodeRpcClient> {
        Arc::clone(&self.rpc)
    }

    /// Local wallet.
    pub fn wallet(&self) -> Arc<LocalWallet> {
        Arc::clone(&self.wallet)
    }

    /// Cancel a background registration and stop the connectivity loop.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        let registration = self.registration.lock().take();
        if let Some(task) = registration {
            task.abort();
            // Mining threads are joined when the task drops its run
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!("Registration task ended abnormally: {}", e);
                }
            }
        }
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            handle.shutdown().await;
        }
        info!("Shutdown complete");
    }
}

fn report_registration(result: qw_02_registration::Result<RegistrationOutcome>) {
    match result {
        Ok(RegistrationOutcome::Registered { receipt, stats, .. }) => info!(
            tx_id = %receipt.tx_id,
            attempts = stats.attempts,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "Registration complete"
        ),
        Ok(RegistrationOutcome::Skipped(reason)) => {
            info!("Registration not needed: {:?}", reason)
        }
        Err(e) => error!("Registration failed: {}", e),
    }
}
