//! Connectivity Supervisor Service
//!
//! Owns the connectivity state and the shared [`EndpointCell`]. Each tick
//! health-checks the current endpoint; when it fails, every configured
//! candidate is probed in parallel and the fastest live one is committed.

use crate::config::ConnectivityConfig;
use crate::domain::{
    is_host_port, raceable, CandidateEndpoint, ConnectivitySnapshot, ConnectivityState,
    EndpointCell, ProbeFailure, ProbeOutcome, RaceBoard,
};
use crate::error::{ConnectivityError, Result};
use crate::events::{ConnectivityEvent, DEGRADED_WARNING};
use crate::ports::{
    ChainHeightReader, ConnectivityNotifier, EndpointProber, NodeConnection, WalletModeControl,
};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

/// Outbound ports the supervisor drives.
#[derive(Clone)]
pub struct SupervisorPorts {
    /// Liveness prober
    pub prober: Arc<dyn EndpointProber>,
    /// Chain height accessor
    pub heights: Arc<dyn ChainHeightReader>,
    /// Primary connection handle
    pub connection: Arc<dyn NodeConnection>,
    /// Wallet online/offline switch
    pub wallet: Arc<dyn WalletModeControl>,
    /// UI notification sink
    pub notifier: Arc<dyn ConnectivityNotifier>,
}

/// Periodic health-check and failover loop.
pub struct ConnectivitySupervisor {
    config: ConnectivityConfig,
    /// Ordered candidate list; slot 0 is the preferred node
    candidates: RwLock<Vec<CandidateEndpoint>>,
    cell: EndpointCell,
    state: Mutex<ConnectivityState>,
    /// Serializes ticks and manual overrides
    op_lock: tokio::sync::Mutex<()>,
    ports: SupervisorPorts,
}

impl ConnectivitySupervisor {
    /// Create a supervisor. The preferred candidate (possibly empty) becomes
    /// the initial current endpoint.
    pub fn new(config: ConnectivityConfig, ports: SupervisorPorts) -> Result<Self> {
        Self::with_cell(config, ports, EndpointCell::default())
    }

    /// Create a supervisor that commits into an existing `cell`.
    ///
    /// Lets adapters that read the cell (a node client, for instance) be
    /// built before the supervisor that drives them. The cell is reset to
    /// the preferred candidate.
    pub fn with_cell(
        config: ConnectivityConfig,
        ports: SupervisorPorts,
        cell: EndpointCell,
    ) -> Result<Self> {
        config.validate()?;

        let preferred = config.preferred_address();
        info!("[qw-01] Initializing Connectivity Supervisor");
        info!("  Candidates: {}", config.candidates.len());
        info!("  Tick Interval: {}ms", config.tick_interval_ms);
        info!("  Probe Timeout: {}ms", config.probe_timeout_ms);

        cell.set(&preferred);
        Ok(Self {
            candidates: RwLock::new(config.candidates.clone()),
            cell,
            state: Mutex::new(ConnectivityState::new(preferred)),
            op_lock: tokio::sync::Mutex::new(()),
            config,
            ports,
        })
    }

    /// Read handle to the active endpoint, for every component that talks
    /// to the network.
    pub fn cell(&self) -> EndpointCell {
        self.cell.clone()
    }

    /// Read-only copy of the connectivity state.
    pub fn snapshot(&self) -> ConnectivitySnapshot {
        ConnectivitySnapshot::from(&*self.state.lock())
    }

    /// Current candidate list, preferred slot first.
    pub fn candidates(&self) -> Vec<CandidateEndpoint> {
        self.candidates.read().clone()
    }

    /// Run one supervision step.
    ///
    /// Errors are never fatal: the caller logs them and ticks again.
    pub async fn tick(&self) -> Result<()> {
        let _op = self.op_lock.lock().await;

        let current = self.cell.get();
        if !current.is_empty() {
            let outcome = self.probe_bounded(&current).await;
            if outcome.is_alive() {
                return self.on_current_healthy(&current).await;
            }
            debug!(
                endpoint = %current,
                reason = ?outcome.failure,
                "[qw-01] health probe failed"
            );
        }

        let (dropped, failures) = {
            let mut state = self.state.lock();
            (state.on_health_failed(), state.consecutive_failures)
        };
        if dropped {
            warn!(endpoint = %current, "[qw-01] endpoint unreachable, racing candidates");
            self.ports.notifier.notify(ConnectivityEvent::Degraded {
                endpoint: current,
                consecutive_failures: failures,
            });
        }

        self.run_race().await.map(|_| ())
    }

    /// Probe a user-supplied address once and commit it if alive.
    ///
    /// The address also replaces the preferred slot so later races include
    /// it. A dead address is rejected and the previous endpoint is kept.
    pub async fn set_custom_endpoint(&self, address: &str) -> Result<()> {
        let address = address.trim();
        if !is_host_port(address) {
            return Err(ConnectivityError::InvalidAddress(address.to_string()));
        }

        let _op = self.op_lock.lock().await;

        let outcome = self.probe_bounded(address).await;
        if let Some(reason) = outcome.failure {
            warn!(endpoint = %address, %reason, "[qw-01] custom endpoint rejected");
            self.ports.notifier.notify(ConnectivityEvent::EndpointRejected {
                address: address.to_string(),
                reason: reason.to_string(),
            });
            return Err(ConnectivityError::EndpointRejected {
                address: address.to_string(),
                reason,
            });
        }

        {
            let mut candidates = self.candidates.write();
            match candidates.first_mut() {
                Some(preferred) => preferred.address = address.to_string(),
                None => candidates.push(CandidateEndpoint::new(address, "preferred")),
            }
        }

        info!(
            endpoint = %address,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "[qw-01] custom endpoint accepted"
        );
        self.commit(address);
        self.connect(address).await
    }

    /// Start the tick loop on its own task.
    ///
    /// The first tick runs immediately. Dropping the handle without calling
    /// [`SupervisorHandle::shutdown`] also stops the loop.
    pub fn spawn(self: Arc<Self>) -> SupervisorHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let period = self.config.tick_interval();

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.tick().await {
                            if e.is_recoverable() {
                                debug!("[qw-01] tick: {}", e);
                            } else {
                                warn!("[qw-01] tick: {}", e);
                            }
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        info!("[qw-01] Shutdown signal received");
                        break;
                    }
                }
            }
        });

        SupervisorHandle { shutdown_tx, join }
    }

    async fn on_current_healthy(&self, address: &str) -> Result<()> {
        let recovered = self.state.lock().on_health_ok();
        if recovered {
            info!(endpoint = %address, "[qw-01] endpoint healthy");
            return self.connect(address).await;
        }

        match self.ports.heights.chain_height(address).await {
            Ok(height) => {
                let increased = self.state.lock().observe_height(height);
                if increased {
                    debug!(endpoint = %address, height, "[qw-01] chain height increased");
                    self.ports.notifier.notify(ConnectivityEvent::HeightChanged {
                        endpoint: address.to_string(),
                        chain_height: height,
                    });
                }
                Ok(())
            }
            Err(reason) => Err(ConnectivityError::HeightQuery(reason)),
        }
    }

    #[instrument(skip(self), fields(candidates = tracing::field::Empty))]
    async fn run_race(&self) -> Result<String> {
        let candidates = raceable(&self.candidates.read());
        tracing::Span::current().record("candidates", candidates.len());
        self.state.lock().on_race_started();

        let board = self.race(&candidates).await;
        for outcome in board.outcomes() {
            debug!(
                endpoint = %outcome.address,
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                alive = outcome.is_alive(),
                "[qw-01] race result"
            );
        }

        let Some(winner) = board.winner().cloned() else {
            let authenticated = self.ports.wallet.is_authenticated();
            let (effects, failures) = {
                let mut state = self.state.lock();
                (state.on_race_failed(authenticated), state.consecutive_failures)
            };
            debug!(failures, "[qw-01] no candidate answered");

            if effects.raise_warning {
                warn!("[qw-01] {}", DEGRADED_WARNING);
                self.ports.notifier.notify(ConnectivityEvent::ConnectionWarning {
                    message: DEGRADED_WARNING.to_string(),
                });
            }
            if effects.force_offline {
                info!("[qw-01] forcing wallet into offline mode");
                self.ports.wallet.set_offline_mode();
            }
            return Err(ConnectivityError::NoReachableEndpoint {
                candidates: candidates.len(),
            });
        };

        info!(
            endpoint = %winner.address,
            elapsed_ms = winner.elapsed.as_millis() as u64,
            "[qw-01] race won"
        );
        self.commit(&winner.address);
        self.connect(&winner.address).await?;
        Ok(winner.address)
    }

    /// Probe every candidate concurrently and wait for all of them.
    async fn race(&self, candidates: &[CandidateEndpoint]) -> RaceBoard {
        let board = Arc::new(Mutex::new(RaceBoard::new(candidates.len())));
        let timeout = self.config.probe_timeout();
        let mut probes = JoinSet::new();

        for (index, candidate) in candidates.iter().enumerate() {
            let prober = Arc::clone(&self.ports.prober);
            let board = Arc::clone(&board);
            let address = candidate.address.clone();
            probes.spawn(async move {
                let outcome = bounded(prober.as_ref(), &address, timeout).await;
                board.lock().record(index, outcome);
            });
        }

        while let Some(joined) = probes.join_next().await {
            if let Err(e) = joined {
                warn!("[qw-01] probe task failed: {}", e);
            }
        }

        let mut board = board.lock();
        std::mem::replace(&mut *board, RaceBoard::new(0))
    }

    fn commit(&self, address: &str) {
        self.cell.set(address);
        self.state.lock().on_race_committed(address);
    }

    /// Re-point the primary connection and report the result.
    async fn connect(&self, address: &str) -> Result<()> {
        if let Err(reason) = self.ports.connection.reconnect(address).await {
            self.state.lock().on_reconnect(false);
            warn!(endpoint = %address, %reason, "[qw-01] reconnect failed");
            return Err(ConnectivityError::ReconnectFailed {
                address: address.to_string(),
                reason,
            });
        }

        let height = self.ports.heights.chain_height(address).await.ok();
        let chain_height = {
            let mut state = self.state.lock();
            state.on_reconnect(true);
            if let Some(height) = height {
                state.observe_height(height);
            }
            state.chain_height
        };

        if self.ports.wallet.is_authenticated() {
            self.ports.wallet.set_online_mode();
        }
        info!(endpoint = %address, chain_height, "[qw-01] online");
        self.ports.notifier.notify(ConnectivityEvent::Online {
            endpoint: address.to_string(),
            chain_height,
        });
        Ok(())
    }

    async fn probe_bounded(&self, address: &str) -> ProbeOutcome {
        bounded(
            self.ports.prober.as_ref(),
            address,
            self.config.probe_timeout(),
        )
        .await
    }
}

/// Probe with an outer deadline so a misbehaving prober cannot stall a race.
async fn bounded(
    prober: &dyn EndpointProber,
    address: &str,
    timeout: std::time::Duration,
) -> ProbeOutcome {
    match tokio::time::timeout(timeout, prober.probe(address)).await {
        Ok(outcome) => outcome,
        Err(_) => ProbeOutcome::dead(address, timeout, ProbeFailure::Timeout),
    }
}

/// Handle to a running supervisor loop.
#[derive(Debug)]
pub struct SupervisorHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SupervisorHandle {
    /// Stop the loop and wait for the in-flight tick to finish.
    pub async fn shutdown(self) {
        if self.shutdown_tx.send(true).is_err() {
            debug!("[qw-01] supervisor loop already stopped");
        }
        if let Err(e) = self.join.await {
            warn!("[qw-01] supervisor task ended abnormally: {}", e);
        }
    }

    /// True once the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}
