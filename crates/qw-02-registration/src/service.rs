//! Registration Engine Service
//!
//! Runs one proof-of-work search per registration request: a pool of OS
//! threads draws fresh attempts from the wallet until one hash meets the
//! winning predicate, then the coordinator stops the pool and submits that
//! single attempt.

use crate::adapters::hasher_for;
use crate::config::RegistrationConfig;
use crate::domain::{
    AttemptHash, RaceState, RegistrationStats, SubmissionReceipt, Winner, WinnerSignal,
    WinningPredicate,
};
use crate::error::{RegistrationError, Result};
use crate::events::{MiningProgress, RegistrationEvent};
use crate::metrics::Metrics;
use crate::ports::{AttemptHasher, RegistrationNotifier, RegistrationWallet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Why a registration request did not start mining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No wallet is open
    NoWallet,
    /// The account is already registered
    AlreadyRegistered,
    /// Another run is in progress
    AlreadyRunning,
}

/// Result of a registration request.
#[derive(Debug, Clone)]
pub enum RegistrationOutcome {
    /// Nothing to mine; no workers were started
    Skipped(SkipReason),
    /// The winning attempt was accepted by the network
    Registered {
        /// Node acknowledgement
        receipt: SubmissionReceipt,
        /// Hash of the submitted attempt
        hash: AttemptHash,
        /// Mining statistics
        stats: RegistrationStats,
    },
}

/// Proof-of-work engine for account registration.
pub struct RegistrationEngine {
    config: RegistrationConfig,
    predicate: WinningPredicate,
    wallet: Arc<dyn RegistrationWallet>,
    hasher: Arc<dyn AttemptHasher>,
    notifier: Arc<dyn RegistrationNotifier>,
    metrics: Arc<Metrics>,
    running: AtomicBool,
}

impl RegistrationEngine {
    /// Create an engine hashing with the configured algorithm.
    pub fn new(
        config: RegistrationConfig,
        wallet: Arc<dyn RegistrationWallet>,
        notifier: Arc<dyn RegistrationNotifier>,
    ) -> Result<Self> {
        let hasher = hasher_for(config.algorithm);
        Self::with_hasher(config, wallet, hasher, notifier)
    }

    /// Create an engine with an explicit hasher.
    pub fn with_hasher(
        config: RegistrationConfig,
        wallet: Arc<dyn RegistrationWallet>,
        hasher: Arc<dyn AttemptHasher>,
        notifier: Arc<dyn RegistrationNotifier>,
    ) -> Result<Self> {
        config.validate()?;

        info!("[qw-02] Initializing Registration Engine");
        info!("  Hash Algorithm: {:?}", config.algorithm);
        info!("  Target: {} leading zero bytes", config.zero_prefix_bytes);
        info!("  Expected Attempts: {}", config.expected_attempts);

        Ok(Self {
            predicate: WinningPredicate::new(config.zero_prefix_bytes),
            config,
            wallet,
            hasher,
            notifier,
            metrics: Arc::new(Metrics::new()),
            running: AtomicBool::new(false),
        })
    }

    /// Cumulative metrics across runs.
    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// True while a run is mining or submitting.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run [`register`](Self::register) on its own task.
    pub fn spawn_register(self: Arc<Self>) -> JoinHandle<Result<RegistrationOutcome>> {
        tokio::spawn(async move { self.register().await })
    }

    /// Mine and submit one registration.
    ///
    /// Returns [`RegistrationOutcome::Skipped`] without starting workers when
    /// there is nothing to mine. Exactly one attempt is submitted per run; a
    /// rejected submission ends the run.
    #[tracing::instrument(skip(self), fields(workers = tracing::field::Empty))]
    pub async fn register(&self) -> Result<RegistrationOutcome> {
        if let Some(reason) = self.precondition() {
            info!("[qw-02] Registration skipped: {:?}", reason);
            self.metrics.record_run_skipped();
            return Ok(RegistrationOutcome::Skipped(reason));
        }
        let Some(_run) = RunGuard::acquire(&self.running) else {
            info!("[qw-02] Registration already in progress");
            self.metrics.record_run_skipped();
            return Ok(RegistrationOutcome::Skipped(SkipReason::AlreadyRunning));
        };

        let workers = self.config.worker_count();
        tracing::Span::current().record("workers", workers);
        self.metrics.record_run_started();

        let (winner, stats) = self.mine(workers).await?;
        let winner = winner.ok_or(RegistrationError::WorkersExited { workers })?;

        info!(
            worker = winner.worker,
            hash = %winner.hash.preview(),
            attempts = stats.attempts,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            hashrate = stats.hashrate as u64,
            "[qw-02] Registration proof-of-work found"
        );

        match self.wallet.submit(&winner.attempt).await {
            Ok(receipt) => {
                self.metrics.record_submission(true);
                info!(tx_id = %receipt.tx_id, "[qw-02] Registration submitted");
                self.notifier.notify(RegistrationEvent::Completed {
                    tx_id: receipt.tx_id.clone(),
                });
                Ok(RegistrationOutcome::Registered {
                    receipt,
                    hash: winner.hash,
                    stats,
                })
            }
            Err(reason) => {
                self.metrics.record_submission(false);
                error!(%reason, "[qw-02] Registration submission failed");
                self.notifier.notify(RegistrationEvent::Failed {
                    error: reason.clone(),
                });
                Err(RegistrationError::SubmissionFailed(reason))
            }
        }
    }

    fn precondition(&self) -> Option<SkipReason> {
        if !self.wallet.is_loaded() {
            Some(SkipReason::NoWallet)
        } else if self.wallet.is_registered() {
            Some(SkipReason::AlreadyRegistered)
        } else {
            None
        }
    }

    /// Run the worker pool until a winner is published or every worker exits.
    ///
    /// If this future is dropped mid-run, the pool's drop stops and joins
    /// the workers before the running flag is released.
    async fn mine(&self, workers: usize) -> Result<(Option<Winner>, RegistrationStats)> {
        let race = Arc::new(RaceState::new(self.config.expected_attempts));
        let mut pool = WorkerPool::new(Arc::clone(&race), workers);
        let (signal, winner_rx) = WinnerSignal::channel();
        let signal = Arc::new(signal);
        let started = Instant::now();

        for id in 0..workers {
            let ctx = WorkerContext {
                id,
                wallet: Arc::clone(&self.wallet),
                hasher: Arc::clone(&self.hasher),
                predicate: self.predicate,
                race: Arc::clone(&race),
                signal: Arc::clone(&signal),
            };
            let spawned = thread::Builder::new()
                .name(format!("qw-miner-{}", id))
                .spawn(move || ctx.run());
            match spawned {
                Ok(handle) => pool.handles.push(handle),
                Err(e) => {
                    pool.shutdown().await;
                    return Err(RegistrationError::WorkerSpawn(e.to_string()));
                }
            }
        }
        // Workers hold the only publishers now; if they all exit the
        // receiver resolves with an error instead of hanging.
        drop(signal);
        debug!("[qw-02] {} mining workers started", workers);

        let reporter = tokio::spawn(report_progress(
            Arc::clone(&race),
            Arc::clone(&self.notifier),
            workers,
            self.config.progress_interval(),
        ));

        let winner = winner_rx.await.ok();

        reporter.abort();
        pool.shutdown().await;
        self.notifier
            .notify(RegistrationEvent::Progress(progress_of(&race, workers)));
        self.notifier.notify(RegistrationEvent::MiningStopped);

        let stats = RegistrationStats::collect(&race, workers, started.elapsed());
        self.metrics
            .record_mining(stats.attempts, stats.elapsed.as_millis() as u64);
        Ok((winner, stats))
    }
}

/// Mining threads of one run.
///
/// Dropping the pool stops the race and joins every thread. Each worker
/// finishes at most one more attempt, so the blocking join is short.
struct WorkerPool {
    race: Arc<RaceState>,
    handles: Vec<thread::JoinHandle<()>>,
}

impl WorkerPool {
    fn new(race: Arc<RaceState>, workers: usize) -> Self {
        Self {
            race,
            handles: Vec::with_capacity(workers),
        }
    }

    /// Stop the race and join the threads off the async runtime.
    async fn shutdown(mut self) {
        self.race.stop();
        join_workers(std::mem::take(&mut self.handles)).await;
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.race.stop();
        if self.handles.is_empty() {
            return;
        }
        let panicked = self
            .handles
            .drain(..)
            .map(|h| h.join())
            .filter(|r| r.is_err())
            .count();
        if panicked > 0 {
            warn!("[qw-02] {} mining workers panicked", panicked);
        }
        info!("[qw-02] Registration run cancelled, workers stopped");
    }
}

/// Everything one mining thread needs.
struct WorkerContext {
    id: usize,
    wallet: Arc<dyn RegistrationWallet>,
    hasher: Arc<dyn AttemptHasher>,
    predicate: WinningPredicate,
    race: Arc<RaceState>,
    signal: Arc<WinnerSignal>,
}

impl WorkerContext {
    /// Draw, hash and test attempts until told to stop or a win is found.
    fn run(self) {
        while !self.race.should_stop() {
            let attempt = self.wallet.new_registration_attempt();
            let hash = self.hasher.hash(attempt.payload());
            self.race.record_hash(&hash);

            if self.predicate.is_winning(&hash) {
                self.race.record_win();
                let first = self.signal.publish(Winner {
                    attempt,
                    hash,
                    worker: self.id,
                });
                self.race.stop();
                if !first {
                    debug!(worker = self.id, "[qw-02] late winner discarded");
                }
                return;
            }
            self.race.record_failure();
        }
    }
}

async fn report_progress(
    race: Arc<RaceState>,
    notifier: Arc<dyn RegistrationNotifier>,
    threads: usize,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    // First tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        if race.should_stop() {
            break;
        }
        let progress = progress_of(&race, threads);
        debug!(
            fails = progress.fail_count,
            remaining = progress.remaining_estimate,
            "[qw-02] mining progress"
        );
        notifier.notify(RegistrationEvent::Progress(progress));
    }
}

fn progress_of(race: &RaceState, threads: usize) -> MiningProgress {
    MiningProgress {
        threads,
        remaining_estimate: race.remaining_estimate(),
        fail_count: race.fail_count(),
        win_count: race.win_count(),
        hash_preview: race.hash_preview(),
    }
}

/// Join mining threads off the async runtime.
async fn join_workers(handles: Vec<thread::JoinHandle<()>>) {
    let joined = tokio::task::spawn_blocking(move || {
        handles
            .into_iter()
            .map(|h| h.join())
            .filter(|r| r.is_err())
            .count()
    })
    .await;

    match joined {
        Ok(0) => {}
        Ok(panicked) => warn!("[qw-02] {} mining workers panicked", panicked),
        Err(e) => warn!("[qw-02] failed to join mining workers: {}", e),
    }
}

/// Clears the running flag when a run ends, however it ends.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
