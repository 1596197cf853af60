//! Metrics collection for the registration engine

use std::sync::atomic::{AtomicU64, Ordering};

/// Cumulative counters across registration runs
#[derive(Debug, Default)]
pub struct Metrics {
    /// Runs that started workers
    pub runs_started: AtomicU64,

    /// Requests refused by the guard
    pub runs_skipped: AtomicU64,

    /// Hashes computed across all runs
    pub attempts_hashed: AtomicU64,

    /// Registrations accepted by the node
    pub registrations_submitted: AtomicU64,

    /// Winning attempts rejected on submission
    pub submission_failures: AtomicU64,

    /// Total mining time (milliseconds)
    pub mining_time_ms: AtomicU64,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a run that started workers
    pub fn record_run_started(&self) {
        self.runs_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a refused run
    pub fn record_run_skipped(&self) {
        self.runs_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the mining phase of a finished run
    pub fn record_mining(&self, attempts: u64, duration_ms: u64) {
        self.attempts_hashed.fetch_add(attempts, Ordering::Relaxed);
        self.mining_time_ms.fetch_add(duration_ms, Ordering::Relaxed);
    }

    /// Record a submission result
    pub fn record_submission(&self, accepted: bool) {
        if accepted {
            self.registrations_submitted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.submission_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get runs started
    pub fn get_runs_started(&self) -> u64 {
        self.runs_started.load(Ordering::Relaxed)
    }

    /// Get accepted registrations
    pub fn get_registrations_submitted(&self) -> u64 {
        self.registrations_submitted.load(Ordering::Relaxed)
    }

    /// Get average hashrate over all mining time (attempts per second)
    pub fn get_avg_hashrate(&self) -> f64 {
        let ms = self.mining_time_ms.load(Ordering::Relaxed);
        if ms == 0 {
            return 0.0;
        }
        self.attempts_hashed.load(Ordering::Relaxed) as f64 * 1000.0 / ms as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = Metrics::new();
        metrics.record_run_started();
        metrics.record_mining(5_000, 2_000);
        metrics.record_submission(true);
        metrics.record_submission(false);

        assert_eq!(metrics.get_runs_started(), 1);
        assert_eq!(metrics.get_registrations_submitted(), 1);
        assert_eq!(metrics.submission_failures.load(Ordering::Relaxed), 1);
        assert!((metrics.get_avg_hashrate() - 2_500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hashrate_without_mining() {
        assert_eq!(Metrics::new().get_avg_hashrate(), 0.0);
    }
}
