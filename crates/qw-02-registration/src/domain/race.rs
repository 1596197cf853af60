//! Per-run shared state between mining workers and the coordinator.

use super::attempt::{AttemptHash, RegistrationAttempt};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;

/// Counters and the cooperative stop flag of one registration run.
///
/// Workers only touch atomics; nothing here is locked on the hot path.
#[derive(Debug)]
pub struct RaceState {
    stop: AtomicBool,
    win_count: AtomicU64,
    fail_count: AtomicU64,
    remaining: AtomicI64,
    /// First 8 bytes of the most recent hash, big-endian
    last_hash_head: AtomicU64,
}

impl RaceState {
    /// Fresh state with the remaining-attempts estimate set to `expected_attempts`.
    pub fn new(expected_attempts: i64) -> Self {
        Self {
            stop: AtomicBool::new(false),
            win_count: AtomicU64::new(0),
            fail_count: AtomicU64::new(0),
            remaining: AtomicI64::new(expected_attempts),
            last_hash_head: AtomicU64::new(0),
        }
    }

    /// Ask every worker to exit at its next check.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Checked by workers once per attempt.
    #[inline]
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// A hash was computed; keep its head for the progress preview.
    #[inline]
    pub fn record_hash(&self, hash: &AttemptHash) {
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.0[..8]);
        self.last_hash_head
            .store(u64::from_be_bytes(head), Ordering::Relaxed);
    }

    /// A losing attempt. The estimate may go negative.
    #[inline]
    pub fn record_failure(&self) {
        self.fail_count.fetch_add(1, Ordering::Relaxed);
        self.remaining.fetch_sub(1, Ordering::Relaxed);
    }

    /// A winning attempt.
    pub fn record_win(&self) {
        self.win_count.fetch_add(1, Ordering::SeqCst);
    }

    /// Winning hashes found so far.
    pub fn win_count(&self) -> u64 {
        self.win_count.load(Ordering::SeqCst)
    }

    /// Losing hashes so far.
    pub fn fail_count(&self) -> u64 {
        self.fail_count.load(Ordering::Relaxed)
    }

    /// Advisory estimate of attempts still needed.
    pub fn remaining_estimate(&self) -> i64 {
        self.remaining.load(Ordering::Relaxed)
    }

    /// Hex of the first 8 bytes of the latest hash.
    pub fn hash_preview(&self) -> String {
        hex::encode(self.last_hash_head.load(Ordering::Relaxed).to_be_bytes())
    }
}

/// A winning attempt together with the hash that made it win.
#[derive(Debug, Clone)]
pub struct Winner {
    /// The attempt to submit
    pub attempt: RegistrationAttempt,
    /// Its content hash
    pub hash: AttemptHash,
    /// Index of the worker that found it
    pub worker: usize,
}

/// Single-result signal: the first publish wins, later ones are dropped.
///
/// Publishing never blocks, whether or not the consumer is already waiting.
/// The consumer's receiver resolves with an error once every publisher is
/// gone without a winner.
#[derive(Debug)]
pub struct WinnerSignal {
    sender: Mutex<Option<oneshot::Sender<Winner>>>,
}

impl WinnerSignal {
    /// Create the signal and its only receiver.
    pub fn channel() -> (Self, oneshot::Receiver<Winner>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                sender: Mutex::new(Some(tx)),
            },
            rx,
        )
    }

    /// Publish `winner`. Returns true only for the first caller.
    pub fn publish(&self, winner: Winner) -> bool {
        let Some(sender) = self.sender.lock().take() else {
            return false;
        };
        // A dropped receiver still counts as published: the slot is consumed.
        let _ = sender.send(winner);
        true
    }

    /// True once something has been published.
    pub fn is_taken(&self) -> bool {
        self.sender.lock().is_none()
    }
}

/// Summary of one mining run.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationStats {
    /// Workers that took part
    pub workers: usize,
    /// Hashes computed (wins plus failures)
    pub attempts: u64,
    /// Winning hashes found
    pub wins: u64,
    /// Wall-clock mining time
    pub elapsed: Duration,
    /// Attempts per second
    pub hashrate: f64,
}

impl RegistrationStats {
    /// Snapshot the counters of `race`.
    pub fn collect(race: &RaceState, workers: usize, elapsed: Duration) -> Self {
        let wins = race.win_count();
        let attempts = race.fail_count() + wins;
        let secs = elapsed.as_secs_f64();
        let hashrate = if secs > 0.0 {
            attempts as f64 / secs
        } else {
            0.0
        };
        Self {
            workers,
            attempts,
            wins,
            elapsed,
            hashrate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn winner(worker: usize) -> Winner {
        Winner {
            attempt: RegistrationAttempt::new(vec![worker as u8]),
            hash: AttemptHash([0u8; 32]),
            worker,
        }
    }

    #[test]
    fn test_first_publish_wins() {
        let (signal, mut rx) = WinnerSignal::channel();
        assert!(!signal.is_taken());
        assert!(signal.publish(winner(3)));
        assert!(!signal.publish(winner(5)));
        assert!(signal.is_taken());

        let received = rx.try_recv().unwrap();
        assert_eq!(received.worker, 3);
    }

    #[test]
    fn test_publish_without_listener_does_not_block() {
        let (signal, rx) = WinnerSignal::channel();
        drop(rx);
        assert!(signal.publish(winner(0)));
    }

    #[test]
    fn test_receiver_errors_when_signal_dropped() {
        let (signal, mut rx) = WinnerSignal::channel();
        drop(signal);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_remaining_estimate_may_go_negative() {
        let race = RaceState::new(2);
        for _ in 0..5 {
            race.record_failure();
        }
        assert_eq!(race.remaining_estimate(), -3);
        assert_eq!(race.fail_count(), 5);
    }

    #[test]
    fn test_hash_preview_tracks_latest() {
        let race = RaceState::new(10);
        assert_eq!(race.hash_preview(), "0000000000000000");
        let mut bytes = [0u8; 32];
        bytes[0] = 0xde;
        bytes[1] = 0xad;
        race.record_hash(&AttemptHash(bytes));
        assert_eq!(race.hash_preview(), "dead000000000000");
    }

    #[test]
    fn test_stats_hashrate() {
        let race = RaceState::new(10);
        for _ in 0..99 {
            race.record_failure();
        }
        race.record_win();
        let stats = RegistrationStats::collect(&race, 4, Duration::from_secs(2));
        assert_eq!(stats.attempts, 100);
        assert_eq!(stats.wins, 1);
        assert!((stats.hashrate - 50.0).abs() < f64::EPSILON);

        let instant = RegistrationStats::collect(&race, 4, Duration::ZERO);
        assert_eq!(instant.hashrate, 0.0);
    }
}
