//! Connectivity state machine.
//!
//! ```text
//!            probe ok                 probe fails
//!   ┌──────────┐ ───────────────┐  ┌────────────┐
//!   │ HEALTHY  │ ◄──────────────┘  │            ▼
//!   └──────────┘                   │      ┌──────────┐
//!        ▲          reconnect ok   │      │ DEGRADED │ ◄─┐
//!        │                         │      └──────────┘   │ no candidate alive,
//!        │                  ┌──────┴──┐        │         │ or reconnect failed
//!        └───────────────── │ RACING  │ ◄──────┘         │
//!                           └─────────┘ ─────────────────┘
//! ```
//!
//! Pure logic only. The supervisor drives the transitions and performs the
//! I/O around them.

use serde::Serialize;

/// Supervisor phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SupervisorPhase {
    /// Current endpoint answers its health probe
    Healthy,
    /// Current endpoint failed and no replacement is committed
    Degraded,
    /// A latency race across all candidates is in flight
    Racing,
}

/// What the supervisor must do after a race found no live candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceFailureEffects {
    /// Raise the one-time "connection degraded" warning
    pub raise_warning: bool,
    /// Force the wallet into offline mode
    pub force_offline: bool,
}

/// Mutable connectivity state owned by the supervisor.
#[derive(Debug, Clone)]
pub struct ConnectivityState {
    /// Address currently considered active (empty until the first commit)
    pub current_endpoint: String,
    /// Failed connection attempts since the last success
    pub consecutive_failures: u32,
    /// Whether the latest attempt against `current_endpoint` succeeded
    pub is_online: bool,
    /// Current phase
    pub phase: SupervisorPhase,
    /// Highest chain height reported so far
    pub chain_height: u64,
}

impl ConnectivityState {
    /// Initial state. `preferred` may be empty.
    pub fn new(preferred: impl Into<String>) -> Self {
        Self {
            current_endpoint: preferred.into(),
            consecutive_failures: 0,
            is_online: false,
            phase: SupervisorPhase::Degraded,
            chain_height: 0,
        }
    }

    /// The current endpoint answered its health probe.
    ///
    /// Returns true when this ends an offline period.
    pub fn on_health_ok(&mut self) -> bool {
        let recovered = !self.is_online;
        self.is_online = true;
        self.consecutive_failures = 0;
        self.phase = SupervisorPhase::Healthy;
        recovered
    }

    /// The current endpoint failed its health probe (or none is set).
    ///
    /// Returns true when this starts an offline period.
    pub fn on_health_failed(&mut self) -> bool {
        let dropped = self.is_online;
        self.is_online = false;
        self.phase = SupervisorPhase::Degraded;
        dropped
    }

    /// Entering the race.
    pub fn on_race_started(&mut self) {
        self.phase = SupervisorPhase::Racing;
    }

    /// No candidate answered.
    ///
    /// The warning is edge-triggered: it fires on the first failure of a
    /// streak and not again until a success resets the counter.
    pub fn on_race_failed(&mut self, authenticated: bool) -> RaceFailureEffects {
        self.is_online = false;
        self.phase = SupervisorPhase::Degraded;
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);

        let first_of_streak = self.consecutive_failures == 1;
        RaceFailureEffects {
            raise_warning: first_of_streak,
            force_offline: first_of_streak && authenticated,
        }
    }

    /// A candidate won the race and becomes the current endpoint.
    pub fn on_race_committed(&mut self, address: &str) {
        self.current_endpoint = address.to_string();
        self.consecutive_failures = 0;
        self.is_online = true;
    }

    /// Outcome of reconnecting the primary connection to the committed endpoint.
    pub fn on_reconnect(&mut self, ok: bool) {
        if ok {
            self.phase = SupervisorPhase::Healthy;
        } else {
            self.is_online = false;
            self.phase = SupervisorPhase::Degraded;
        }
    }

    /// Record a height reading. Returns true only if the height increased.
    pub fn observe_height(&mut self, height: u64) -> bool {
        if height > self.chain_height {
            self.chain_height = height;
            true
        } else {
            false
        }
    }
}

/// Read-only copy of the connectivity state for UI polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectivitySnapshot {
    /// Active endpoint (may be empty before the first commit)
    pub current_endpoint: String,
    /// Failed attempts since the last success
    pub consecutive_failures: u32,
    /// Online flag
    pub is_online: bool,
    /// Current phase
    pub phase: SupervisorPhase,
    /// Highest chain height seen
    pub chain_height: u64,
}

impl From<&ConnectivityState> for ConnectivitySnapshot {
    fn from(state: &ConnectivityState) -> Self {
        Self {
            current_endpoint: state.current_endpoint.clone(),
            consecutive_failures: state.consecutive_failures,
            is_online: state.is_online,
            phase: state.phase,
            chain_height: state.chain_height,
        }
    }
}
