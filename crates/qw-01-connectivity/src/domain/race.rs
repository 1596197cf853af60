//! Probe outcomes and latency race selection.

use super::endpoint::CandidateEndpoint;
use std::fmt;
use std::time::Duration;

/// Why a probe reported the node as not alive.
///
/// Logged for diagnostics only; every variant is handled the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// Connection refused or could not be established
    Refused,
    /// No response within the probe timeout
    Timeout,
    /// A server answered but the body lacks the network marker
    MarkerMissing,
    /// Address is not a usable `host:port`
    InvalidAddress,
    /// Any other transport or HTTP-level error
    Http(String),
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refused => write!(f, "connection refused"),
            Self::Timeout => write!(f, "probe timed out"),
            Self::MarkerMissing => write!(f, "response is missing the network marker"),
            Self::InvalidAddress => write!(f, "invalid address"),
            Self::Http(reason) => write!(f, "http error: {}", reason),
        }
    }
}

/// Result of one bounded-time liveness probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Address that was probed
    pub address: String,
    /// Wall-clock time from just before the request to the response or timeout
    pub elapsed: Duration,
    /// `None` when the node is alive
    pub failure: Option<ProbeFailure>,
}

impl ProbeOutcome {
    /// A successful probe.
    pub fn alive(address: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            address: address.into(),
            elapsed,
            failure: None,
        }
    }

    /// A failed probe.
    pub fn dead(address: impl Into<String>, elapsed: Duration, failure: ProbeFailure) -> Self {
        Self {
            address: address.into(),
            elapsed,
            failure: Some(failure),
        }
    }

    /// True when the node answered in time with the network marker.
    pub fn is_alive(&self) -> bool {
        self.failure.is_none()
    }
}

/// Accumulates probe outcomes by candidate position during a race.
///
/// Probe tasks finish in any order; slots keep list order so that
/// selection after the barrier is deterministic.
#[derive(Debug)]
pub struct RaceBoard {
    slots: Vec<Option<ProbeOutcome>>,
}

impl RaceBoard {
    /// Board with one empty slot per candidate.
    pub fn new(candidates: usize) -> Self {
        Self {
            slots: vec![None; candidates],
        }
    }

    /// Record the outcome for the candidate at `index`.
    pub fn record(&mut self, index: usize, outcome: ProbeOutcome) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(outcome);
        }
    }

    /// Outcomes in candidate order, skipping candidates that were not probed.
    pub fn outcomes(&self) -> impl Iterator<Item = &ProbeOutcome> {
        self.slots.iter().flatten()
    }

    /// Fastest alive candidate. See [`select_fastest`].
    pub fn winner(&self) -> Option<&ProbeOutcome> {
        select_fastest(self.outcomes())
    }
}

/// Pick the alive outcome with the strictly smallest elapsed time.
///
/// Ties keep the earliest outcome in iteration order, because the champion
/// is only replaced on a strict `<`.
pub fn select_fastest<'a, I>(outcomes: I) -> Option<&'a ProbeOutcome>
where
    I: IntoIterator<Item = &'a ProbeOutcome>,
{
    let mut champion: Option<&ProbeOutcome> = None;
    for outcome in outcomes.into_iter().filter(|o| o.is_alive()) {
        match champion {
            Some(current) if outcome.elapsed >= current.elapsed => {}
            _ => champion = Some(outcome),
        }
    }
    champion
}

/// Candidates that take part in a race: every configured slot with an address.
pub fn raceable(candidates: &[CandidateEndpoint]) -> Vec<CandidateEndpoint> {
    candidates
        .iter()
        .filter(|c| !c.is_unconfigured())
        .cloned()
        .collect()
}
