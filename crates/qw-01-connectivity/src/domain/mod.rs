//! # Domain Layer
//!
//! Pure connectivity logic: candidate endpoints, the shared endpoint cell,
//! race selection and the supervisor state machine. No I/O.

pub mod endpoint;
pub mod race;
pub mod state;

pub use endpoint::{is_host_port, CandidateEndpoint, EndpointCell};
pub use race::{raceable, select_fastest, ProbeFailure, ProbeOutcome, RaceBoard};
pub use state::{
    ConnectivitySnapshot, ConnectivityState, RaceFailureEffects, SupervisorPhase,
};
