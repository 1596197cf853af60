//! # Adapters Layer
//!
//! Concrete implementations of the outbound ports.

#[cfg(feature = "http")]
pub mod http_prober;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

#[cfg(feature = "http")]
pub use http_prober::HttpEndpointProber;
