//! Hexagonal ports for connectivity supervision

pub mod outbound;

pub use outbound::{
    ChainHeightReader, ConnectivityNotifier, EndpointProber, NodeConnection, WalletModeControl,
};
