//! Concrete adapters binding the subsystems to a live node.

mod node_rpc;
mod notifier;
mod wallet;

pub use node_rpc::{parse_hex_u64, NodeRpcClient};
pub use notifier::{TracingNotifier, WalletEvent};
pub use wallet::LocalWallet;
