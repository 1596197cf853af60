//! # Runtime Flows
//!
//! The assembled wallet runtime (HTTP prober, JSON-RPC client, local
//! wallet) against fake nodes.

#[cfg(test)]
mod tests {
    use crate::fake_node::{FakeNode, FAKE_NETWORK_ID};
    use qw_01_connectivity::{CandidateEndpoint, ConnectivityConfig, ConnectivityEvent};
    use qw_02_registration::{
        RegistrationConfig, RegistrationError, RegistrationOutcome, RegistrationWallet, SkipReason,
    };
    use std::time::Duration;
    use wallet_runtime::adapters::WalletEvent;
    use wallet_runtime::{RuntimeError, WalletConfig, WalletRuntime};

    const ACCOUNT: &str = "0xc0ffee";

    fn config(nodes: &[&FakeNode], account: Option<&str>) -> WalletConfig {
        let mut candidates = vec![CandidateEndpoint::new("", "preferred")];
        candidates.extend(
            nodes
                .iter()
                .enumerate()
                .map(|(i, n)| CandidateEndpoint::new(n.address(), format!("node-{}", i))),
        );

        let mut config = WalletConfig::default();
        config.connectivity = ConnectivityConfig::for_testing(candidates);
        config.registration = RegistrationConfig {
            zero_prefix_bytes: 1,
            ..RegistrationConfig::for_testing(2)
        };
        config.wallet.account = account.map(str::to_string);
        config.wallet.rpc_timeout_ms = 1_000;
        config
    }

    #[tokio::test]
    async fn test_connects_and_tracks_height() {
        let node = FakeNode::start(42).await;
        let runtime = WalletRuntime::new(config(&[&node], Some(ACCOUNT))).unwrap();
        let mut events = runtime.subscribe();
        assert!(!runtime.wallet().is_online());

        runtime.supervisor().tick().await.unwrap();

        let snapshot = runtime.snapshot();
        assert!(snapshot.is_online);
        assert!(runtime.wallet().is_online());
        assert_eq!(snapshot.current_endpoint, node.address());
        assert_eq!(snapshot.chain_height, 42);
        assert_eq!(runtime.rpc().network_id().as_deref(), Some(FAKE_NETWORK_ID));
        assert!(matches!(
            events.recv().await.unwrap(),
            WalletEvent::Connectivity(ConnectivityEvent::Online { chain_height: 42, .. })
        ));

        node.set_height(43);
        runtime.supervisor().tick().await.unwrap();
        assert_eq!(runtime.snapshot().chain_height, 43);
        assert!(matches!(
            events.recv().await.unwrap(),
            WalletEvent::Connectivity(ConnectivityEvent::HeightChanged { chain_height: 43, .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_registration_end_to_end() {
        let node = FakeNode::start(1).await;
        let runtime = WalletRuntime::new(config(&[&node], Some(ACCOUNT))).unwrap();
        runtime.supervisor().tick().await.unwrap();

        let RegistrationOutcome::Registered { receipt, hash, .. } = runtime.register().await.unwrap()
        else {
            panic!("expected a registration");
        };

        let received = node.registrations();
        assert_eq!(received.len(), 1);
        // "QWREG1" tag followed by the account key
        assert!(received[0].starts_with("0x515752454731c0ffee"));
        assert!(receipt.tx_id.starts_with("0x"));
        assert!(received[0].ends_with(&receipt.tx_id[2..]));
        assert_eq!(hash.as_bytes()[0], 0);
        assert!(runtime.wallet().is_registered());

        let again = runtime.register().await.unwrap();
        assert!(matches!(
            again,
            RegistrationOutcome::Skipped(SkipReason::AlreadyRegistered)
        ));
        assert_eq!(node.registrations().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_registration_rejected_by_node() {
        let node = FakeNode::start(1).await;
        node.reject_registrations(true);
        let runtime = WalletRuntime::new(config(&[&node], Some(ACCOUNT))).unwrap();
        runtime.supervisor().tick().await.unwrap();

        let err = runtime.register().await.unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Registration(RegistrationError::SubmissionFailed(ref reason))
                if reason.contains("registration rejected")
        ));
        assert_eq!(node.registrations().len(), 1);
        assert!(!runtime.wallet().is_registered());
    }

    #[tokio::test]
    async fn test_rpc_follows_failover() {
        let primary = FakeNode::start(5).await;
        let backup = FakeNode::start(5).await;
        backup.set_delay(Duration::from_millis(40));
        let runtime = WalletRuntime::new(config(&[&primary, &backup], None)).unwrap();

        runtime.supervisor().tick().await.unwrap();
        assert_eq!(runtime.snapshot().current_endpoint, primary.address());

        primary.set_foreign(true);
        runtime.supervisor().tick().await.unwrap();
        assert_eq!(runtime.snapshot().current_endpoint, backup.address());

        let before = primary.rpc_calls().len();
        let height: String = runtime
            .rpc()
            .call("eth_blockNumber", Vec::<()>::new())
            .await
            .unwrap();
        assert_eq!(height, "0x5");
        assert_eq!(primary.rpc_calls().len(), before);
        assert!(backup.rpc_calls().contains(&"net_version".to_string()));
    }

    #[tokio::test]
    async fn test_background_loop_comes_online() {
        let node = FakeNode::start(9).await;
        let runtime = WalletRuntime::new(config(&[&node], None)).unwrap();
        runtime.start();

        let online = tokio::time::timeout(Duration::from_secs(5), async {
            while !runtime.snapshot().is_online {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(online.is_ok());

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_manual_endpoint_through_runtime() {
        let node = FakeNode::start(3).await;
        let runtime = WalletRuntime::new(config(&[], None)).unwrap();

        runtime.set_endpoint(node.address()).await.unwrap();
        assert_eq!(runtime.snapshot().current_endpoint, node.address());
        assert!(runtime.snapshot().is_online);
    }
}
