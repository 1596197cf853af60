//! # Connectivity Flows
//!
//! Supervisor + real HTTP prober against fake nodes on local sockets.
//! Height reads, reconnects and wallet mode are mocked so each test can
//! assert on them.

#[cfg(test)]
mod tests {
    use crate::fake_node::{closed_address, FakeNode};
    use qw_01_connectivity::adapters::mocks::{
        MockHeightReader, MockNodeConnection, MockWalletMode, RecordingNotifier,
    };
    use qw_01_connectivity::{
        CandidateEndpoint, ConnectivityConfig, ConnectivityError, ConnectivityEvent,
        ConnectivitySupervisor, HttpEndpointProber, SupervisorPorts, DEFAULT_NETWORK_MARKER,
    };
    use std::sync::Arc;
    use std::time::Duration;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    struct Fixture {
        connection: Arc<MockNodeConnection>,
        wallet: Arc<MockWalletMode>,
        notifier: Arc<RecordingNotifier>,
        supervisor: ConnectivitySupervisor,
    }

    fn fixture(candidates: Vec<CandidateEndpoint>, authenticated: bool) -> Fixture {
        let config = ConnectivityConfig::for_testing(candidates);
        let prober =
            HttpEndpointProber::new(config.probe_timeout(), DEFAULT_NETWORK_MARKER).unwrap();
        let connection = Arc::new(MockNodeConnection::new());
        let wallet = Arc::new(MockWalletMode::new(authenticated));
        let notifier = Arc::new(RecordingNotifier::new());

        let ports = SupervisorPorts {
            prober: Arc::new(prober),
            heights: Arc::new(MockHeightReader::new(1)),
            connection: connection.clone(),
            wallet: wallet.clone(),
            notifier: notifier.clone(),
        };
        Fixture {
            connection,
            wallet,
            notifier,
            supervisor: ConnectivitySupervisor::new(config, ports).unwrap(),
        }
    }

    fn preferred() -> CandidateEndpoint {
        CandidateEndpoint::new("", "preferred")
    }

    // =========================================================================
    // RACE
    // =========================================================================

    #[tokio::test]
    async fn test_only_live_node_is_committed() {
        let node = FakeNode::start(10).await;
        let dead = closed_address().await;
        let f = fixture(
            vec![
                preferred(),
                CandidateEndpoint::new(dead.as_str(), "dead"),
                CandidateEndpoint::new(node.address(), "live"),
            ],
            false,
        );

        f.supervisor.tick().await.unwrap();

        assert_eq!(f.supervisor.cell().get(), node.address());
        assert!(f.supervisor.snapshot().is_online);
        assert_eq!(f.connection.reconnects(), vec![node.address().to_string()]);
    }

    #[tokio::test]
    async fn test_foreign_server_never_committed() {
        let impostor = FakeNode::start(10).await;
        impostor.set_foreign(true);
        let f = fixture(
            vec![preferred(), CandidateEndpoint::new(impostor.address(), "impostor")],
            false,
        );

        let err = f.supervisor.tick().await.unwrap_err();
        assert!(matches!(
            err,
            ConnectivityError::NoReachableEndpoint { candidates: 1 }
        ));
        assert!(f.supervisor.cell().is_empty());
        assert!(f.connection.reconnects().is_empty());
    }

    #[tokio::test]
    async fn test_fast_node_beats_slow_node() {
        let slow = FakeNode::start(10).await;
        slow.set_delay(Duration::from_millis(150));
        let fast = FakeNode::start(10).await;
        let f = fixture(
            vec![
                preferred(),
                CandidateEndpoint::new(slow.address(), "slow"),
                CandidateEndpoint::new(fast.address(), "fast"),
            ],
            false,
        );

        f.supervisor.tick().await.unwrap();
        assert_eq!(f.supervisor.cell().get(), fast.address());
    }

    // =========================================================================
    // FAILOVER
    // =========================================================================

    #[tokio::test]
    async fn test_failover_when_current_node_dies() {
        let primary = FakeNode::start(10).await;
        let backup = FakeNode::start(10).await;
        backup.set_delay(Duration::from_millis(40));
        let f = fixture(
            vec![
                CandidateEndpoint::new(primary.address(), "primary"),
                CandidateEndpoint::new(backup.address(), "backup"),
            ],
            true,
        );

        // Preferred slot is the initial endpoint; first tick health-checks it
        f.supervisor.tick().await.unwrap();
        assert_eq!(f.supervisor.cell().get(), primary.address());

        primary.set_foreign(true);
        f.supervisor.tick().await.unwrap();

        assert_eq!(f.supervisor.cell().get(), backup.address());
        let events = f.notifier.events();
        assert!(events.iter().any(|e| matches!(
            e,
            ConnectivityEvent::Degraded { endpoint, .. } if endpoint == primary.address()
        )));
        assert!(matches!(
            events.last(),
            Some(ConnectivityEvent::Online { endpoint, .. }) if endpoint == backup.address()
        ));
        // A successful race is not a disconnect episode
        assert_eq!(f.notifier.warning_count(), 0);
    }

    #[tokio::test]
    async fn test_warning_once_per_outage() {
        let node = FakeNode::start(10).await;
        let f = fixture(
            vec![preferred(), CandidateEndpoint::new(node.address(), "only")],
            true,
        );
        f.supervisor.tick().await.unwrap();

        node.set_foreign(true);
        for _ in 0..3 {
            assert!(f.supervisor.tick().await.is_err());
        }
        assert_eq!(f.notifier.warning_count(), 1);
        assert_eq!(f.wallet.offline_calls(), 1);
        assert_eq!(f.supervisor.snapshot().consecutive_failures, 3);

        node.set_foreign(false);
        f.supervisor.tick().await.unwrap();
        assert_eq!(f.supervisor.snapshot().consecutive_failures, 0);
        assert!(f.supervisor.snapshot().is_online);

        // Second outage, second warning
        node.set_foreign(true);
        assert!(f.supervisor.tick().await.is_err());
        assert!(f.supervisor.tick().await.is_err());
        assert_eq!(f.notifier.warning_count(), 2);
    }

    // =========================================================================
    // MANUAL OVERRIDE
    // =========================================================================

    #[tokio::test]
    async fn test_manual_endpoint_probe_gate() {
        let current = FakeNode::start(10).await;
        let custom = FakeNode::start(10).await;
        let dead = closed_address().await;
        let f = fixture(
            vec![preferred(), CandidateEndpoint::new(current.address(), "current")],
            false,
        );
        f.supervisor.tick().await.unwrap();

        let err = f.supervisor.set_custom_endpoint(&dead).await.unwrap_err();
        assert!(matches!(err, ConnectivityError::EndpointRejected { .. }));
        assert_eq!(f.supervisor.cell().get(), current.address());

        f.supervisor
            .set_custom_endpoint(custom.address())
            .await
            .unwrap();
        assert_eq!(f.supervisor.cell().get(), custom.address());
        assert_eq!(f.supervisor.candidates()[0].address, custom.address());
    }
}
