//! # Registration Flows
//!
//! Registration engine runs with stub wallets and both deterministic and
//! real hashers, checking the single-submission guarantee end to end.

#[cfg(test)]
mod tests {
    use qw_02_registration::adapters::mocks::{NthCallHasher, RecordingNotifier, StubWallet};
    use qw_02_registration::utils::sha256d;
    use qw_02_registration::{
        HashAlgorithm, RegistrationConfig, RegistrationEngine, RegistrationError,
        RegistrationEvent, RegistrationOutcome,
    };
    use std::sync::Arc;
    use std::time::Duration;

    fn first_byte_config(workers: usize) -> RegistrationConfig {
        RegistrationConfig {
            zero_prefix_bytes: 1,
            ..RegistrationConfig::for_testing(workers)
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_four_workers_one_injected_win() {
        let wallet = Arc::new(StubWallet::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let hasher = Arc::new(NthCallHasher::new(137));
        let engine = RegistrationEngine::with_hasher(
            first_byte_config(4),
            wallet.clone(),
            hasher.clone(),
            notifier.clone(),
        )
        .unwrap();

        let RegistrationOutcome::Registered { stats, .. } = engine.register().await.unwrap() else {
            panic!("expected a registration");
        };

        assert_eq!(stats.workers, 4);
        assert_eq!(stats.wins, 1);
        assert_eq!(wallet.submissions().len(), 1);
        assert_eq!(
            Some(wallet.submissions()[0].payload().to_vec()),
            hasher.winning_payload()
        );

        // Workers are joined before register() returns
        let calls = hasher.calls();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(hasher.calls(), calls);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_real_double_sha256_first_byte_target() {
        let wallet = Arc::new(StubWallet::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let config = RegistrationConfig {
            algorithm: HashAlgorithm::Sha256d,
            ..first_byte_config(4)
        };
        let engine = RegistrationEngine::new(config, wallet.clone(), notifier.clone()).unwrap();

        let RegistrationOutcome::Registered { hash, receipt, .. } =
            engine.register().await.unwrap()
        else {
            panic!("expected a registration");
        };

        let submitted = wallet.submissions();
        assert_eq!(submitted.len(), 1);
        assert_eq!(hash.as_bytes(), &sha256d(submitted[0].payload()));
        assert_eq!(hash.as_bytes()[0], 0);
        assert!(matches!(
            notifier.events().last(),
            Some(RegistrationEvent::Completed { tx_id }) if *tx_id == receipt.tx_id
        ));
    }

    #[tokio::test]
    async fn test_rejected_run_is_not_resubmitted() {
        let wallet = Arc::new(StubWallet::new());
        wallet.reject_submissions("stale proof");
        let notifier = Arc::new(RecordingNotifier::new());
        let engine = RegistrationEngine::with_hasher(
            first_byte_config(2),
            wallet.clone(),
            Arc::new(NthCallHasher::new(5)),
            notifier.clone(),
        )
        .unwrap();

        let err = engine.register().await.unwrap_err();
        assert!(matches!(err, RegistrationError::SubmissionFailed(ref r) if r == "stale proof"));
        assert_eq!(wallet.submissions().len(), 1);

        let events = notifier.events();
        let stopped = events
            .iter()
            .position(|e| *e == RegistrationEvent::MiningStopped)
            .unwrap();
        assert!(matches!(
            events[stopped + 1],
            RegistrationEvent::Failed { ref error } if error == "stale proof"
        ));
        assert_eq!(engine.metrics().get_registrations_submitted(), 0);
        assert!(!engine.is_running());
    }

    #[tokio::test]
    async fn test_retrigger_mines_a_fresh_attempt() {
        let wallet = Arc::new(StubWallet::new());
        wallet.reject_submissions("busy");
        let notifier = Arc::new(RecordingNotifier::new());
        let engine = RegistrationEngine::new(first_byte_config(2), wallet.clone(), notifier)
            .unwrap();

        assert!(engine.register().await.is_err());
        assert!(engine.register().await.is_err());

        let submitted = wallet.submissions();
        assert_eq!(submitted.len(), 2);
        assert_ne!(submitted[0], submitted[1]);
        assert_eq!(engine.metrics().get_runs_started(), 2);
    }
}
