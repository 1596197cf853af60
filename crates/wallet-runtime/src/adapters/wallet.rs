//! Local wallet collaborator.
//!
//! Holds the account key and the online/offline mode, builds registration
//! attempts and submits the winning one through the node client. Key
//! management and transaction serialization belong to the ledger library;
//! the attempt layout here is the minimal envelope the node accepts.

use super::node_rpc::NodeRpcClient;
use async_trait::async_trait;
use qw_01_connectivity::WalletModeControl;
use qw_02_registration::{RegistrationAttempt, RegistrationWallet, SubmissionReceipt};
use rand::RngCore;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Attempt envelope tag
const ATTEMPT_TAG: &[u8] = b"QWREG1";

/// Wallet state shared by both subsystems.
pub struct LocalWallet {
    account: Option<Vec<u8>>,
    registered: AtomicBool,
    online: AtomicBool,
    attempts_issued: AtomicU64,
    rpc: Arc<NodeRpcClient>,
    register_method: String,
}

impl LocalWallet {
    /// Wallet for `account` (None = no wallet loaded).
    pub fn new(
        account: Option<Vec<u8>>,
        registered: bool,
        rpc: Arc<NodeRpcClient>,
        register_method: impl Into<String>,
    ) -> Self {
        Self {
            account,
            registered: AtomicBool::new(registered),
            // Offline until the supervisor commits a live endpoint
            online: AtomicBool::new(false),
            attempts_issued: AtomicU64::new(0),
            rpc,
            register_method: register_method.into(),
        }
    }

    /// True once the supervisor has brought the wallet online.
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Registration attempts built so far.
    pub fn attempts_issued(&self) -> u64 {
        self.attempts_issued.load(Ordering::Relaxed)
    }

    /// Account key as hex, if loaded.
    pub fn account_hex(&self) -> Option<String> {
        self.account.as_ref().map(hex::encode)
    }
}

impl WalletModeControl for LocalWallet {
    fn is_authenticated(&self) -> bool {
        self.account.is_some()
    }

    fn set_online_mode(&self) {
        if !self.online.swap(true, Ordering::SeqCst) {
            info!("Wallet in online mode");
        }
    }

    fn set_offline_mode(&self) {
        if self.online.swap(false, Ordering::SeqCst) {
            info!("Wallet switched to offline mode");
        }
    }
}

#[async_trait]
impl RegistrationWallet for LocalWallet {
    fn is_loaded(&self) -> bool {
        self.account.is_some()
    }

    fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    /// `tag || account || timestamp_ms (be) || 16 random bytes`
    fn new_registration_attempt(&self) -> RegistrationAttempt {
        self.attempts_issued.fetch_add(1, Ordering::Relaxed);
        let account = self.account.as_deref().unwrap_or_default();
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let mut nonce = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut nonce);

        let mut payload = Vec::with_capacity(ATTEMPT_TAG.len() + account.len() + 8 + nonce.len());
        payload.extend_from_slice(ATTEMPT_TAG);
        payload.extend_from_slice(account);
        payload.extend_from_slice(&timestamp_ms.to_be_bytes());
        payload.extend_from_slice(&nonce);
        RegistrationAttempt::new(payload)
    }

    async fn submit(&self, attempt: &RegistrationAttempt) -> Result<SubmissionReceipt, String> {
        let raw = format!("0x{}", hex::encode(attempt.payload()));
        let tx_id: String = self
            .rpc
            .call(&self.register_method, [raw])
            .await
            .map_err(|e| e.to_string())?;

        self.registered.store(true, Ordering::SeqCst);
        Ok(SubmissionReceipt { tx_id })
    }
}
