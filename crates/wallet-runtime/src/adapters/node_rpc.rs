//! JSON-RPC client for the active node.
//!
//! Every call resolves the node address from the shared [`EndpointCell`],
//! so requests follow the connectivity supervisor across failovers. Two
//! consecutive calls may reach different nodes.

use crate::error::{Result as RuntimeResult, RpcError, RuntimeError};
use async_trait::async_trait;
use parking_lot::RwLock;
use qw_01_connectivity::{ChainHeightReader, EndpointCell, NodeConnection};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// JSON-RPC request structure.
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, T: Serialize> {
    jsonrpc: &'static str,
    method: &'a str,
    params: T,
    id: u64,
}

/// JSON-RPC response structure.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Node client bound to the active endpoint.
pub struct NodeRpcClient {
    http_client: reqwest::Client,
    cell: EndpointCell,
    request_id: AtomicU64,
    /// `net_version` of the node the primary connection points at
    network_id: RwLock<Option<String>>,
}

impl NodeRpcClient {
    /// Create a client reading its target from `cell`.
    pub fn new(cell: EndpointCell, timeout: Duration) -> RuntimeResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RuntimeError::HttpClient(e.to_string()))?;

        Ok(Self {
            http_client,
            cell,
            request_id: AtomicU64::new(1),
            network_id: RwLock::new(None),
        })
    }

    /// Network id reported by the last successful reconnect.
    pub fn network_id(&self) -> Option<String> {
        self.network_id.read().clone()
    }

    /// Call `method` on the active endpoint.
    pub async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, RpcError> {
        let address = self.cell.get();
        if address.is_empty() {
            return Err(RpcError::NoEndpoint);
        }
        self.call_at(&address, method, params).await
    }

    /// Call `method` on a specific node.
    pub async fn call_at<P: Serialize, R: DeserializeOwned>(
        &self,
        address: &str,
        method: &str,
        params: P,
    ) -> Result<R, RpcError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        let transport = |source| RpcError::Transport {
            address: address.to_string(),
            source,
        };

        let response: JsonRpcResponse<R> = self
            .http_client
            .post(format!("http://{}/", address))
            .json(&request)
            .send()
            .await
            .map_err(transport)?
            .json()
            .await
            .map_err(transport)?;

        if let Some(error) = response.error {
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        response.result.ok_or(RpcError::MissingResult)
    }

    /// eth_blockNumber on a specific node.
    pub async fn block_number_at(&self, address: &str) -> Result<u64, RpcError> {
        let result: String = self
            .call_at(address, "eth_blockNumber", Vec::<()>::new())
            .await?;
        parse_hex_u64(&result)
    }
}

#[async_trait]
impl ChainHeightReader for NodeRpcClient {
    async fn chain_height(&self, address: &str) -> Result<u64, String> {
        self.block_number_at(address).await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl NodeConnection for NodeRpcClient {
    /// Handshake with the newly committed node. Later calls pick the
    /// address up from the endpoint cell.
    async fn reconnect(&self, address: &str) -> Result<(), String> {
        let version: String = self
            .call_at(address, "net_version", Vec::<()>::new())
            .await
            .map_err(|e| e.to_string())?;

        let previous = self.network_id.write().replace(version.clone());
        if previous.as_deref() != Some(version.as_str()) {
            info!(endpoint = %address, network = %version, "Connected to node");
        } else {
            debug!(endpoint = %address, "Reconnected to node");
        }
        Ok(())
    }
}

/// Parse a `0x`-prefixed hex quantity.
pub fn parse_hex_u64(s: &str) -> Result<u64, RpcError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| RpcError::InvalidQuantity(s.to_string()))?;
    u64::from_str_radix(digits, 16).map_err(|_| RpcError::InvalidQuantity(s.to_string()))
}
