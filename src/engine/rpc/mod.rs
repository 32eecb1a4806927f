// Pairswap Engine: JSON-RPC Client
//
// `RpcClient` is the production implementation of the chain collaborators
// (`ChainConnection`, `Broadcaster`, `ReceiptWaiter`). The wire transport is a
// trait object with one implementation per endpoint kind:
//   endpoint : scheme inspection (https / wss / IPC path)
//   http     : reqwest POST
//   ws       : tokio-tungstenite, responses matched by id
//   ipc      : unix domain socket, responses matched by id

mod endpoint;
mod http;
#[cfg(unix)]
mod ipc;
mod ws;

pub use endpoint::Endpoint;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::U256;
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::{json, Value};

use super::primitives::{hex_decode, hex_encode, parse_quantity_u256, parse_quantity_u64, Address};
use super::traits::{Broadcaster, ChainConnection, ReceiptWaiter};
use super::types::{Receipt, TxHash};
use crate::atoms::constants::RECEIPT_POLL_INTERVAL;
use crate::atoms::error::{PairswapError, PairswapResult};

/// Moves one JSON-RPC request envelope to the node and returns the matching
/// response envelope.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn round_trip(&self, id: u64, payload: &Value) -> PairswapResult<Value>;
}

pub(crate) fn response_id(response: &Value) -> Option<u64> {
    response.get("id").and_then(Value::as_u64)
}

/// Open the transport the endpoint calls for.
pub async fn connect_transport(endpoint: &Endpoint) -> PairswapResult<Box<dyn Transport>> {
    match endpoint {
        Endpoint::Http(url) => Ok(Box::new(http::HttpTransport::new(url)?)),
        Endpoint::WebSocket(url) => Ok(Box::new(ws::WsTransport::connect(url).await?)),
        #[cfg(unix)]
        Endpoint::Ipc(path) => Ok(Box::new(ipc::IpcTransport::connect(path).await?)),
        #[cfg(not(unix))]
        Endpoint::Ipc(path) => Err(PairswapError::config(format!(
            "IPC provider '{}' is not supported on this platform",
            path.display()
        ))),
    }
}

/// Unwrap a response envelope into its `result`.
fn into_result(response: Value) -> PairswapResult<Value> {
    if let Some(error) = response.get("error") {
        return Err(PairswapError::Rpc {
            code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }
    response
        .get("result")
        .cloned()
        .ok_or_else(|| PairswapError::abi("RPC response missing 'result' field"))
}

fn as_str<'a>(value: &'a Value, what: &str) -> PairswapResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| PairswapError::abi(format!("Invalid {} result: {}", what, value)))
}

/// Parse an `eth_getTransactionReceipt` result. A receipt without a block
/// number is still pending.
fn parse_receipt(result: &Value) -> PairswapResult<Option<Receipt>> {
    if result.is_null() {
        return Ok(None);
    }
    let block_number = match result.get("blockNumber").and_then(Value::as_str) {
        Some(hex) => parse_quantity_u64(hex)?,
        None => return Ok(None),
    };
    let tx_hash = result
        .get("transactionHash")
        .and_then(Value::as_str)
        .ok_or_else(|| PairswapError::abi("Receipt missing transactionHash"))?
        .to_string();
    let gas_used = match result.get("gasUsed").and_then(Value::as_str) {
        Some(hex) => parse_quantity_u64(hex)?,
        None => 0,
    };
    let success = result.get("status").and_then(Value::as_str) == Some("0x1");
    Ok(Some(Receipt { tx_hash, block_number, gas_used, success }))
}

// ── RpcClient ──────────────────────────────────────────────────────────────

pub struct RpcClient {
    endpoint: String,
    transport: Box<dyn Transport>,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Connect to `endpoint`. Does not probe the node; see `ChainConnection::chain_id`.
    pub async fn connect(endpoint: &Endpoint) -> PairswapResult<Self> {
        let transport = connect_transport(endpoint).await?;
        Ok(Self::with_transport(endpoint.to_string(), transport))
    }

    pub fn with_transport(endpoint: impl Into<String>, transport: Box<dyn Transport>) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Low-level JSON-RPC call
    pub async fn request(&self, method: &str, params: Value) -> PairswapResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });
        debug!("[rpc] {} #{}", method, id);
        into_result(self.transport.round_trip(id, &body).await?)
    }

    /// Fetch a receipt; `None` while the transaction is pending.
    pub async fn transaction_receipt(&self, tx_hash: &str) -> PairswapResult<Option<Receipt>> {
        let result = self.request("eth_getTransactionReceipt", json!([tx_hash])).await?;
        parse_receipt(&result)
    }
}

#[async_trait]
impl ChainConnection for RpcClient {
    async fn chain_id(&self) -> PairswapResult<u64> {
        let result = self.request("eth_chainId", json!([])).await?;
        parse_quantity_u64(as_str(&result, "chain id")?)
    }

    async fn balance(&self, address: &Address) -> PairswapResult<U256> {
        let result = self
            .request("eth_getBalance", json!([address.to_checksum(), "latest"]))
            .await?;
        parse_quantity_u256(as_str(&result, "balance")?)
    }

    async fn transaction_count(&self, address: &Address) -> PairswapResult<u64> {
        let result = self
            .request("eth_getTransactionCount", json!([address.to_checksum(), "latest"]))
            .await?;
        parse_quantity_u64(as_str(&result, "nonce")?)
    }

    async fn call(&self, to: &Address, data: &[u8]) -> PairswapResult<Vec<u8>> {
        let result = self
            .request(
                "eth_call",
                json!([{ "to": to.to_checksum(), "data": hex_encode(data) }, "latest"]),
            )
            .await?;
        hex_decode(as_str(&result, "eth_call")?)
    }

    async fn gas_price(&self) -> PairswapResult<u64> {
        let result = self.request("eth_gasPrice", json!([])).await?;
        parse_quantity_u64(as_str(&result, "gas price")?)
    }
}

#[async_trait]
impl Broadcaster for RpcClient {
    async fn send_raw_transaction(&self, raw: &[u8]) -> PairswapResult<TxHash> {
        let result = self
            .request("eth_sendRawTransaction", json!([hex_encode(raw)]))
            .await?;
        Ok(as_str(&result, "tx hash")?.to_string())
    }
}

#[async_trait]
impl ReceiptWaiter for RpcClient {
    async fn wait_for_receipt(&self, tx_hash: &TxHash, timeout: Duration) -> PairswapResult<Receipt> {
        let started = tokio::time::Instant::now();
        loop {
            match self.transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => return Ok(receipt),
                Ok(None) => {}
                Err(e) => warn!("[rpc] Receipt poll for {} failed: {}", tx_hash, e),
            }
            let elapsed = started.elapsed();
            if elapsed >= timeout {
                return Err(PairswapError::ConfirmationTimeout {
                    tx_hash: tx_hash.clone(),
                    timeout_secs: timeout.as_secs(),
                });
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL.min(timeout - elapsed)).await;
        }
    }
}
