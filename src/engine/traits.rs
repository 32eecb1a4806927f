// Pairswap Engine: Collaborator Traits
//
// The swap engine never talks to a node directly. Everything it needs from the
// outside world goes through these seams, so the JSON-RPC client, a local key,
// or a test double can stand behind them.

use std::time::Duration;

use alloy_primitives::U256;
use async_trait::async_trait;

use super::primitives::Address;
use super::types::{GasSpeed, Receipt, TxHash, UnsignedTx};
use crate::atoms::error::PairswapResult;

/// Read access to chain state.
#[async_trait]
pub trait ChainConnection: Send + Sync {
    /// Chain id; also serves as the connectivity probe.
    async fn chain_id(&self) -> PairswapResult<u64>;

    /// Native balance in wei.
    async fn balance(&self, address: &Address) -> PairswapResult<U256>;

    /// Number of transactions sent from `address`, i.e. its next nonce.
    async fn transaction_count(&self, address: &Address) -> PairswapResult<u64>;

    /// Read-only contract call (`eth_call`); returns the raw return data.
    async fn call(&self, to: &Address, data: &[u8]) -> PairswapResult<Vec<u8>>;

    /// The node's own gas price suggestion in wei.
    async fn gas_price(&self) -> PairswapResult<u64>;
}

/// Turns unsigned transactions into signed raw payloads.
pub trait Signer: Send + Sync {
    /// The account this signer signs for.
    fn address(&self) -> Address;

    fn sign_transaction(&self, tx: &UnsignedTx) -> PairswapResult<Vec<u8>>;
}

/// Submits signed payloads to the network.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn send_raw_transaction(&self, raw: &[u8]) -> PairswapResult<TxHash>;
}

/// Blocks until a transaction is mined.
#[async_trait]
pub trait ReceiptWaiter: Send + Sync {
    /// Fails with `PairswapError::ConfirmationTimeout` once `timeout` elapses.
    /// A timeout means the outcome is unknown, not that the transaction failed.
    async fn wait_for_receipt(&self, tx_hash: &TxHash, timeout: Duration) -> PairswapResult<Receipt>;
}

/// Pluggable gas-price oracle.
#[async_trait]
pub trait GasPriceStrategy: Send + Sync {
    async fn gas_price(&self, conn: &dyn ChainConnection, speed: GasSpeed) -> PairswapResult<u64>;
}

/// Default strategy: whatever the node suggests, regardless of speed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeGasPrice;

#[async_trait]
impl GasPriceStrategy for NodeGasPrice {
    async fn gas_price(&self, conn: &dyn ChainConnection, _speed: GasSpeed) -> PairswapResult<u64> {
        conn.gas_price().await
    }
}
