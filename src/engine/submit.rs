// Pairswap Engine: Transaction Builder & Submitter
//
// The only path by which the engine changes chain state. `submit` signs and
// broadcasts; it never waits. Waiting is a separate, explicit step.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use log::{debug, info};

use super::primitives::Address;
use super::traits::{Broadcaster, ChainConnection, ReceiptWaiter, Signer};
use super::types::{ContractCall, Receipt, TxHash, TxOverrides, TxParams, UnsignedTx};
use crate::atoms::error::PairswapResult;

/// Unix timestamp `timeout` after `now`, as passed to router calls.
pub fn deadline_at(now: DateTime<Utc>, timeout: Duration) -> u64 {
    now.timestamp().max(0) as u64 + timeout.as_secs()
}

pub struct TxSubmitter {
    conn: Arc<dyn ChainConnection>,
    signer: Arc<dyn Signer>,
    broadcaster: Arc<dyn Broadcaster>,
    waiter: Arc<dyn ReceiptWaiter>,
    chain_id: u64,
    default_gas: u64,
    default_gas_price: u64,
}

impl TxSubmitter {
    pub fn new(
        conn: Arc<dyn ChainConnection>,
        signer: Arc<dyn Signer>,
        broadcaster: Arc<dyn Broadcaster>,
        waiter: Arc<dyn ReceiptWaiter>,
        chain_id: u64,
        default_gas: u64,
        default_gas_price: u64,
    ) -> Self {
        Self {
            conn,
            signer,
            broadcaster,
            waiter,
            chain_id,
            default_gas,
            default_gas_price,
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Next nonce as the chain currently reports it.
    pub async fn current_nonce(&self) -> PairswapResult<u64> {
        self.conn.transaction_count(&self.signer.address()).await
    }

    /// Resolve overrides against the configured defaults. A missing nonce is
    /// read from the chain now; two concurrent callers can read the same one.
    pub async fn build_params(&self, value: U256, overrides: TxOverrides) -> PairswapResult<TxParams> {
        let nonce = match overrides.nonce {
            Some(nonce) => nonce,
            None => self.current_nonce().await?,
        };
        Ok(TxParams {
            from: self.signer.address(),
            value,
            gas: overrides.gas.unwrap_or(self.default_gas),
            gas_price: overrides.gas_price.unwrap_or(self.default_gas_price),
            nonce,
        })
    }

    /// Sign and broadcast `call` with `params`; returns the transaction hash.
    pub async fn submit(&self, call: &ContractCall, params: &TxParams) -> PairswapResult<TxHash> {
        let tx = UnsignedTx::new(self.chain_id, call, params);
        debug!(
            "[tx] {} → {} nonce={} gas={} gas_price={} value={}",
            call.method, call.to, params.nonce, params.gas, params.gas_price, params.value
        );
        let raw = self.signer.sign_transaction(&tx)?;
        let tx_hash = self.broadcaster.send_raw_transaction(&raw).await?;
        info!("[tx] {} broadcast: {}", call.method, tx_hash);
        Ok(tx_hash)
    }

    /// Block until `tx_hash` is mined or `timeout` elapses.
    pub async fn wait(&self, tx_hash: &TxHash, timeout: Duration) -> PairswapResult<Receipt> {
        self.waiter.wait_for_receipt(tx_hash, timeout).await
    }
}
