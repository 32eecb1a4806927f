// Pairswap Engine: Allowance Manager
//
// Allowance state is derived on every call from `allowance(owner, router)`,
// never cached. Granting it is a transaction followed by two waits: the
// receipt, then the sender's transaction count moving past the approval's
// nonce (some nodes serve a stale count for a while after a receipt appears,
// and a swap signed with that count would be rejected as a replacement).
// Both waits share one guard window measured from submission.

use std::sync::Arc;

use alloy_primitives::U256;
use log::{debug, info, warn};
use tokio::time::Instant;

use super::abi::{decode_uint256, encode_allowance, encode_approve};
use super::primitives::Address;
use super::submit::TxSubmitter;
use super::traits::ChainConnection;
use super::types::{ContractCall, TokenMetadata, TxHash, TxOverrides};
use super::units::from_base_units;
use crate::atoms::constants::{APPROVAL_GUARD, NONCE_POLL_INTERVAL};
use crate::atoms::error::{PairswapError, PairswapResult};

/// `type(uint256).max`, the conventional "unlimited" approval.
pub const MAX_APPROVAL: U256 = U256::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowanceState {
    Insufficient { current: U256 },
    Sufficient { current: U256 },
}

impl AllowanceState {
    pub fn from_allowance(current: U256, required: U256) -> Self {
        if current >= required {
            AllowanceState::Sufficient { current }
        } else {
            AllowanceState::Insufficient { current }
        }
    }

    pub fn is_sufficient(&self) -> bool {
        matches!(self, AllowanceState::Sufficient { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// Allowance already covered the requirement; nothing was sent.
    AlreadyApproved,
    /// An `approve` transaction was mined.
    Approved {
        tx_hash: TxHash,
        /// Nonce the approval consumed.
        nonce: u64,
        /// False when the guard ran out before the node reported a count past `nonce`.
        nonce_visible: bool,
    },
}

/// Human-readable approval amount for logs and errors.
pub(crate) fn describe_amount(amount: U256, decimals: u8) -> String {
    if amount == MAX_APPROVAL {
        return "unlimited".into();
    }
    match from_base_units(amount, decimals) {
        Ok(value) => value.to_string(),
        Err(_) => format!("{} base units", amount),
    }
}

pub struct AllowanceManager {
    conn: Arc<dyn ChainConnection>,
    submitter: Arc<TxSubmitter>,
    token: TokenMetadata,
    spender: Address,
}

impl AllowanceManager {
    pub fn new(
        conn: Arc<dyn ChainConnection>,
        submitter: Arc<TxSubmitter>,
        token: TokenMetadata,
        spender: Address,
    ) -> Self {
        Self { conn, submitter, token, spender }
    }

    /// Current allowance granted by the account to the spender, in token base units.
    pub async fn allowance(&self) -> PairswapResult<U256> {
        let owner = self.submitter.address();
        let ret = self
            .conn
            .call(&self.token.address, &encode_allowance(&owner, &self.spender))
            .await?;
        decode_uint256(&ret, 0)
    }

    pub async fn state(&self, required: U256) -> PairswapResult<AllowanceState> {
        Ok(AllowanceState::from_allowance(self.allowance().await?, required))
    }

    pub async fn is_approved(&self, required: U256) -> PairswapResult<bool> {
        Ok(self.state(required).await?.is_sufficient())
    }

    /// Make sure the allowance covers `required`, granting `grant` if it doesn't.
    ///
    /// Idempotent: once the allowance is sufficient no transaction is sent.
    pub async fn ensure(
        &self,
        required: U256,
        grant: U256,
        overrides: TxOverrides,
    ) -> PairswapResult<ApprovalOutcome> {
        match self.state(required).await? {
            AllowanceState::Sufficient { current } => {
                debug!(
                    "[approve] {} allowance {} covers {}",
                    self.token.symbol, current, required
                );
                Ok(ApprovalOutcome::AlreadyApproved)
            }
            AllowanceState::Insufficient { current } => {
                debug!(
                    "[approve] {} allowance {} below {}",
                    self.token.symbol, current, required
                );
                self.approve(grant, overrides).await
            }
        }
    }

    /// Submit `approve(spender, amount)` and wait until it is mined and its
    /// nonce is visible.
    pub async fn approve(&self, amount: U256, overrides: TxOverrides) -> PairswapResult<ApprovalOutcome> {
        let display = describe_amount(amount, self.token.decimals);
        info!("[approve] Approving {} {} for transfer", display, self.token.symbol);

        let params = self.submitter.build_params(U256::ZERO, overrides).await?;
        let call = ContractCall {
            to: self.token.address,
            data: encode_approve(&self.spender, amount),
            method: "approve",
        };
        let tx_hash = self.submitter.submit(&call, &params).await?;
        let started = Instant::now();

        let receipt = match self.submitter.wait(&tx_hash, APPROVAL_GUARD).await {
            Ok(receipt) => receipt,
            Err(PairswapError::ConfirmationTimeout { .. }) => {
                return Err(PairswapError::ApprovalTimeout {
                    amount: display,
                    symbol: self.token.symbol.clone(),
                    tx_hash,
                    timeout_secs: APPROVAL_GUARD.as_secs(),
                });
            }
            Err(e) => return Err(e),
        };
        let receipt = receipt.ensure_success()?;
        debug!("[approve] {} mined in block {}", tx_hash, receipt.block_number);

        let nonce_visible = self.await_nonce_past(params.nonce, started).await?;
        if nonce_visible {
            info!("[approve] Approved {} {} ({})", display, self.token.symbol, tx_hash);
        }
        Ok(ApprovalOutcome::Approved {
            tx_hash,
            nonce: params.nonce,
            nonce_visible,
        })
    }

    /// Poll the sender's transaction count until it exceeds `nonce` or the
    /// guard window opened at `started` closes.
    async fn await_nonce_past(&self, nonce: u64, started: Instant) -> PairswapResult<bool> {
        let owner = self.submitter.address();
        loop {
            let count = self.conn.transaction_count(&owner).await?;
            if count > nonce {
                return Ok(true);
            }
            if started.elapsed() >= APPROVAL_GUARD {
                warn!(
                    "[approve] Transaction count still {} after {}s; nonce {} not yet visible",
                    count,
                    APPROVAL_GUARD.as_secs(),
                    nonce
                );
                return Ok(false);
            }
            tokio::time::sleep(NONCE_POLL_INTERVAL).await;
        }
    }
}
