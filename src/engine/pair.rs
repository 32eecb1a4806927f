// Pairswap Engine: ETH/Token Pair (swap orchestrator)
//
// One `EthPair` trades the native asset against one ERC-20 token through the
// Uniswap V2 router along the fixed path [WETH, token] (or its reverse).
//
// Each swap is a single ordered flow: convert → (approve) → quote → bound →
// submit. Nothing is rolled back: an approval that landed before a failed swap
// stays granted. Operations on one account must be serialized by the caller
// unless nonces are supplied explicitly.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::U256;
use chrono::Utc;
use log::{debug, info};
use rust_decimal::Decimal;
use serde_json::json;

use super::abi::{
    decode_abi_string, decode_address, decode_uint256, decode_uint8, encode_balance_of,
    encode_decimals, encode_get_pair, encode_swap_exact_eth_for_tokens,
    encode_swap_exact_tokens_for_eth, encode_symbol, encode_weth,
};
use super::allowance::{describe_amount, AllowanceManager, ApprovalOutcome, MAX_APPROVAL};
use super::primitives::Address;
use super::quote::QuoteService;
use super::rpc::{Endpoint, RpcClient};
use super::submit::{deadline_at, TxSubmitter};
use super::traits::{
    Broadcaster, ChainConnection, GasPriceStrategy, NodeGasPrice, ReceiptWaiter, Signer,
};
use super::tx::{Credential, LocalSigner};
use super::types::{ContractCall, Direction, GasSpeed, Receipt, TokenMetadata, TxHash, TxOverrides};
use super::units::{ether_to_wei, from_base_units, to_base_units, wei_to_ether};
use crate::atoms::constants::{APPROVAL_GUARD, DEFAULT_WAIT_TIMEOUT, ETHER_DECIMALS};
use crate::atoms::error::{PairswapError, PairswapResult};
use crate::config::{PairSettings, PairswapConfig};

const ASSET_SYMBOL: &str = "ETH";

pub struct EthPair {
    conn: Arc<dyn ChainConnection>,
    submitter: Arc<TxSubmitter>,
    gas_strategy: Arc<dyn GasPriceStrategy>,
    quotes: QuoteService,
    allowances: AllowanceManager,
    settings: PairSettings,
    chain_id: u64,
    weth: Address,
    token: TokenMetadata,
}

impl std::fmt::Debug for EthPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthPair")
            .field("account", &self.settings.account)
            .field("token", &self.token.symbol)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

impl EthPair {
    // ── Construction ───────────────────────────────────────────────────────

    /// Connect to the configured provider and load the pair.
    ///
    /// The provider scheme, addresses, slippage and credential are all
    /// validated before any connection is attempted.
    pub async fn connect(config: &PairswapConfig, credential: Credential) -> PairswapResult<Self> {
        let endpoint = Endpoint::parse(&config.account.provider)?;
        let settings = config.settings()?;
        let signer = Arc::new(LocalSigner::for_account(&credential, settings.account)?);
        drop(credential);

        let connectivity = |e: PairswapError| match e {
            PairswapError::Config(_) | PairswapError::Connectivity { .. } => e,
            other => PairswapError::Connectivity {
                endpoint: endpoint.to_string(),
                message: other.to_string(),
            },
        };
        let client = Arc::new(RpcClient::connect(&endpoint).await.map_err(connectivity)?);
        let chain_id = client.chain_id().await.map_err(connectivity)?;
        info!("[pair] Connected to {} (chain {})", endpoint, chain_id);

        Self::assemble(client.clone(), signer, client.clone(), client, settings, chain_id).await
    }

    /// Build a pair over caller-supplied collaborators.
    pub async fn with_collaborators(
        conn: Arc<dyn ChainConnection>,
        signer: Arc<dyn Signer>,
        broadcaster: Arc<dyn Broadcaster>,
        waiter: Arc<dyn ReceiptWaiter>,
        settings: PairSettings,
    ) -> PairswapResult<Self> {
        if signer.address() != settings.account {
            return Err(PairswapError::config(format!(
                "Signer controls {}, not the configured account {}",
                signer.address(),
                settings.account
            )));
        }
        let chain_id = conn.chain_id().await?;
        Self::assemble(conn, signer, broadcaster, waiter, settings, chain_id).await
    }

    async fn assemble(
        conn: Arc<dyn ChainConnection>,
        signer: Arc<dyn Signer>,
        broadcaster: Arc<dyn Broadcaster>,
        waiter: Arc<dyn ReceiptWaiter>,
        settings: PairSettings,
        chain_id: u64,
    ) -> PairswapResult<Self> {
        let weth = decode_address(&conn.call(&settings.router, &encode_weth()).await?)?;
        let symbol = decode_abi_string(&conn.call(&settings.token, &encode_symbol()).await?)?;
        let decimals = decode_uint8(&conn.call(&settings.token, &encode_decimals()).await?)?;
        let token = TokenMetadata { address: settings.token, symbol, decimals };
        debug!(
            "[pair] {} ({} decimals) at {}, WETH {}",
            token.symbol, token.decimals, token.address, weth
        );

        let submitter = Arc::new(TxSubmitter::new(
            conn.clone(),
            signer,
            broadcaster,
            waiter,
            chain_id,
            settings.gas,
            settings.gas_price,
        ));
        let quotes = QuoteService::new(conn.clone(), settings.router, weth, token.address);
        let allowances =
            AllowanceManager::new(conn.clone(), submitter.clone(), token.clone(), settings.router);

        Ok(Self {
            conn,
            submitter,
            gas_strategy: Arc::new(NodeGasPrice),
            quotes,
            allowances,
            settings,
            chain_id,
            weth,
            token,
        })
    }

    /// Replace the gas-price oracle used by `suggest_gas_price`.
    pub fn with_gas_strategy(mut self, strategy: Arc<dyn GasPriceStrategy>) -> Self {
        self.gas_strategy = strategy;
        self
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn address(&self) -> Address {
        self.settings.account
    }

    pub fn token(&self) -> &TokenMetadata {
        &self.token
    }

    /// Router's WETH address, read once at construction.
    pub fn weth_address(&self) -> Address {
        self.weth
    }

    pub fn settings(&self) -> &PairSettings {
        &self.settings
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Router deadline for a transaction built now.
    pub fn deadline(&self) -> u64 {
        deadline_at(Utc::now(), self.settings.transaction_timeout)
    }

    // ── Chain views ────────────────────────────────────────────────────────

    pub async fn is_connected(&self) -> bool {
        self.conn.chain_id().await.is_ok()
    }

    /// Native balance in ETH.
    pub async fn balance(&self) -> PairswapResult<Decimal> {
        wei_to_ether(self.conn.balance(&self.settings.account).await?)
    }

    /// Token balance in whole tokens.
    pub async fn token_balance(&self) -> PairswapResult<Decimal> {
        let ret = self
            .conn
            .call(&self.token.address, &encode_balance_of(&self.settings.account))
            .await?;
        from_base_units(decode_uint256(&ret, 0)?, self.token.decimals)
    }

    /// (ETH, token)
    pub async fn balances(&self) -> PairswapResult<(Decimal, Decimal)> {
        Ok((self.balance().await?, self.token_balance().await?))
    }

    /// `{"ETH": "<balance>", "<SYMBOL>": "<balance>"}`
    pub async fn summary(&self) -> PairswapResult<serde_json::Value> {
        let (eth, token) = self.balances().await?;
        let mut summary = serde_json::Map::new();
        summary.insert(ASSET_SYMBOL.to_string(), json!(eth));
        summary.insert(self.token.symbol.clone(), json!(token));
        Ok(serde_json::Value::Object(summary))
    }

    /// Connected and holding something on either side of the pair.
    pub async fn has_funds(&self) -> PairswapResult<bool> {
        if !self.is_connected().await {
            return Ok(false);
        }
        Ok(!self.balance().await?.is_zero() || !self.token_balance().await?.is_zero())
    }

    /// Price of one ETH in tokens.
    pub async fn price(&self) -> PairswapResult<Decimal> {
        let one_eth = ether_to_wei(Decimal::ONE)?;
        let out = self
            .quotes
            .quote_output_for(one_eth, &self.quotes.path(Direction::AssetToToken))
            .await?;
        from_base_units(out, self.token.decimals)
    }

    /// Price of one token in ETH: the ETH it costs to buy one token.
    pub async fn token_price(&self) -> PairswapResult<Decimal> {
        let one_token = to_base_units(Decimal::ONE, self.token.decimals)?;
        let cost = self
            .quotes
            .quote_input_for(one_token, &self.quotes.path(Direction::AssetToToken))
            .await?;
        wei_to_ether(cost)
    }

    /// Uniswap V2 pair contract for WETH/token; zero if none exists.
    pub async fn pair_address(&self) -> PairswapResult<Address> {
        let ret = self
            .conn
            .call(&self.settings.factory, &encode_get_pair(&self.weth, &self.token.address))
            .await?;
        decode_address(&ret)
    }

    pub async fn suggest_gas_price(&self, speed: GasSpeed) -> PairswapResult<u64> {
        let price = self.gas_strategy.gas_price(self.conn.as_ref(), speed).await?;
        debug!("[gas] {:?} → {} wei", speed, price);
        Ok(price)
    }

    // ── Approval ───────────────────────────────────────────────────────────

    /// Whether the router may spend at least `required` token base units
    /// (unlimited when `None`).
    pub async fn is_token_approved(&self, required: Option<U256>) -> PairswapResult<bool> {
        self.allowances.is_approved(required.unwrap_or(MAX_APPROVAL)).await
    }

    /// Grant the router `amount` token base units (unlimited when `None`)
    /// unless it already has that much.
    pub async fn approve_token(
        &self,
        amount: Option<U256>,
        overrides: TxOverrides,
    ) -> PairswapResult<ApprovalOutcome> {
        let amount = amount.unwrap_or(MAX_APPROVAL);
        self.allowances.ensure(amount, amount, overrides).await
    }

    /// Wait for `tx_hash` to be mined (one hour when no timeout is given).
    /// A timeout leaves the outcome unknown.
    pub async fn wait(&self, tx_hash: &TxHash, timeout: Option<Duration>) -> PairswapResult<Receipt> {
        self.submitter
            .wait(tx_hash, timeout.unwrap_or(DEFAULT_WAIT_TIMEOUT))
            .await
    }

    // ── Swaps ──────────────────────────────────────────────────────────────

    /// Swap `amount` ETH for as many tokens as the router gives, but no fewer
    /// than the current quote less the slippage allowance. Returns once the
    /// transaction is broadcast.
    pub async fn swap_asset_for_token(
        &self,
        amount: Decimal,
        overrides: TxOverrides,
    ) -> PairswapResult<TxHash> {
        self.submit_asset_for_token(amount, overrides)
            .await
            .map_err(|e| e.during("swap", amount, ASSET_SYMBOL))
    }

    async fn submit_asset_for_token(
        &self,
        amount: Decimal,
        overrides: TxOverrides,
    ) -> PairswapResult<TxHash> {
        let value = ether_to_wei(amount)?;
        let quote = self.quotes.quote(Direction::AssetToToken, value).await?;
        let min_out = self.settings.max_slippage.min_output(quote.amount_out);
        let path = self.quotes.path(Direction::AssetToToken);
        let deadline = self.deadline();

        info!(
            "[swap] Swapping {} {} for a minimum of {} {}",
            amount,
            ASSET_SYMBOL,
            describe_amount(min_out, self.token.decimals),
            self.token.symbol
        );
        debug!(
            "[swap] path={:?} to={} deadline={} quoted={} slippage={}",
            path, self.settings.account, deadline, quote.amount_out, self.settings.max_slippage
        );

        let call = ContractCall {
            to: self.settings.router,
            data: encode_swap_exact_eth_for_tokens(min_out, &path, &self.settings.account, deadline),
            method: "swapExactETHForTokens",
        };
        let params = self.submitter.build_params(value, overrides).await?;
        self.submitter.submit(&call, &params).await
    }

    /// Swap `amount` tokens for ETH, approving the router first if needed.
    ///
    /// When an approval is sent the call waits for it to be mined and for its
    /// nonce to become visible before the swap is built. With an explicit
    /// nonce the approval takes it and the swap takes the next one.
    pub async fn swap_token_for_asset(
        &self,
        amount: Decimal,
        overrides: TxOverrides,
    ) -> PairswapResult<TxHash> {
        self.submit_token_for_asset(amount, overrides)
            .await
            .map_err(|e| e.during("unswap", amount, &self.token.symbol))
    }

    async fn submit_token_for_asset(
        &self,
        amount: Decimal,
        overrides: TxOverrides,
    ) -> PairswapResult<TxHash> {
        let amount_in = to_base_units(amount, self.token.decimals)?;

        let overrides = match self.allowances.ensure(amount_in, MAX_APPROVAL, overrides).await? {
            ApprovalOutcome::AlreadyApproved => overrides,
            ApprovalOutcome::Approved { tx_hash, nonce_visible, .. } => {
                // Without an explicit nonce the swap would reuse the approval's.
                if !nonce_visible && overrides.nonce.is_none() {
                    return Err(PairswapError::ApprovalTimeout {
                        amount: describe_amount(MAX_APPROVAL, self.token.decimals),
                        symbol: self.token.symbol.clone(),
                        tx_hash,
                        timeout_secs: APPROVAL_GUARD.as_secs(),
                    });
                }
                overrides.after_consumed_nonce()
            }
        };

        let quote = self.quotes.quote(Direction::TokenToAsset, amount_in).await?;
        let min_out = self.settings.max_slippage.min_output(quote.amount_out);
        let path = self.quotes.path(Direction::TokenToAsset);
        let deadline = self.deadline();

        info!(
            "[unswap] Unswapping {} {} for a minimum of {} {}",
            amount,
            self.token.symbol,
            describe_amount(min_out, ETHER_DECIMALS),
            ASSET_SYMBOL
        );
        debug!(
            "[unswap] path={:?} to={} deadline={} quoted={} slippage={}",
            path, self.settings.account, deadline, quote.amount_out, self.settings.max_slippage
        );

        let call = ContractCall {
            to: self.settings.router,
            data: encode_swap_exact_tokens_for_eth(
                amount_in,
                min_out,
                &path,
                &self.settings.account,
                deadline,
            ),
            method: "swapExactTokensForETH",
        };
        let params = self.submitter.build_params(U256::ZERO, overrides).await?;
        self.submitter.submit(&call, &params).await
    }
}
