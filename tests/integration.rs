// Integration tests: `EthPair` against an in-memory chain.
//
// `MockChain` stands in for every collaborator (connection, signer,
// broadcaster, receipt waiter). It answers the fixed router/token calls by
// selector, records every transaction handed to the signer, and models the
// lagging transaction count nodes report after an approval is mined.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::U256;
use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use pairswap::atoms::constants::APPROVAL_GUARD;
use pairswap::config::PairSettings;
use pairswap::engine::{
    Address, ApprovalOutcome, Broadcaster, ChainConnection, EthPair, GasPriceStrategy, GasSpeed,
    ReceiptWaiter, Receipt, Signer, TxHash, TxOverrides, UnsignedTx,
};
use pairswap::{Credential, PairswapConfig, PairswapError, PairswapResult};

const ACCOUNT: Address = Address([0xa1; 20]);
const TOKEN: Address = Address([0x70; 20]);
const WETH: Address = Address([0xee; 20]);
const ROUTER: Address = Address([0x20; 20]);
const FACTORY: Address = Address([0xfa; 20]);
const PAIR: Address = Address([0x9a; 20]);

const SEL_WETH: [u8; 4] = [0xad, 0x5c, 0x46, 0x48];
const SEL_SYMBOL: [u8; 4] = [0x95, 0xd8, 0x9b, 0x41];
const SEL_DECIMALS: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];
const SEL_GET_AMOUNTS_OUT: [u8; 4] = [0xd0, 0x6c, 0xa6, 0x1f];
const SEL_GET_AMOUNTS_IN: [u8; 4] = [0x1f, 0x00, 0xca, 0x74];
const SEL_ALLOWANCE: [u8; 4] = [0xdd, 0x62, 0xed, 0x3e];
const SEL_BALANCE_OF: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
const SEL_GET_PAIR: [u8; 4] = [0xe6, 0xa4, 0x39, 0x05];
const SEL_APPROVE: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];
const SEL_SWAP_EXACT_ETH: [u8; 4] = [0x7f, 0xf3, 0x6a, 0xb5];
const SEL_SWAP_EXACT_TOKENS: [u8; 4] = [0x18, 0xcb, 0xaf, 0xe5];

fn e18(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn word(value: U256) -> [u8; 32] {
    value.to_be_bytes::<32>()
}

fn address_word(address: &Address) -> [u8; 32] {
    let mut w = [0u8; 32];
    w[12..].copy_from_slice(address.as_bytes());
    w
}

/// Calldata word `index` (after the selector).
fn arg(data: &[u8], index: usize) -> U256 {
    U256::from_be_slice(&data[4 + index * 32..4 + (index + 1) * 32])
}

/// Address element `index` of the trailing `address[]` in router calldata.
fn path_element(data: &[u8], head_words: usize, index: usize) -> Address {
    let start = 4 + (head_words + 1 + index) * 32 + 12;
    let mut a = [0u8; 20];
    a.copy_from_slice(&data[start..start + 20]);
    Address(a)
}

fn uint_array(values: &[U256]) -> Vec<u8> {
    let mut out = word(U256::from(32u64)).to_vec();
    out.extend(word(U256::from(values.len())));
    for v in values {
        out.extend(word(*v));
    }
    out
}

fn abi_string(s: &str) -> Vec<u8> {
    let mut out = word(U256::from(32u64)).to_vec();
    out.extend(word(U256::from(s.len())));
    let mut padded = s.as_bytes().to_vec();
    padded.resize(32, 0);
    out.extend(padded);
    out
}

// ── Mock chain ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApprovalMining {
    Succeeds,
    Reverts,
    Never,
}

struct MockState {
    decimals: u8,
    balance: U256,
    token_balance: U256,
    allowance: U256,
    quote_out: U256,
    quote_in: U256,
    quotes_revert: bool,
    gas_price: u64,
    nonce: u64,
    /// Count reads that still report the old nonce after an approval is mined.
    nonce_lag: u32,
    pending_bump: Option<u32>,
    count_reads: u32,
    approval_mining: ApprovalMining,
    submitted: Vec<UnsignedTx>,
    calls: Vec<(Address, [u8; 4])>,
}

struct MockChain {
    state: Mutex<MockState>,
}

impl MockChain {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MockState {
                decimals: 18,
                balance: U256::ZERO,
                token_balance: U256::ZERO,
                allowance: U256::ZERO,
                quote_out: U256::from(1000u64),
                quote_in: U256::from(1000u64),
                quotes_revert: false,
                gas_price: 42_000_000_000,
                nonce: 7,
                nonce_lag: 0,
                pending_bump: None,
                count_reads: 0,
                approval_mining: ApprovalMining::Succeeds,
                submitted: Vec::new(),
                calls: Vec::new(),
            }),
        })
    }

    fn with(self: Arc<Self>, f: impl FnOnce(&mut MockState)) -> Arc<Self> {
        {
            let mut state = self.state.lock();
            f(&mut *state);
        }
        self
    }

    fn submitted(&self) -> Vec<UnsignedTx> {
        self.state.lock().submitted.clone()
    }

    fn selectors(&self) -> Vec<[u8; 4]> {
        self.submitted()
            .iter()
            .map(|tx| [tx.data[0], tx.data[1], tx.data[2], tx.data[3]])
            .collect()
    }

    fn read_calls(&self, selector: [u8; 4]) -> usize {
        self.state.lock().calls.iter().filter(|(_, s)| *s == selector).count()
    }
}

#[async_trait]
impl ChainConnection for MockChain {
    async fn chain_id(&self) -> PairswapResult<u64> {
        Ok(1)
    }

    async fn balance(&self, _address: &Address) -> PairswapResult<U256> {
        Ok(self.state.lock().balance)
    }

    async fn transaction_count(&self, _address: &Address) -> PairswapResult<u64> {
        let mut s = self.state.lock();
        s.count_reads += 1;
        if let Some(remaining) = s.pending_bump {
            if remaining == 0 {
                s.nonce += 1;
                s.pending_bump = None;
            } else {
                s.pending_bump = Some(remaining - 1);
            }
        }
        Ok(s.nonce)
    }

    async fn call(&self, to: &Address, data: &[u8]) -> PairswapResult<Vec<u8>> {
        let mut s = self.state.lock();
        let selector = [data[0], data[1], data[2], data[3]];
        s.calls.push((*to, selector));
        let quote_error = || PairswapError::Rpc { code: 3, message: "execution reverted".into() };
        match (*to, selector) {
            (ROUTER, SEL_WETH) => Ok(address_word(&WETH).to_vec()),
            (TOKEN, SEL_SYMBOL) => Ok(abi_string("TKN")),
            (TOKEN, SEL_DECIMALS) => Ok(word(U256::from(s.decimals)).to_vec()),
            (TOKEN, SEL_ALLOWANCE) => Ok(word(s.allowance).to_vec()),
            (TOKEN, SEL_BALANCE_OF) => Ok(word(s.token_balance).to_vec()),
            (FACTORY, SEL_GET_PAIR) => Ok(address_word(&PAIR).to_vec()),
            (ROUTER, SEL_GET_AMOUNTS_OUT) if s.quotes_revert => Err(quote_error()),
            (ROUTER, SEL_GET_AMOUNTS_IN) if s.quotes_revert => Err(quote_error()),
            (ROUTER, SEL_GET_AMOUNTS_OUT) => Ok(uint_array(&[arg(data, 0), s.quote_out])),
            (ROUTER, SEL_GET_AMOUNTS_IN) => Ok(uint_array(&[s.quote_in, arg(data, 0)])),
            _ => Err(quote_error()),
        }
    }

    async fn gas_price(&self) -> PairswapResult<u64> {
        Ok(self.state.lock().gas_price)
    }
}

impl Signer for MockChain {
    fn address(&self) -> Address {
        ACCOUNT
    }

    fn sign_transaction(&self, tx: &UnsignedTx) -> PairswapResult<Vec<u8>> {
        let mut s = self.state.lock();
        s.submitted.push(tx.clone());
        Ok(vec![(s.submitted.len() - 1) as u8])
    }
}

#[async_trait]
impl Broadcaster for MockChain {
    async fn send_raw_transaction(&self, raw: &[u8]) -> PairswapResult<TxHash> {
        Ok(format!("0x{:064x}", raw[0]))
    }
}

#[async_trait]
impl ReceiptWaiter for MockChain {
    async fn wait_for_receipt(&self, tx_hash: &TxHash, timeout: Duration) -> PairswapResult<Receipt> {
        let index = usize::from_str_radix(tx_hash.trim_start_matches("0x"), 16).unwrap();
        let (is_approve, mining) = {
            let s = self.state.lock();
            let tx = &s.submitted[index];
            (tx.data[..4] == SEL_APPROVE, s.approval_mining)
        };
        if is_approve && mining == ApprovalMining::Never {
            tokio::time::sleep(timeout).await;
            return Err(PairswapError::ConfirmationTimeout {
                tx_hash: tx_hash.clone(),
                timeout_secs: timeout.as_secs(),
            });
        }

        let mut s = self.state.lock();
        let success = !(is_approve && mining == ApprovalMining::Reverts);
        if is_approve && success {
            let granted = arg(&s.submitted[index].data, 1);
            s.allowance = granted;
            s.pending_bump = Some(s.nonce_lag);
        }
        Ok(Receipt {
            tx_hash: tx_hash.clone(),
            block_number: 100 + index as u64,
            gas_used: 50_000,
            success,
        })
    }
}

fn settings() -> PairSettings {
    let mut settings = PairSettings::new(ACCOUNT, TOKEN).unwrap();
    settings.router = ROUTER;
    settings.factory = FACTORY;
    settings
}

async fn pair_with(chain: &Arc<MockChain>, settings: PairSettings) -> EthPair {
    EthPair::with_collaborators(chain.clone(), chain.clone(), chain.clone(), chain.clone(), settings)
        .await
        .unwrap()
}

async fn pair(chain: &Arc<MockChain>) -> EthPair {
    pair_with(chain, settings()).await
}

// ── Construction ───────────────────────────────────────────────────────────

#[tokio::test]
async fn construction_reads_metadata_once() {
    let chain = MockChain::new();
    let pair = pair(&chain).await;
    assert_eq!(pair.weth_address(), WETH);
    assert_eq!(pair.token().symbol, "TKN");
    assert_eq!(pair.token().decimals, 18);
    assert_eq!(pair.chain_id(), 1);

    pair.price().await.unwrap();
    pair.price().await.unwrap();
    assert_eq!(chain.read_calls(SEL_WETH), 1);
    assert_eq!(chain.read_calls(SEL_SYMBOL), 1);
    assert_eq!(chain.read_calls(SEL_DECIMALS), 1);
}

#[tokio::test]
async fn signer_must_control_the_account() {
    let chain = MockChain::new();
    let mut other = settings();
    other.account = Address([0x01; 20]);
    let err = EthPair::with_collaborators(chain.clone(), chain.clone(), chain.clone(), chain.clone(), other)
        .await
        .unwrap_err();
    assert!(matches!(err, PairswapError::Config(_)));
}

#[tokio::test]
async fn unknown_provider_scheme_fails_before_connecting() {
    let config = PairswapConfig::from_toml_str(
        r#"
        [account]
        address = "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"
        provider = "ftp://host"

        [pair]
        token = "0x6b175474e89094c44da98b954eedeac495271d0f"
        "#,
    )
    .unwrap();
    let credential =
        Credential::new("4646464646464646464646464646464646464646464646464646464646464646");
    let err = EthPair::connect(&config, credential).await.unwrap_err();
    match err {
        PairswapError::Config(msg) => assert!(msg.contains("ftp://host")),
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[tokio::test]
async fn plain_http_is_rejected_too() {
    let config = PairswapConfig::from_toml_str(
        r#"
        [account]
        address = "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"
        provider = "http://localhost:8545"

        [pair]
        token = "0x6b175474e89094c44da98b954eedeac495271d0f"
        "#,
    )
    .unwrap();
    let credential =
        Credential::new("4646464646464646464646464646464646464646464646464646464646464646");
    let err = EthPair::connect(&config, credential).await.unwrap_err();
    assert!(matches!(err, PairswapError::Config(_)));
}

// ── Views ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn balances_and_summary() {
    let chain = MockChain::new().with(|s| {
        s.balance = e18(3) / U256::from(2u64);
        s.token_balance = e18(20);
    });
    let pair = pair(&chain).await;
    assert_eq!(pair.balances().await.unwrap(), (dec("1.5"), dec("20")));
    let summary = pair.summary().await.unwrap();
    assert_eq!(summary["ETH"], "1.5");
    assert_eq!(summary["TKN"], "20");
    assert!(pair.has_funds().await.unwrap());
}

#[tokio::test]
async fn empty_account_has_no_funds() {
    let chain = MockChain::new();
    assert!(!pair(&chain).await.has_funds().await.unwrap());
}

#[tokio::test]
async fn prices_in_both_directions() {
    let chain = MockChain::new().with(|s| {
        s.quote_out = e18(2000);
        s.quote_in = e18(1) / U256::from(2000u64);
    });
    let pair = pair(&chain).await;
    assert_eq!(pair.price().await.unwrap(), dec("2000"));
    assert_eq!(pair.token_price().await.unwrap(), dec("0.0005"));
    assert_eq!(chain.read_calls(SEL_GET_AMOUNTS_IN), 1);
    assert!(chain.submitted().is_empty());
}

#[tokio::test]
async fn pair_address_comes_from_factory() {
    let chain = MockChain::new();
    assert_eq!(pair(&chain).await.pair_address().await.unwrap(), PAIR);
}

#[tokio::test]
async fn gas_price_uses_node_by_default_and_injected_strategy_otherwise() {
    struct BySpeed;

    #[async_trait]
    impl GasPriceStrategy for BySpeed {
        async fn gas_price(&self, _conn: &dyn ChainConnection, speed: GasSpeed) -> PairswapResult<u64> {
            Ok(match speed {
                GasSpeed::Fast => 80,
                GasSpeed::Medium => 40,
                GasSpeed::Slow => 20,
                GasSpeed::Glacial => 10,
            })
        }
    }

    let chain = MockChain::new();
    let pair = pair(&chain).await;
    assert_eq!(pair.suggest_gas_price(GasSpeed::Fast).await.unwrap(), 42_000_000_000);

    let pair = pair.with_gas_strategy(Arc::new(BySpeed));
    assert_eq!(pair.suggest_gas_price(GasSpeed::Slow).await.unwrap(), 20);
    assert_eq!(pair.suggest_gas_price(GasSpeed::Fast).await.unwrap(), 80);
}

// ── ETH → token ────────────────────────────────────────────────────────────

#[tokio::test]
async fn one_ether_with_ten_percent_slippage() {
    let chain = MockChain::new().with(|s| s.quote_out = e18(500));
    let settings = settings().with_max_slippage(dec("0.1")).unwrap();
    let pair = pair_with(&chain, settings).await;

    let before = pair.deadline();
    let tx_hash = pair.swap_asset_for_token(Decimal::ONE, TxOverrides::default()).await.unwrap();
    assert!(tx_hash.starts_with("0x"));

    let submitted = chain.submitted();
    assert_eq!(submitted.len(), 1);
    let tx = &submitted[0];
    assert_eq!(tx.to, ROUTER);
    assert_eq!(tx.value, e18(1));
    assert_eq!(tx.data[..4], SEL_SWAP_EXACT_ETH);
    assert_eq!(arg(&tx.data, 0), e18(450));
    assert_eq!(arg(&tx.data, 2), U256::from_be_slice(&address_word(&ACCOUNT)));
    assert!(arg(&tx.data, 3) >= U256::from(before));
    assert_eq!(path_element(&tx.data, 4, 0), WETH);
    assert_eq!(path_element(&tx.data, 4, 1), TOKEN);
    assert_eq!(tx.nonce, 7);
    assert_eq!(tx.gas, 250_000);
    assert_eq!(tx.gas_price, 100_000_000_000);
    assert_eq!(tx.chain_id, 1);
}

#[tokio::test]
async fn default_slippage_bounds_a_thousand_to_eight_hundred() {
    let chain = MockChain::new().with(|s| s.quote_out = U256::from(1000u64));
    let pair = pair(&chain).await;
    pair.swap_asset_for_token(dec("0.001"), TxOverrides::default()).await.unwrap();
    assert_eq!(arg(&chain.submitted()[0].data, 0), U256::from(800u64));
}

#[tokio::test]
async fn overrides_replace_defaults() {
    let chain = MockChain::new();
    let pair = pair(&chain).await;
    let overrides = TxOverrides {
        gas: Some(300_000),
        gas_price: Some(5),
        nonce: Some(99),
    };
    pair.swap_asset_for_token(Decimal::ONE, overrides).await.unwrap();
    let tx = &chain.submitted()[0];
    assert_eq!((tx.gas, tx.gas_price, tx.nonce), (300_000, 5, 99));
}

#[tokio::test]
async fn zero_amount_is_forwarded() {
    let chain = MockChain::new().with(|s| s.quote_out = U256::ZERO);
    let pair = pair(&chain).await;
    pair.swap_asset_for_token(Decimal::ZERO, TxOverrides::default()).await.unwrap();
    let tx = &chain.submitted()[0];
    assert_eq!(tx.value, U256::ZERO);
    assert_eq!(arg(&tx.data, 0), U256::ZERO);
}

#[tokio::test]
async fn negative_amount_fails_before_any_chain_access() {
    let chain = MockChain::new();
    let pair = pair(&chain).await;
    let err = pair
        .swap_asset_for_token(dec("-1"), TxOverrides::default())
        .await
        .unwrap_err();
    assert!(matches!(err.root(), PairswapError::InvalidAmount(_)));
    assert!(err.to_string().contains("swap of -1 ETH"));
    assert_eq!(chain.read_calls(SEL_GET_AMOUNTS_OUT), 0);
    assert!(chain.submitted().is_empty());
}

#[tokio::test]
async fn reverted_quote_is_a_quote_error_and_nothing_is_sent() {
    let chain = MockChain::new().with(|s| s.quotes_revert = true);
    let pair = pair(&chain).await;
    let err = pair.swap_asset_for_token(Decimal::ONE, TxOverrides::default()).await.unwrap_err();
    assert!(matches!(err.root(), PairswapError::Quote(_)));
    assert!(chain.submitted().is_empty());
}

// ── Token → ETH ────────────────────────────────────────────────────────────

#[tokio::test]
async fn already_approved_sends_only_the_swap() {
    let chain = MockChain::new().with(|s| {
        s.allowance = U256::MAX;
        s.quote_out = e18(1);
    });
    let pair = pair(&chain).await;
    pair.swap_token_for_asset(dec("10"), TxOverrides::default()).await.unwrap();

    assert_eq!(chain.selectors(), vec![SEL_SWAP_EXACT_TOKENS]);
    let tx = &chain.submitted()[0];
    assert_eq!(tx.value, U256::ZERO);
    assert_eq!(tx.nonce, 7);
    assert_eq!(arg(&tx.data, 0), e18(10));
    assert_eq!(arg(&tx.data, 1), e18(1) * U256::from(8u64) / U256::from(10u64));
    assert_eq!(path_element(&tx.data, 5, 0), TOKEN);
    assert_eq!(path_element(&tx.data, 5, 1), WETH);
    // the reverse quote is an output quote along [token, weth]
    assert_eq!(chain.read_calls(SEL_GET_AMOUNTS_OUT), 1);
    assert_eq!(chain.read_calls(SEL_GET_AMOUNTS_IN), 0);
}

#[tokio::test(start_paused = true)]
async fn insufficient_allowance_approves_once_and_waits_for_nonce() {
    let chain = MockChain::new().with(|s| s.nonce_lag = 3);
    let pair = pair(&chain).await;
    let started = tokio::time::Instant::now();
    pair.swap_token_for_asset(dec("10"), TxOverrides::default()).await.unwrap();

    assert_eq!(chain.selectors(), vec![SEL_APPROVE, SEL_SWAP_EXACT_TOKENS]);
    let submitted = chain.submitted();
    let approve = &submitted[0];
    assert_eq!(approve.to, TOKEN);
    assert_eq!(arg(&approve.data, 0), U256::from_be_slice(&address_word(&ROUTER)));
    assert_eq!(arg(&approve.data, 1), U256::MAX);
    assert_eq!(approve.nonce, 7);
    // the swap is built only once the count has moved past the approval
    assert_eq!(submitted[1].nonce, 8);
    // one read for the approval nonce, four polls, one for the swap nonce
    assert_eq!(chain.state.lock().count_reads, 6);
    assert!(started.elapsed() >= Duration::from_millis(1500));
    assert!(started.elapsed() < APPROVAL_GUARD);
}

#[tokio::test(start_paused = true)]
async fn explicit_nonce_is_advanced_past_the_approval() {
    let chain = MockChain::new().with(|s| s.nonce = 40);
    let pair = pair(&chain).await;
    let overrides = TxOverrides { nonce: Some(40), ..Default::default() };
    pair.swap_token_for_asset(dec("1"), overrides).await.unwrap();
    let nonces: Vec<u64> = chain.submitted().iter().map(|tx| tx.nonce).collect();
    assert_eq!(nonces, vec![40, 41]);
}

#[tokio::test(start_paused = true)]
async fn ensure_is_idempotent() {
    let chain = MockChain::new();
    let pair = pair(&chain).await;
    assert!(!pair.is_token_approved(None).await.unwrap());

    let first = pair.approve_token(None, TxOverrides::default()).await.unwrap();
    assert!(matches!(first, ApprovalOutcome::Approved { nonce: 7, nonce_visible: true, .. }));
    let second = pair.approve_token(None, TxOverrides::default()).await.unwrap();
    assert_eq!(second, ApprovalOutcome::AlreadyApproved);

    assert_eq!(chain.selectors(), vec![SEL_APPROVE]);
    assert!(pair.is_token_approved(None).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn explicit_approval_amount_is_granted_as_given() {
    let chain = MockChain::new();
    let pair = pair(&chain).await;
    pair.approve_token(Some(e18(5)), TxOverrides::default()).await.unwrap();
    assert_eq!(arg(&chain.submitted()[0].data, 1), e18(5));
    assert!(pair.is_token_approved(Some(e18(5))).await.unwrap());
    assert!(!pair.is_token_approved(Some(e18(6))).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn guard_elapses_when_nonce_never_moves() {
    let chain = MockChain::new().with(|s| s.nonce_lag = u32::MAX);
    let pair = pair(&chain).await;
    let started = tokio::time::Instant::now();

    let err = pair.swap_token_for_asset(dec("10"), TxOverrides::default()).await.unwrap_err();
    assert!(matches!(err.root(), PairswapError::ApprovalTimeout { .. }));
    assert!(err.is_unknown_outcome());
    assert!(started.elapsed() >= APPROVAL_GUARD);
    // the approval went out, the swap did not
    assert_eq!(chain.selectors(), vec![SEL_APPROVE]);
}

#[tokio::test(start_paused = true)]
async fn guard_elapse_on_explicit_approval_is_reported_not_raised() {
    let chain = MockChain::new().with(|s| s.nonce_lag = u32::MAX);
    let pair = pair(&chain).await;
    let outcome = pair.approve_token(None, TxOverrides::default()).await.unwrap();
    assert!(matches!(outcome, ApprovalOutcome::Approved { nonce_visible: false, .. }));
}

#[tokio::test(start_paused = true)]
async fn unmined_approval_times_out() {
    let chain = MockChain::new().with(|s| s.approval_mining = ApprovalMining::Never);
    let pair = pair(&chain).await;
    let err = pair.swap_token_for_asset(dec("10"), TxOverrides::default()).await.unwrap_err();
    match err.root() {
        PairswapError::ApprovalTimeout { symbol, timeout_secs, .. } => {
            assert_eq!(symbol, "TKN");
            assert_eq!(*timeout_secs, 3600);
        }
        other => panic!("expected an approval timeout, got {other:?}"),
    }
    assert_eq!(chain.selectors(), vec![SEL_APPROVE]);
}

#[tokio::test(start_paused = true)]
async fn reverted_approval_stops_the_swap() {
    let chain = MockChain::new().with(|s| s.approval_mining = ApprovalMining::Reverts);
    let pair = pair(&chain).await;
    let err = pair.swap_token_for_asset(dec("10"), TxOverrides::default()).await.unwrap_err();
    assert!(matches!(err.root(), PairswapError::Reverted { block_number: 100, .. }));
    assert!(err.to_string().contains("unswap of 10 TKN"));
    assert_eq!(chain.selectors(), vec![SEL_APPROVE]);
}

#[tokio::test]
async fn token_amounts_use_token_decimals() {
    let chain = MockChain::new().with(|s| {
        s.decimals = 6;
        s.allowance = U256::MAX;
    });
    let pair = pair(&chain).await;
    pair.swap_token_for_asset(dec("2.5"), TxOverrides::default()).await.unwrap();
    assert_eq!(arg(&chain.submitted()[0].data, 0), U256::from(2_500_000u64));
}

// ── Wait ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn wait_returns_the_receipt() {
    let chain = MockChain::new();
    let pair = pair(&chain).await;
    let tx_hash = pair.swap_asset_for_token(Decimal::ONE, TxOverrides::default()).await.unwrap();
    let receipt = pair.wait(&tx_hash, None).await.unwrap();
    assert!(receipt.success);
    assert_eq!(receipt.tx_hash, tx_hash);
}
