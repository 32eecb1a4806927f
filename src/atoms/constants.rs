// ── Pairswap Atoms: Constants ──────────────────────────────────────────────
// Contract addresses, configuration defaults, and fixed timing parameters.

use std::time::Duration;

/// Uniswap V2 contract addresses (Ethereum mainnet)
pub const UNISWAP_V2_FACTORY: &str = "0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f";
pub const UNISWAP_V2_ROUTER_02: &str = "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D";

/// Native asset decimals (wei per ether = 10^18)
pub const ETHER_DECIMALS: u8 = 18;

/// Default maximum slippage, as a fraction in thousandths (0.2)
pub const DEFAULT_MAX_SLIPPAGE_MILLIS: i64 = 200;
/// Default swap deadline offset
pub const DEFAULT_TRANSACTION_TIMEOUT_SECS: u64 = 300;
/// Default gas limit for router and approval calls
pub const DEFAULT_GAS_LIMIT: u64 = 250_000;
/// Default gas price (100 gwei)
pub const DEFAULT_GAS_PRICE_WEI: u64 = 100_000_000_000;

/// Guard window for an approval: receipt wait plus nonce-visibility poll.
pub const APPROVAL_GUARD: Duration = Duration::from_secs(3600);
/// Interval between transaction-count reads after an approval is mined.
pub const NONCE_POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Interval between `eth_getTransactionReceipt` polls.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Default timeout for a caller's explicit `wait`.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(3600);
/// Per-request timeout for the HTTP transport.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
