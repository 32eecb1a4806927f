// ── Pairswap Atoms: Error Types ────────────────────────────────────────────
// Single canonical error enum for the swap engine, built with `thiserror`.
//
// Design rules:
//   • Variants are coarse-grained by failure domain (config, transport, chain…).
//   • The `#[from]` attribute wires std/external error conversions automatically.
//   • Timeouts are distinct variants: a timed-out transaction may still be mined.
//   • No variant carries secret material (private keys) in its message.

use rust_decimal::Decimal;
use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PairswapError {
    /// Invalid construction input: endpoint scheme, address, slippage, credential.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The construction-time connection check failed.
    #[error("Connection failed to provider '{endpoint}': {message}")]
    Connectivity { endpoint: String, message: String },

    /// JSON-RPC level error object returned by the node.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// HTTP transport failure (reqwest layer).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// WebSocket transport failure.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// IPC socket / filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed ABI return data or hex payload.
    #[error("ABI error: {0}")]
    Abi(String),

    /// Amount that cannot be expressed in base units (or back).
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Transaction signing failure.
    #[error("Signing error: {0}")]
    Signing(String),

    /// A router read call reverted or returned nothing usable (e.g. no liquidity).
    #[error("Quote error: {0}")]
    Quote(String),

    /// The approval was not confirmed inside the guard window.
    /// The approval may still land later: re-check the allowance before retrying.
    #[error("Approval of {amount} {symbol} not confirmed within {timeout_secs}s (tx {tx_hash})")]
    ApprovalTimeout {
        amount: String,
        symbol: String,
        tx_hash: String,
        timeout_secs: u64,
    },

    /// Receipt not available before the caller's timeout. Outcome unknown, not failed.
    #[error("Transaction {tx_hash} not mined within {timeout_secs}s; outcome unknown")]
    ConfirmationTimeout { tx_hash: String, timeout_secs: u64 },

    /// A mined transaction whose receipt reports failure.
    #[error("Transaction {tx_hash} reverted in block {block_number}")]
    Reverted { tx_hash: String, block_number: u64 },

    /// Any of the above, annotated with the operation that produced it.
    #[error("{operation} of {amount} {symbol} failed: {source}")]
    Operation {
        operation: &'static str,
        amount: Decimal,
        symbol: String,
        #[source]
        source: Box<PairswapError>,
    },
}

// ── Convenience constructors ───────────────────────────────────────────────

impl PairswapError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an ABI decoding error.
    pub fn abi(message: impl Into<String>) -> Self {
        Self::Abi(message.into())
    }

    /// Wrap an error with the operation, amount and symbol it happened under.
    pub fn during(self, operation: &'static str, amount: Decimal, symbol: &str) -> Self {
        Self::Operation {
            operation,
            amount,
            symbol: symbol.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through `Operation` wrappers.
    pub fn root(&self) -> &PairswapError {
        match self {
            Self::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// True for outcomes where the transaction may still be mined later.
    pub fn is_unknown_outcome(&self) -> bool {
        matches!(
            self.root(),
            Self::ConfirmationTimeout { .. } | Self::ApprovalTimeout { .. }
        )
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All engine operations return this type.
pub type PairswapResult<T> = Result<T, PairswapError>;
