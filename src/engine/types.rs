// Pairswap Engine: Shared Types
// Per-operation values (quotes, transaction parameters, receipts) and the
// token metadata cached for the lifetime of a pair.

use alloy_primitives::U256;
use serde::Serialize;

use super::primitives::Address;

/// Transaction hash as returned by `eth_sendRawTransaction` (0x-prefixed hex).
pub type TxHash = String;

/// Swap direction along the two-hop path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Native asset in, token out: path `[weth, token]`.
    AssetToToken,
    /// Token in, native asset out: path `[token, weth]`.
    TokenToAsset,
}

impl Direction {
    pub fn path(self, weth: Address, token: Address) -> [Address; 2] {
        match self {
            Direction::AssetToToken => [weth, token],
            Direction::TokenToAsset => [token, weth],
        }
    }
}

/// A fresh router quote. Never cached: reserves move every block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub direction: Direction,
    pub amount_in: U256,
    pub amount_out: U256,
}

/// Token symbol and decimals, read once when the pair is constructed.
/// If the token contract is upgraded afterwards these go stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenMetadata {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// Optional per-call overrides of the pair's gas defaults and the chain nonce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxOverrides {
    pub gas: Option<u64>,
    pub gas_price: Option<u64>,
    pub nonce: Option<u64>,
}

impl TxOverrides {
    /// Same overrides with the nonce advanced past one consumed transaction.
    pub(crate) fn after_consumed_nonce(self) -> Self {
        Self {
            nonce: self.nonce.map(|n| n + 1),
            ..self
        }
    }
}

/// Fully resolved transaction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxParams {
    pub from: Address,
    pub value: U256,
    pub gas: u64,
    pub gas_price: u64,
    pub nonce: u64,
}

/// A contract call to submit: target plus ABI-encoded calldata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub to: Address,
    pub data: Vec<u8>,
    /// Method name, for logs.
    pub method: &'static str,
}

/// Legacy (EIP-155) transaction ready for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTx {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price: u64,
    pub gas: u64,
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
}

impl UnsignedTx {
    pub fn new(chain_id: u64, call: &ContractCall, params: &TxParams) -> Self {
        Self {
            chain_id,
            nonce: params.nonce,
            gas_price: params.gas_price,
            gas: params.gas,
            to: call.to,
            value: params.value,
            data: call.data.clone(),
        }
    }
}

/// The parts of a transaction receipt the engine inspects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub gas_used: u64,
    /// `status == 0x1`
    pub success: bool,
}

impl Receipt {
    /// Turn a failed status into `PairswapError::Reverted`.
    pub fn ensure_success(self) -> crate::atoms::error::PairswapResult<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(crate::atoms::error::PairswapError::Reverted {
                tx_hash: self.tx_hash,
                block_number: self.block_number,
            })
        }
    }
}

/// Transaction priority for gas-price suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GasSpeed {
    /// ~1 minute
    Fast,
    /// ~5 minutes
    Medium,
    /// ~1 hour
    Slow,
    /// ~24 hours
    Glacial,
}

impl std::str::FromStr for GasSpeed {
    type Err = crate::atoms::error::PairswapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(GasSpeed::Fast),
            "medium" => Ok(GasSpeed::Medium),
            "slow" => Ok(GasSpeed::Slow),
            "glacial" => Ok(GasSpeed::Glacial),
            other => Err(crate::atoms::error::PairswapError::config(format!(
                "Unsupported gas strategy '{}', pick from: fast, medium, slow, glacial",
                other
            ))),
        }
    }
}
