// Pairswap Configuration
//
// TOML file layout:
//
//   [account]
//   address  = "0x…"              # checksummed or all-lowercase
//   provider = "https://…"        # or wss://… or /path/to/geth.ipc
//
//   [pair]
//   token = "0x…"
//   max_slippage = 0.2            # fraction in [0, 1)
//   transaction_timeout_secs = 300
//   gas = 250000
//   gas_price = 100000000000      # wei
//
//   [contracts]                   # optional, Uniswap V2 mainnet by default
//   router  = "0x…"
//   factory = "0x…"
//
// The signing key never lives in the file. It comes from PAIRSWAP_PRIVATE_KEY.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::atoms::constants::{
    DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE_WEI, DEFAULT_MAX_SLIPPAGE_MILLIS,
    DEFAULT_TRANSACTION_TIMEOUT_SECS, UNISWAP_V2_FACTORY, UNISWAP_V2_ROUTER_02,
};
use crate::atoms::error::{PairswapError, PairswapResult};
use crate::engine::primitives::Address;
use crate::engine::quote::Slippage;
use crate::engine::tx::Credential;

/// Environment variable holding the hex-encoded private key.
pub const PRIVATE_KEY_ENV: &str = "PAIRSWAP_PRIVATE_KEY";

// ── File model ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairswapConfig {
    pub account: AccountSection,
    pub pair: PairSection,
    #[serde(default)]
    pub contracts: ContractsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSection {
    pub address: String,
    pub provider: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSection {
    pub token: String,
    #[serde(default = "default_max_slippage")]
    pub max_slippage: Decimal,
    #[serde(default = "default_transaction_timeout_secs")]
    pub transaction_timeout_secs: u64,
    #[serde(default = "default_gas")]
    pub gas: u64,
    #[serde(default = "default_gas_price")]
    pub gas_price: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractsSection {
    #[serde(default = "default_router")]
    pub router: String,
    #[serde(default = "default_factory")]
    pub factory: String,
}

impl Default for ContractsSection {
    fn default() -> Self {
        Self {
            router: default_router(),
            factory: default_factory(),
        }
    }
}

fn default_max_slippage() -> Decimal {
    Decimal::new(DEFAULT_MAX_SLIPPAGE_MILLIS, 3)
}
fn default_transaction_timeout_secs() -> u64 {
    DEFAULT_TRANSACTION_TIMEOUT_SECS
}
fn default_gas() -> u64 {
    DEFAULT_GAS_LIMIT
}
fn default_gas_price() -> u64 {
    DEFAULT_GAS_PRICE_WEI
}
fn default_router() -> String {
    UNISWAP_V2_ROUTER_02.to_string()
}
fn default_factory() -> String {
    UNISWAP_V2_FACTORY.to_string()
}

fn parse_address(field: &str, value: &str) -> PairswapResult<Address> {
    Address::from_str(value.trim())
        .map_err(|e| PairswapError::config(format!("[{}] invalid address '{}': {}", field, value, e)))
}

impl PairswapConfig {
    pub fn from_toml_str(content: &str) -> PairswapResult<Self> {
        toml::from_str(content).map_err(|e| PairswapError::config(format!("TOML parse error: {e}")))
    }

    pub fn load(path: impl AsRef<Path>) -> PairswapResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PairswapError::config(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Validate every field and produce the typed settings a pair is built from.
    pub fn settings(&self) -> PairswapResult<PairSettings> {
        Ok(PairSettings {
            account: parse_address("account.address", &self.account.address)?,
            token: parse_address("pair.token", &self.pair.token)?,
            router: parse_address("contracts.router", &self.contracts.router)?,
            factory: parse_address("contracts.factory", &self.contracts.factory)?,
            max_slippage: Slippage::new(self.pair.max_slippage)?,
            transaction_timeout: Duration::from_secs(self.pair.transaction_timeout_secs),
            gas: self.pair.gas,
            gas_price: self.pair.gas_price,
        })
    }
}

// ── Typed settings ─────────────────────────────────────────────────────────

/// Validated, immutable pair configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSettings {
    pub account: Address,
    pub token: Address,
    pub router: Address,
    pub factory: Address,
    pub max_slippage: Slippage,
    pub transaction_timeout: Duration,
    pub gas: u64,
    pub gas_price: u64,
}

impl PairSettings {
    /// Settings for `account` trading `token` with every other value defaulted.
    pub fn new(account: Address, token: Address) -> PairswapResult<Self> {
        Ok(Self {
            account,
            token,
            router: parse_address("contracts.router", UNISWAP_V2_ROUTER_02)?,
            factory: parse_address("contracts.factory", UNISWAP_V2_FACTORY)?,
            max_slippage: Slippage::new(default_max_slippage())?,
            transaction_timeout: Duration::from_secs(DEFAULT_TRANSACTION_TIMEOUT_SECS),
            gas: DEFAULT_GAS_LIMIT,
            gas_price: DEFAULT_GAS_PRICE_WEI,
        })
    }

    pub fn with_max_slippage(mut self, fraction: Decimal) -> PairswapResult<Self> {
        self.max_slippage = Slippage::new(fraction)?;
        Ok(self)
    }
}

/// Read the signing credential from `PAIRSWAP_PRIVATE_KEY`.
pub fn credential_from_env() -> PairswapResult<Credential> {
    match std::env::var(PRIVATE_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(Credential::new(key.trim())),
        _ => Err(PairswapError::config(format!("{} is not set", PRIVATE_KEY_ENV))),
    }
}
