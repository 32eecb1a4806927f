// Pairswap: client-side engine for swapping ETH against an ERC-20 token
// through a Uniswap V2 router.
//
//   atoms  : constants and the error type, no I/O
//   config : TOML configuration and validated pair settings
//   engine : codecs, JSON-RPC client, signer and the `EthPair` orchestrator

pub mod atoms;
pub mod config;
pub mod engine;

pub use atoms::error::{PairswapError, PairswapResult};
pub use config::{credential_from_env, PairSettings, PairswapConfig, PRIVATE_KEY_ENV};
pub use engine::{
    Address, ApprovalOutcome, Credential, Direction, EthPair, GasSpeed, Receipt, TxHash,
    TxOverrides,
};
