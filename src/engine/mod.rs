// Pairswap Engine: ETH/ERC-20 swaps through a Uniswap V2 router
//
// Submodules:
//   primitives : keccak256, hex, quantities, checksummed addresses
//   abi        : calldata encoders / return decoders for the fixed method set
//   rlp        : RLP encoding for legacy transaction serialisation
//   tx         : credential handling + EIP-155 signing (`LocalSigner`)
//   rpc        : JSON-RPC client over HTTPS / WSS / IPC (`RpcClient`)
//   traits     : collaborator seams (connection, signer, broadcaster, waiter, gas)
//   types      : quotes, transaction parameters, receipts, overrides
//   units      : decimal amounts <-> base units
//   quote      : router quotes and slippage bounds
//   submit     : transaction builder / submitter
//   allowance  : router allowance state machine
//   pair       : the swap orchestrator (`EthPair`)

pub(crate) mod abi;
pub mod primitives;
pub(crate) mod rlp;
pub mod rpc;
pub mod traits;
pub mod tx;
pub mod types;
pub mod units;
pub mod quote;
pub mod submit;
pub mod allowance;
mod pair;

pub use allowance::{AllowanceManager, AllowanceState, ApprovalOutcome, MAX_APPROVAL};
pub use pair::EthPair;
pub use primitives::Address;
pub use quote::{QuoteService, Slippage};
pub use rpc::{Endpoint, RpcClient, Transport};
pub use submit::{deadline_at, TxSubmitter};
pub use traits::{Broadcaster, ChainConnection, GasPriceStrategy, NodeGasPrice, ReceiptWaiter, Signer};
pub use tx::{Credential, LocalSigner};
pub use types::{
    ContractCall, Direction, GasSpeed, Quote, Receipt, TokenMetadata, TxHash, TxOverrides, TxParams,
    UnsignedTx,
};
pub use units::{ether_to_wei, from_base_units, to_base_units, wei_to_ether};
