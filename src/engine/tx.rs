// Pairswap Engine: Legacy Transaction Signing (EIP-155)
//
// The pair works with an explicit gas price, so transactions are legacy
// (type 0) with replay protection:
//   signing payload: RLP([nonce, gasPrice, gas, to, value, data, chainId, 0, 0])
//   signed:          RLP([nonce, gasPrice, gas, to, value, data, v, r, s])
//   v = recovery_id + chainId * 2 + 35

use std::fmt;

use k256::ecdsa::SigningKey;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::primitives::{hex_decode, keccak256, Address};
use super::rlp::{rlp_encode_bytes, rlp_encode_list, rlp_encode_u256, rlp_encode_u64, strip_leading_zeros};
use super::traits::Signer;
use super::types::UnsignedTx;
use crate::atoms::error::{PairswapError, PairswapResult};

// ── Credential ─────────────────────────────────────────────────────────────

/// Hex-encoded secp256k1 private key. Zeroed on drop, never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential(String);

impl Credential {
    pub fn new(private_key_hex: impl Into<String>) -> Self {
        Self(private_key_hex.into())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

// ── Signing payloads ───────────────────────────────────────────────────────

fn base_fields(tx: &UnsignedTx) -> Vec<Vec<u8>> {
    vec![
        rlp_encode_u64(tx.nonce),
        rlp_encode_u64(tx.gas_price),
        rlp_encode_u64(tx.gas),
        rlp_encode_bytes(tx.to.as_bytes()),
        rlp_encode_u256(tx.value),
        rlp_encode_bytes(&tx.data),
    ]
}

/// RLP payload whose keccak256 is signed.
pub(crate) fn signing_payload(tx: &UnsignedTx) -> Vec<u8> {
    let mut items = base_fields(tx);
    items.push(rlp_encode_u64(tx.chain_id));
    items.push(rlp_encode_u64(0));
    items.push(rlp_encode_u64(0));
    rlp_encode_list(&items)
}

/// Sign a legacy EIP-155 transaction and return the raw serialized bytes.
pub(crate) fn sign_legacy_transaction(
    tx: &UnsignedTx,
    private_key: &SigningKey,
) -> PairswapResult<Vec<u8>> {
    let sighash = keccak256(&signing_payload(tx));

    let (signature, recovery_id) = private_key
        .sign_prehash_recoverable(&sighash)
        .map_err(|e| PairswapError::Signing(e.to_string()))?;

    let sig_bytes = signature.to_bytes();
    let r = &sig_bytes[..32];
    let s = &sig_bytes[32..];
    let v = recovery_id.to_byte() as u64 + tx.chain_id * 2 + 35;

    let mut items = base_fields(tx);
    items.push(rlp_encode_u64(v));
    items.push(rlp_encode_bytes(&strip_leading_zeros(r)));
    items.push(rlp_encode_bytes(&strip_leading_zeros(s)));
    Ok(rlp_encode_list(&items))
}

// ── LocalSigner ────────────────────────────────────────────────────────────

/// Signs with a private key held in memory.
pub struct LocalSigner {
    key: SigningKey,
    address: Address,
}

impl LocalSigner {
    pub fn from_credential(credential: &Credential) -> PairswapResult<Self> {
        let mut pk_bytes = hex_decode(&credential.0)
            .map_err(|_| PairswapError::config("Private key is not valid hex"))?;
        let key = SigningKey::from_slice(&pk_bytes)
            .map_err(|_| PairswapError::config("Private key is not a valid secp256k1 scalar"));
        pk_bytes.zeroize();
        let key = key?;
        let pubkey = key.verifying_key().to_encoded_point(false);
        let address = Address::from_uncompressed_pubkey(pubkey.as_bytes())?;
        Ok(Self { key, address })
    }

    /// Load the credential and check it controls `expected`.
    pub fn for_account(credential: &Credential, expected: Address) -> PairswapResult<Self> {
        let signer = Self::from_credential(credential)?;
        if signer.address != expected {
            return Err(PairswapError::config(format!(
                "Private key controls {}, not the configured account {}",
                signer.address, expected
            )));
        }
        Ok(signer)
    }
}

impl Signer for LocalSigner {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_transaction(&self, tx: &UnsignedTx) -> PairswapResult<Vec<u8>> {
        sign_legacy_transaction(tx, &self.key)
    }
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner").field("address", &self.address).finish()
    }
}
