// Pairswap Engine: Ethereum Primitives
// Core hex, keccak, address, and quantity utilities.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::atoms::error::{PairswapError, PairswapResult};

/// Keccak-256 hash (Ethereum's hash function)
pub(crate) fn keccak256(data: &[u8]) -> [u8; 32] {
    use tiny_keccak::{Hasher, Keccak};
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Hex-encode bytes with 0x prefix
pub(crate) fn hex_encode(data: &[u8]) -> String {
    format!("0x{}", data.iter().map(|b| format!("{:02x}", b)).collect::<String>())
}

/// Hex-decode a 0x-prefixed string.
/// Handles minimal hex quantities (e.g. "0x0", "0x1a3") by left-padding to even length.
pub(crate) fn hex_decode(s: &str) -> PairswapResult<Vec<u8>> {
    let digits = s.strip_prefix("0x").unwrap_or(s).as_bytes();
    if !digits.is_ascii() {
        return Err(PairswapError::abi(format!("Hex decode '{}': non-ASCII input", s)));
    }
    let nibble = |c: u8| {
        (c as char)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| PairswapError::abi(format!("Hex decode '{}': invalid digit '{}'", s, c as char)))
    };
    let (head, rest) = if digits.len() % 2 != 0 {
        (Some(nibble(digits[0])?), &digits[1..])
    } else {
        (None, digits)
    };
    let mut out = Vec::with_capacity(rest.len() / 2 + 1);
    out.extend(head);
    for pair in rest.chunks_exact(2) {
        out.push(nibble(pair[0])? << 4 | nibble(pair[1])?);
    }
    Ok(out)
}

/// Parse an RPC quantity ("0x1a") into a u64
pub(crate) fn parse_quantity_u64(s: &str) -> PairswapResult<u64> {
    u64::from_str_radix(s.strip_prefix("0x").unwrap_or(s), 16)
        .map_err(|e| PairswapError::abi(format!("Parse quantity '{}': {}", s, e)))
}

/// Parse an RPC quantity into a U256
pub(crate) fn parse_quantity_u256(s: &str) -> PairswapResult<U256> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| PairswapError::abi(format!("Parse quantity '{}': {}", s, e)))
}

// ── Address ────────────────────────────────────────────────────────────────

/// A 20-byte account or contract address. Displays EIP-55 checksummed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    /// Derive the address of an uncompressed secp256k1 public key (0x04 || x || y).
    pub fn from_uncompressed_pubkey(pubkey: &[u8]) -> PairswapResult<Self> {
        if pubkey.len() != 65 || pubkey[0] != 0x04 {
            return Err(PairswapError::Signing(format!(
                "Expected 65-byte uncompressed public key, got {} bytes",
                pubkey.len()
            )));
        }
        let hash = keccak256(&pubkey[1..]);
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&hash[12..]);
        Ok(Address(arr))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// EIP-55 checksummed form
    pub fn to_checksum(&self) -> String {
        alloy_primitives::Address::from(self.0).to_checksum(None)
    }
}

impl FromStr for Address {
    type Err = PairswapError;

    /// Accepts any casing; a mixed-case input must carry a valid EIP-55 checksum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix("0x").ok_or_else(|| {
            PairswapError::config(format!("Address '{}' is missing the 0x prefix", s))
        })?;
        if !digits.is_ascii() {
            return Err(PairswapError::config(format!("Address '{}' is not valid hex", s)));
        }
        if digits.len() != 40 {
            return Err(PairswapError::config(format!(
                "Invalid address length: {} hex digits (expected 40). Address: '{}'",
                digits.len(),
                s
            )));
        }
        let parsed = alloy_primitives::Address::from_str(digits)
            .map_err(|_| PairswapError::config(format!("Address '{}' is not valid hex", s)))?;
        let mut arr = [0u8; 20];
        arr.copy_from_slice(parsed.as_slice());
        let address = Address(arr);

        let mixed_case = digits.chars().any(|c| c.is_ascii_lowercase())
            && digits.chars().any(|c| c.is_ascii_uppercase());
        if mixed_case && address.to_checksum() != s {
            return Err(PairswapError::config(format!(
                "Address '{}' has an invalid EIP-55 checksum",
                s
            )));
        }
        Ok(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
