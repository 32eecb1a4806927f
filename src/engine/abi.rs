// Pairswap Engine: ABI Encoding
// EVM ABI encoding for the Uniswap V2 router / factory and ERC-20 calls,
// plus decoders for their return values.

use alloy_primitives::U256;

use super::primitives::{keccak256, Address};
use crate::atoms::error::{PairswapError, PairswapResult};

/// Compute 4-byte function selector from signature
pub(crate) fn function_selector(sig: &str) -> [u8; 4] {
    let hash = keccak256(sig.as_bytes());
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&hash[..4]);
    sel
}

/// ABI-encode an address (left-padded to 32 bytes)
pub(crate) fn abi_encode_address(addr: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(addr.as_bytes());
    word
}

/// ABI-encode a uint256
pub(crate) fn abi_encode_uint256(val: U256) -> [u8; 32] {
    val.to_be_bytes::<32>()
}

fn abi_encode_usize(val: usize) -> [u8; 32] {
    abi_encode_uint256(U256::from(val))
}

/// Tail of a dynamic `address[]`: length word followed by one word per element
fn abi_encode_address_array(items: &[Address]) -> Vec<u8> {
    let mut tail = Vec::with_capacity(32 * (items.len() + 1));
    tail.extend_from_slice(&abi_encode_usize(items.len()));
    for item in items {
        tail.extend_from_slice(&abi_encode_address(item));
    }
    tail
}

fn call_with_words(sig: &str, words: &[[u8; 32]]) -> Vec<u8> {
    let mut data = function_selector(sig).to_vec();
    for word in words {
        data.extend_from_slice(word);
    }
    data
}

// ── Router (IUniswapV2Router02) ────────────────────────────────────────────

/// Encode router WETH()
pub(crate) fn encode_weth() -> Vec<u8> {
    function_selector("WETH()").to_vec()
}

/// Encode router getAmountsOut(uint256 amountIn, address[] path)
pub(crate) fn encode_get_amounts_out(amount_in: U256, path: &[Address]) -> Vec<u8> {
    let mut data = call_with_words(
        "getAmountsOut(uint256,address[])",
        &[abi_encode_uint256(amount_in), abi_encode_usize(2 * 32)],
    );
    data.extend(abi_encode_address_array(path));
    data
}

/// Encode router getAmountsIn(uint256 amountOut, address[] path)
pub(crate) fn encode_get_amounts_in(amount_out: U256, path: &[Address]) -> Vec<u8> {
    let mut data = call_with_words(
        "getAmountsIn(uint256,address[])",
        &[abi_encode_uint256(amount_out), abi_encode_usize(2 * 32)],
    );
    data.extend(abi_encode_address_array(path));
    data
}

/// Encode router swapExactETHForTokens(uint256 amountOutMin, address[] path, address to, uint256 deadline)
pub(crate) fn encode_swap_exact_eth_for_tokens(
    amount_out_min: U256,
    path: &[Address],
    to: &Address,
    deadline: u64,
) -> Vec<u8> {
    let mut data = call_with_words(
        "swapExactETHForTokens(uint256,address[],address,uint256)",
        &[
            abi_encode_uint256(amount_out_min),
            abi_encode_usize(4 * 32), // offset to path
            abi_encode_address(to),
            abi_encode_uint256(U256::from(deadline)),
        ],
    );
    data.extend(abi_encode_address_array(path));
    data
}

/// Encode router swapExactTokensForETH(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline)
pub(crate) fn encode_swap_exact_tokens_for_eth(
    amount_in: U256,
    amount_out_min: U256,
    path: &[Address],
    to: &Address,
    deadline: u64,
) -> Vec<u8> {
    let mut data = call_with_words(
        "swapExactTokensForETH(uint256,uint256,address[],address,uint256)",
        &[
            abi_encode_uint256(amount_in),
            abi_encode_uint256(amount_out_min),
            abi_encode_usize(5 * 32), // offset to path
            abi_encode_address(to),
            abi_encode_uint256(U256::from(deadline)),
        ],
    );
    data.extend(abi_encode_address_array(path));
    data
}

// ── Factory (IUniswapV2Factory) ────────────────────────────────────────────

/// Encode factory getPair(address tokenA, address tokenB)
pub(crate) fn encode_get_pair(token_a: &Address, token_b: &Address) -> Vec<u8> {
    call_with_words(
        "getPair(address,address)",
        &[abi_encode_address(token_a), abi_encode_address(token_b)],
    )
}

// ── ERC-20 ─────────────────────────────────────────────────────────────────

/// Encode ERC-20 balanceOf(address)
pub(crate) fn encode_balance_of(owner: &Address) -> Vec<u8> {
    call_with_words("balanceOf(address)", &[abi_encode_address(owner)])
}

/// Encode ERC-20 approve(address, uint256)
pub(crate) fn encode_approve(spender: &Address, amount: U256) -> Vec<u8> {
    call_with_words(
        "approve(address,uint256)",
        &[abi_encode_address(spender), abi_encode_uint256(amount)],
    )
}

/// Encode ERC-20 allowance(owner, spender)
pub(crate) fn encode_allowance(owner: &Address, spender: &Address) -> Vec<u8> {
    call_with_words(
        "allowance(address,address)",
        &[abi_encode_address(owner), abi_encode_address(spender)],
    )
}

/// Encode ERC-20 symbol()
pub(crate) fn encode_symbol() -> Vec<u8> {
    function_selector("symbol()").to_vec()
}

/// Encode ERC-20 decimals()
pub(crate) fn encode_decimals() -> Vec<u8> {
    function_selector("decimals()").to_vec()
}

// ── Decoding ───────────────────────────────────────────────────────────────

fn word(data: &[u8], index: usize) -> PairswapResult<&[u8]> {
    let range = index
        .checked_mul(32)
        .and_then(|start| Some(start..start.checked_add(32)?));
    range.and_then(|r| data.get(r)).ok_or_else(|| {
        PairswapError::abi(format!(
            "Return data too short: {} bytes, need word {}",
            data.len(),
            index
        ))
    })
}

fn word_as_usize(data: &[u8], index: usize) -> PairswapResult<usize> {
    let value = decode_uint256(data, index)?;
    usize::try_from(value).map_err(|_| PairswapError::abi(format!("Offset {} out of range", value)))
}

/// Decode the uint256 at word `index`
pub(crate) fn decode_uint256(data: &[u8], index: usize) -> PairswapResult<U256> {
    let w = word(data, index)?;
    Ok(U256::from_be_slice(w))
}

/// Decode a uint8 return value (e.g. `decimals()`)
pub(crate) fn decode_uint8(data: &[u8]) -> PairswapResult<u8> {
    let value = decode_uint256(data, 0)?;
    u8::try_from(value).map_err(|_| PairswapError::abi(format!("Value {} does not fit uint8", value)))
}

/// Decode an address return value (e.g. `WETH()`, `getPair`)
pub(crate) fn decode_address(data: &[u8]) -> PairswapResult<Address> {
    let w = word(data, 0)?;
    if w[..12].iter().any(|&b| b != 0) {
        return Err(PairswapError::abi("Address word has non-zero high bytes"));
    }
    let mut arr = [0u8; 20];
    arr.copy_from_slice(&w[12..]);
    Ok(Address(arr))
}

/// Decode a single dynamic `uint256[]` return value (e.g. `getAmountsOut`)
pub(crate) fn decode_uint256_array(data: &[u8]) -> PairswapResult<Vec<U256>> {
    let offset = word_as_usize(data, 0)?;
    if offset % 32 != 0 {
        return Err(PairswapError::abi(format!("Unaligned array offset {}", offset)));
    }
    let base = offset / 32;
    let len = word_as_usize(data, base)?;
    (0..len).map(|i| decode_uint256(data, base + 1 + i)).collect()
}

/// Decode an ABI-encoded string (dynamic type at offset 0).
/// Falls back to bytes32 for tokens that return a fixed-size symbol.
pub(crate) fn decode_abi_string(bytes: &[u8]) -> PairswapResult<String> {
    let bytes32_fallback = |raw: &[u8]| {
        let trimmed: Vec<u8> = raw.iter().copied().filter(|&b| b != 0).collect();
        String::from_utf8(trimmed).map_err(|_| PairswapError::abi("Cannot decode string"))
    };

    if bytes.len() < 64 {
        return bytes32_fallback(bytes);
    }
    let offset = word_as_usize(bytes, 0)?;
    let data_start = offset
        .checked_add(32)
        .ok_or_else(|| PairswapError::abi(format!("String offset {} out of range", offset)))?;
    if data_start > bytes.len() {
        return bytes32_fallback(&bytes[..32]);
    }

    let len_bytes = &bytes[offset..data_start];
    let len = usize::try_from(U256::from_be_slice(len_bytes))
        .map_err(|_| PairswapError::abi("String length out of range"))?;

    let data_end = data_start
        .checked_add(len)
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| PairswapError::abi("String data exceeds response"))?;

    String::from_utf8(bytes[data_start..data_end].to_vec())
        .map_err(|_| PairswapError::abi("Invalid UTF-8 in string"))
}
