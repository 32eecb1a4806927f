// Pairswap Engine: RLP Encoding
// Recursive-length prefix encoding as used in Ethereum transactions.

use alloy_primitives::U256;

/// RLP-encode a single byte string
pub(crate) fn rlp_encode_bytes(data: &[u8]) -> Vec<u8> {
    if data.len() == 1 && data[0] < 0x80 {
        return data.to_vec();
    }
    let mut encoded = length_prefix(0x80, 0xb7, data.len());
    encoded.extend_from_slice(data);
    encoded
}

/// RLP-encode a list of already-RLP-encoded items
pub(crate) fn rlp_encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload_len: usize = items.iter().map(Vec::len).sum();
    let mut encoded = length_prefix(0xc0, 0xf7, payload_len);
    for item in items {
        encoded.extend_from_slice(item);
    }
    encoded
}

fn length_prefix(short_base: u8, long_base: u8, len: usize) -> Vec<u8> {
    if len <= 55 {
        vec![short_base + len as u8]
    } else {
        let len_bytes = strip_leading_zeros(&len.to_be_bytes());
        let mut prefix = vec![long_base + len_bytes.len() as u8];
        prefix.extend_from_slice(&len_bytes);
        prefix
    }
}

/// Strip leading zero bytes (RLP integers and signature r, s are minimal big-endian)
pub(crate) fn strip_leading_zeros(data: &[u8]) -> Vec<u8> {
    match data.iter().position(|&b| b != 0) {
        Some(pos) => data[pos..].to_vec(),
        None => vec![],
    }
}

/// RLP-encode an unsigned integer (zero is the empty string)
pub(crate) fn rlp_encode_u64(val: u64) -> Vec<u8> {
    rlp_encode_bytes(&strip_leading_zeros(&val.to_be_bytes()))
}

/// RLP-encode a U256 quantity
pub(crate) fn rlp_encode_u256(val: U256) -> Vec<u8> {
    rlp_encode_bytes(&strip_leading_zeros(&val.to_be_bytes::<32>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_low_byte_is_its_own_encoding() {
        assert_eq!(rlp_encode_bytes(&[0x7f]), vec![0x7f]);
        assert_eq!(rlp_encode_bytes(&[0x80]), vec![0x81, 0x80]);
    }

    #[test]
    fn empty_values() {
        assert_eq!(rlp_encode_bytes(&[]), vec![0x80]);
        assert_eq!(rlp_encode_u64(0), vec![0x80]);
        assert_eq!(rlp_encode_u256(U256::ZERO), vec![0x80]);
        assert_eq!(rlp_encode_list(&[]), vec![0xc0]);
    }

    #[test]
    fn dog_and_cat_dog() {
        let dog = rlp_encode_bytes(b"dog");
        assert_eq!(dog, vec![0x83, b'd', b'o', b'g']);
        let cat = rlp_encode_bytes(b"cat");
        assert_eq!(
            rlp_encode_list(&[cat, dog]),
            vec![0xc8, 0x83, b'c', b'a', b't', 0x83, b'd', b'o', b'g']
        );
    }

    #[test]
    fn long_string_prefix() {
        let data = vec![b'a'; 56];
        let encoded = rlp_encode_bytes(&data);
        assert_eq!(&encoded[..2], &[0xb8, 56]);
        assert_eq!(encoded.len(), 58);
    }

    #[test]
    fn integers_are_minimal() {
        assert_eq!(rlp_encode_u64(1024), vec![0x82, 0x04, 0x00]);
        assert_eq!(rlp_encode_u256(U256::from(15u64)), vec![0x0f]);
    }
}
