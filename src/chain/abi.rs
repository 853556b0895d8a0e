//! Minimal ABI codec for the fixed set of view calls the monitor issues.
//!
//! Every argument this tool ever passes is a single static 32-byte word
//! (`address`, `uint256`, `bytes32`), and every return value is either a
//! single word or a dynamic `string`, so a full ABI implementation is not
//! carried. Calldata is the 4-byte keccak selector of the signature followed
//! by the argument words.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};

use crate::chain::errors::ChainError;

/// Selector of the canonical `Error(string)` revert payload.
const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// First four bytes of keccak-256 of the function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Calldata for a no-argument call.
pub fn encode_call0(signature: &str) -> Bytes {
    Bytes::from(selector(signature).to_vec())
}

/// Calldata for a call taking pre-encoded 32-byte argument words.
pub fn encode_call(signature: &str, args: &[B256]) -> Bytes {
    let mut data = Vec::with_capacity(4 + 32 * args.len());
    data.extend_from_slice(&selector(signature));
    for arg in args {
        data.extend_from_slice(arg.as_slice());
    }
    Bytes::from(data)
}

/// An `address` argument, left-padded to a word.
pub fn word_from_address(address: Address) -> B256 {
    address.into_word()
}

/// A `uint256` argument as a big-endian word.
pub fn word_from_uint(value: U256) -> B256 {
    B256::from(value.to_be_bytes::<32>())
}

fn first_word(data: &[u8]) -> Result<&[u8], ChainError> {
    data.get(..32).ok_or_else(|| {
        ChainError::Decode(format!("expected 32-byte word, got {} bytes", data.len()))
    })
}

/// Decode a single `uint256` return value.
pub fn decode_uint(data: &[u8]) -> Result<U256, ChainError> {
    Ok(U256::from_be_slice(first_word(data)?))
}

/// Decode a single `address` return value (right-aligned in its word).
pub fn decode_address(data: &[u8]) -> Result<Address, ChainError> {
    let word = first_word(data)?;
    if word[..12].iter().any(|b| *b != 0) {
        return Err(ChainError::Decode(
            "address word has nonzero padding".to_string(),
        ));
    }
    Ok(Address::from_slice(&word[12..]))
}

/// Decode a single `bool` return value. Any nonzero word is true.
pub fn decode_bool(data: &[u8]) -> Result<bool, ChainError> {
    Ok(decode_uint(data)? != U256::ZERO)
}

/// Decode a single `bytes32` return value.
pub fn decode_bytes32(data: &[u8]) -> Result<B256, ChainError> {
    Ok(B256::from_slice(first_word(data)?))
}

/// Decode a single dynamic `string` return value: offset word, length word,
/// then UTF-8 bytes.
pub fn decode_string(data: &[u8]) -> Result<String, ChainError> {
    let offset: usize = decode_uint(data)?
        .try_into()
        .map_err(|_| ChainError::Decode("string offset out of range".to_string()))?;

    let len_end = offset
        .checked_add(32)
        .ok_or_else(|| ChainError::Decode("string offset overflow".to_string()))?;
    let len_word = data
        .get(offset..len_end)
        .ok_or_else(|| ChainError::Decode("string length out of bounds".to_string()))?;
    let len: usize = U256::from_be_slice(len_word)
        .try_into()
        .map_err(|_| ChainError::Decode("string length out of range".to_string()))?;

    let body_end = len_end
        .checked_add(len)
        .ok_or_else(|| ChainError::Decode("string length overflow".to_string()))?;
    let bytes = data
        .get(len_end..body_end)
        .ok_or_else(|| ChainError::Decode("string body out of bounds".to_string()))?;

    String::from_utf8(bytes.to_vec())
        .map_err(|e| ChainError::Decode(format!("string is not UTF-8: {e}")))
}

/// Decode an `Error(string)` revert payload into its reason, if the data
/// carries one.
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    if data.len() < 4 || data[..4] != ERROR_STRING_SELECTOR {
        return None;
    }
    decode_string(&data[4..]).ok()
}

/// ABI-encode a `string` return value (offset, length, padded bytes).
/// Used by the test fixture chain to answer `name()`/`symbol()` calls.
pub fn encode_string(value: &str) -> Bytes {
    let bytes = value.as_bytes();
    let mut data = Vec::with_capacity(64 + ((bytes.len() + 31) / 32) * 32);
    data.extend_from_slice(word_from_uint(U256::from(32u64)).as_slice());
    data.extend_from_slice(word_from_uint(U256::from(bytes.len())).as_slice());
    data.extend_from_slice(bytes);
    // Pad the tail to a word boundary.
    let rem = bytes.len() % 32;
    if rem != 0 {
        data.extend(std::iter::repeat(0u8).take(32 - rem));
    }
    Bytes::from(data)
}

/// ABI-encode an `Error(string)` revert payload.
pub fn encode_revert(reason: &str) -> Bytes {
    let mut data = ERROR_STRING_SELECTOR.to_vec();
    data.extend_from_slice(&encode_string(reason));
    Bytes::from(data)
}
