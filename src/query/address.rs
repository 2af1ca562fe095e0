// src/query/address.rs

//! Strict address validation and conversion.
//!
//! The shape-based extraction in [`super`] is deliberately permissive; the
//! functions here check the real invariants: hex decodability for EVM-style
//! addresses and a full bech32 checksum decode for native `sei1` addresses.

use bech32::FromBase32;

/// Human-readable prefix of native Sei addresses.
pub const SEI_HRP: &str = "sei";

/// Byte length of an account address on both address formats.
const ADDRESS_LEN: usize = 20;

/// Whether `s` is a 0x-prefixed, 20-byte hex address.
pub fn is_hex_address(s: &str) -> bool {
    s.strip_prefix("0x")
        .and_then(|tail| hex::decode(tail).ok())
        .map(|bytes| bytes.len() == ADDRESS_LEN)
        .unwrap_or(false)
}

/// Decode a native `sei1` address to its 20-byte payload, verifying the
/// bech32 checksum.
pub fn decode_bech32_address(s: &str) -> Option<Vec<u8>> {
    let (hrp, data, _variant) = bech32::decode(s).ok()?;
    if hrp != SEI_HRP {
        return None;
    }
    let bytes = Vec::<u8>::from_base32(&data).ok()?;
    (bytes.len() == ADDRESS_LEN).then_some(bytes)
}

/// Convert a native `sei1` address into the equivalent 0x-prefixed hex
/// form. Both encodings carry the same 20-byte account payload.
pub fn bech32_to_hex(s: &str) -> Option<String> {
    decode_bech32_address(s).map(|bytes| format!("0x{}", hex::encode(bytes)))
}

/// Whether `s` is a valid address in either supported format.
pub fn is_valid_address(s: &str) -> bool {
    is_hex_address(s) || decode_bech32_address(s).is_some()
}
