//! Signature encoding and signer recovery

use crate::{Error, Result};
use alloy::primitives::{hex, Address, Signature};
use std::str::FromStr;

fn decode_hex(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(trimmed)
        .map_err(|e| Error::InvalidSignatureEncoding(format!("Invalid hex string: {}", e)))
}

/// Decode a hex-encoded 65-byte `r || s || v` signature
pub fn decode_signature(signature: &str) -> Result<Signature> {
    let bytes = decode_hex(signature)?;
    Signature::try_from(bytes.as_slice())
        .map_err(|e| Error::InvalidSignatureEncoding(e.to_string()))
}

/// Encode a signature as `0x`-prefixed hex
pub fn encode_signature(signature: &Signature) -> String {
    hex::encode_prefixed(signature.as_bytes())
}

/// Recover the address that signed `message` as an EIP-191 personal message
pub fn recover_address(message: &str, signature: &str) -> Result<Address> {
    recover_from(message, &decode_signature(signature)?)
}

pub(crate) fn recover_from(message: &str, signature: &Signature) -> Result<Address> {
    signature
        .recover_address_from_msg(message)
        .map_err(|e| Error::InvalidSignatureEncoding(format!("Recovery failed: {}", e)))
}

/// Optional lowercase `0x` followed by at least one hex digit
pub(crate) fn is_signature_shaped(input: &str) -> bool {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Parse `0x` + 40 hex digits; the digits may be any case, the prefix may not
pub(crate) fn parse_address(input: &str) -> Option<Address> {
    let digits = input.strip_prefix("0x")?;
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Address::from_str(input).ok()
}
