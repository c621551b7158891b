// ledgerlink/core/primitives/src/hex.rs

//! Byte/hex conversion at the system boundary.
//!
//! Output is always lowercase without a `0x` prefix. Input may carry an
//! optional `0x`/`0X` prefix, which is stripped before decoding.

use crate::error::{CodecError, Result};

/// Encode bytes as lowercase hex with no prefix.
pub fn to_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Decode a hex string, accepting an optional `0x` prefix.
pub fn from_hex(input: &str) -> Result<Vec<u8>> {
    let digits = strip_prefix(input);
    hex::decode(digits).map_err(|e| CodecError::invalid_input(format!("hex: {e}")))
}

/// Decode a hex string into exactly `N` bytes.
pub fn decode_fixed<const N: usize>(input: &str) -> Result<[u8; N]> {
    let bytes = from_hex(input)?;
    bytes.as_slice().try_into().map_err(|_| {
        CodecError::invalid_input(format!("expected {} bytes of hex, got {}", N, bytes.len()))
    })
}

fn strip_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_is_lowercase_unprefixed() {
        assert_eq!(to_hex([0xAB, 0x01, 0xff]), "ab01ff");
        assert_eq!(to_hex(b""), "");
    }

    #[test]
    fn test_prefix_is_optional_on_input() {
        assert_eq!(from_hex("0xDEAD").unwrap(), vec![0xde, 0xad]);
        assert_eq!(from_hex("0Xdead").unwrap(), vec![0xde, 0xad]);
        assert_eq!(from_hex("dead").unwrap(), vec![0xde, 0xad]);
    }

    #[test]
    fn test_rejects_odd_length_and_bad_digits() {
        assert!(matches!(from_hex("abc"), Err(CodecError::InvalidInput(_))));
        assert!(matches!(from_hex("zz"), Err(CodecError::InvalidInput(_))));
    }

    #[test]
    fn test_decode_fixed_enforces_width() {
        let word: [u8; 2] = decode_fixed("0x0102").unwrap();
        assert_eq!(word, [1, 2]);
        assert!(decode_fixed::<20>("0102").is_err());
    }
}
