// ledgerlink/core/primitives/src/hash.rs

// Keccak-256, the only hash used for identifiers, digests and storage keys.
use ethereum_types::H256;
use sha3::{Digest, Keccak256};

/// Keccak-256 of `data`.
pub fn keccak256(data: impl AsRef<[u8]>) -> H256 {
    H256::from_slice(&Keccak256::digest(data.as_ref()))
}

/// Keccak-256 over the concatenation of `parts` without allocating the joined buffer.
pub fn keccak256_concat(parts: &[&[u8]]) -> H256 {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    H256::from_slice(&hasher.finalize())
}

/// Low-order 20 bytes of a Keccak-256 digest, the width of an Ethereum-style address.
pub fn keccak256_truncated(data: impl AsRef<[u8]>) -> [u8; 20] {
    let digest = keccak256(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest.as_bytes()[12..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_digest() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_concat_matches_joined_input() {
        let joined = keccak256(b"ledgerlink");
        let split = keccak256_concat(&[&b"ledger"[..], &b""[..], &b"link"[..]]);
        assert_eq!(joined, split);
    }

    #[test]
    fn test_truncation_takes_low_order_bytes() {
        let full = keccak256(b"abc");
        assert_eq!(keccak256_truncated(b"abc")[..], full.as_bytes()[12..]);
    }
}
