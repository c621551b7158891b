// ledgerlink/core/primitives/src/types.rs

// Fixed-width values shared by every codec in the workspace
pub use ethereum_types::{H160, H256, U256};

/// Ethereum-style 20-byte account address.
pub type Address = H160;

/// Width of an address and of an account identifier.
pub const ADDRESS_LEN: usize = 20;

/// Width of a storage key, storage word and digest.
pub const WORD_LEN: usize = 32;

/// Parse a 20-byte address from hex, with or without `0x`.
pub fn address_from_hex(input: &str) -> crate::Result<Address> {
    let bytes: [u8; ADDRESS_LEN] = crate::hex::decode_fixed(input)?;
    Ok(Address::from(bytes))
}

/// Left-pad a value of at most 32 bytes to a full word.
pub fn pad_word(bytes: &[u8]) -> crate::Result<[u8; WORD_LEN]> {
    if bytes.len() > WORD_LEN {
        return Err(crate::CodecError::invalid_input(format!(
            "{} bytes do not fit in a {WORD_LEN} byte word",
            bytes.len()
        )));
    }
    let mut word = [0u8; WORD_LEN];
    word[WORD_LEN - bytes.len()..].copy_from_slice(bytes);
    Ok(word)
}
