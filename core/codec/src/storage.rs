// ledgerlink/core/codec/src/storage.rs

//! State-store keys and values.
//!
//! `key = keccak256(pad32(identifier) ++ be32(slot))`

use crate::identity::AccountIdentifier;
use ledgerlink_primitives::{hex, keccak256_concat, Result, H256, U256, WORD_LEN};
use std::fmt;

/// Left-pad an identifier with zeros to one 32-byte word.
pub fn pad_identifier(id: &AccountIdentifier) -> [u8; WORD_LEN] {
    let mut word = [0u8; WORD_LEN];
    word[WORD_LEN - id.as_bytes().len()..].copy_from_slice(id.as_bytes());
    word
}

/// Key under which one storage slot of one account lives.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(H256);

impl StorageKey {
    pub fn derive(id: &AccountIdentifier, slot: impl Into<U256>) -> Self {
        let mut slot_word = [0u8; WORD_LEN];
        slot.into().to_big_endian(&mut slot_word);
        StorageKey(keccak256_concat(&[&pad_identifier(id)[..], &slot_word[..]]))
    }

    pub fn as_h256(&self) -> &H256 {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::to_hex(self.0)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorageKey({})", self.to_hex())
    }
}

/// Zero-padded 32-byte value stored under a [`StorageKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StorageWord([u8; WORD_LEN]);

impl StorageWord {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: [u8; WORD_LEN]) -> Self {
        StorageWord(bytes)
    }

    /// Accepts up to 32 hex-encoded bytes and left-pads them.
    pub fn from_hex(input: &str) -> Result<Self> {
        let bytes = hex::from_hex(input)?;
        ledgerlink_primitives::pad_word(&bytes).map(StorageWord)
    }

    pub fn as_bytes(&self) -> &[u8; WORD_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn to_u256(&self) -> U256 {
        U256::from_big_endian(&self.0)
    }

    pub fn to_hex(&self) -> String {
        hex::to_hex(self.0)
    }
}

impl From<U256> for StorageWord {
    fn from(value: U256) -> Self {
        let mut word = [0u8; WORD_LEN];
        value.to_big_endian(&mut word);
        StorageWord(word)
    }
}

impl From<StorageWord> for U256 {
    fn from(word: StorageWord) -> Self {
        word.to_u256()
    }
}
