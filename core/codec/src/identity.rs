// ledgerlink/core/codec/src/identity.rs

//! Cross-chain account identity.
//!
//! A host-ledger account name and the Ethereum-style address it controls are
//! bound into one 20-byte [`AccountIdentifier`]:
//!
//! ```text
//! id = keccak256(rlp([name_bytes, address_bytes]))[12..32]
//! ```
//!
//! The same module derives the addresses of contracts created by an account.

use ledgerlink_primitives::{
    hex, keccak256, keccak256_concat, keccak256_truncated, Address, CodecError, Result, RlpItem,
    H256, ADDRESS_LEN,
};
use std::fmt;
use tracing::trace;

/// 20-byte identifier binding a native account name to an Ethereum-style address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountIdentifier([u8; ADDRESS_LEN]);

impl AccountIdentifier {
    /// Derive the identifier for `(name, address)`.
    pub fn create(name: &str, address: &Address) -> Result<Self> {
        if name.is_empty() {
            return Err(CodecError::invalid_input("account name must not be empty"));
        }

        let encoded = RlpItem::list(vec![
            RlpItem::bytes(name.as_bytes()),
            RlpItem::bytes(address.as_bytes()),
        ])
        .encode();
        let id = AccountIdentifier(keccak256_truncated(&encoded));

        trace!(name, identifier = %id, "Derived account identifier");
        Ok(id)
    }

    /// Derive from an address given as hex (with or without `0x`).
    pub fn create_from_hex(name: &str, address_hex: &str) -> Result<Self> {
        let address = ledgerlink_primitives::address_from_hex(address_hex)?;
        Self::create(name, &address)
    }

    /// Rehydrate an identifier previously produced by [`AccountIdentifier::create`]
    /// and carried across the boundary as hex.
    pub fn from_hex(input: &str) -> Result<Self> {
        hex::decode_fixed::<ADDRESS_LEN>(input).map(AccountIdentifier)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// The identifier viewed as an address in the EVM's address space.
    pub fn as_address(&self) -> Address {
        Address::from(self.0)
    }

    pub fn to_hex(&self) -> String {
        hex::to_hex(self.0)
    }
}

impl fmt::Display for AccountIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for AccountIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountIdentifier({})", self.to_hex())
    }
}

/// How the address of newly created contract code is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateScheme<'a> {
    /// Code is installed at the creating account's own address.
    Sender,
    /// `keccak256(rlp([sender, nonce]))[12..]`
    Legacy { nonce: u64 },
    /// `keccak256(0xff ++ sender ++ salt ++ keccak256(init_code))[12..]`
    Eip1014 { salt: H256, init_code: &'a [u8] },
}

impl CreateScheme<'_> {
    pub fn contract_address(&self, sender: &Address) -> Address {
        match self {
            CreateScheme::Sender => *sender,
            CreateScheme::Legacy { nonce } => {
                // Sender is always the full 20 bytes, leading zeros included.
                let encoded = RlpItem::list(vec![
                    RlpItem::bytes(sender.as_bytes()),
                    RlpItem::uint(*nonce),
                ])
                .encode();
                Address::from(keccak256_truncated(&encoded))
            }
            CreateScheme::Eip1014 { salt, init_code } => {
                let code_hash = keccak256(init_code);
                let digest = keccak256_concat(&[
                    &[0xffu8][..],
                    sender.as_bytes(),
                    salt.as_bytes(),
                    code_hash.as_bytes(),
                ]);
                Address::from_slice(&digest.as_bytes()[12..])
            }
        }
    }
}
