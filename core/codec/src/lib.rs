// ledgerlink/core/codec/src/lib.rs

// Re-export modules
pub mod config;
pub mod identity;
pub mod sender;
pub mod signer;
pub mod storage;
pub mod transaction;

pub use config::{CodecConfig, ConfigError};
pub use identity::{AccountIdentifier, CreateScheme};
pub use sender::resolve_sender;
pub use signer::{
    address_from_public_key, recover_address, sign, verify_signer, PrivateKey, Signature,
    LEGACY_V_OFFSET,
};
pub use storage::{pad_identifier, StorageKey, StorageWord};
pub use transaction::{
    decode, FieldKind, FieldSpec, SignedTransaction, Transaction, TxCodec, UnsignedTransaction,
    SIGNATURE_FIELDS, UNSIGNED_FIELDS,
};

// Shared primitives, so callers need only this crate
pub use ledgerlink_primitives::{
    hex, keccak256, rlp, Address, CodecError, Result, RlpItem, H256, U256,
};
