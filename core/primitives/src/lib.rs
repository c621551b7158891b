// ledgerlink/core/primitives/src/lib.rs

// Leaf codecs shared by the bridge: hex, keccak, RLP and fixed-width values
pub mod error;
pub mod hash;
pub mod hex;
pub mod rlp;
pub mod types;

pub use error::{CodecError, Result};
pub use hash::{keccak256, keccak256_concat, keccak256_truncated};
pub use rlp::RlpItem;
pub use types::{address_from_hex, pad_word, Address, H160, H256, U256, ADDRESS_LEN, WORD_LEN};
