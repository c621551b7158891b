// ledgerlink/core/primitives/src/error.rs

use ethereum_types::H160;
use thiserror::Error;

/// Errors produced by the codec and identity layer.
///
/// Every function in this workspace is deterministic, so none of these are
/// worth retrying with the same input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Caller supplied a malformed name, address, key, slot or hex string.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Bytes do not form a canonical encoding of the expected shape.
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Signature could not be turned back into a public key.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Signature is valid but belongs to someone else.
    #[error("Signature mismatch: expected signer 0x{}, recovered 0x{}", hex::encode(.expected), hex::encode(.recovered))]
    SignatureMismatch { expected: H160, recovered: H160 },
}

impl CodecError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        CodecError::InvalidInput(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        CodecError::MalformedEncoding(msg.into())
    }

    pub fn invalid_signature(msg: impl Into<String>) -> Self {
        CodecError::InvalidSignature(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
