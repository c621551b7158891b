// ledgerlink/core/codec/src/transaction.rs

//! Legacy Ethereum transaction codec.
//!
//! Unsigned form: `rlp([nonce, gasPrice, gasLimit, to, value, data])`.
//! Signed form:   `rlp([nonce, gasPrice, gasLimit, to, value, data, v, r, s])`.
//!
//! The digest that gets signed is the Keccak-256 of the unsigned form. `to`
//! is the empty string for contract creation. Integers are minimal
//! big-endian, so zero is the empty string and never `0x00`.

use crate::config::CodecConfig;
use crate::signer::{self, PrivateKey, Signature, LEGACY_V_OFFSET};
use ledgerlink_primitives::rlp::{self, decode_uint};
use ledgerlink_primitives::{
    hex, keccak256, Address, CodecError, Result, RlpItem, H256, U256, ADDRESS_LEN,
};
use tracing::{debug, warn};

/// Shape of a single transaction field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Minimal big-endian unsigned integer of at most `max_len` bytes.
    Uint { max_len: usize },
    /// Empty for contract creation, otherwise exactly 20 bytes.
    OptionalAddress,
    /// Opaque payload bounded by [`CodecConfig::max_data_len`].
    Bytes,
}

/// One row of the encoding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Fields of the unsigned transaction, in wire order.
pub const UNSIGNED_FIELDS: [FieldSpec; 6] = [
    FieldSpec { name: "nonce", kind: FieldKind::Uint { max_len: 8 } },
    FieldSpec { name: "gasPrice", kind: FieldKind::Uint { max_len: 32 } },
    FieldSpec { name: "gasLimit", kind: FieldKind::Uint { max_len: 32 } },
    FieldSpec { name: "to", kind: FieldKind::OptionalAddress },
    FieldSpec { name: "value", kind: FieldKind::Uint { max_len: 32 } },
    FieldSpec { name: "data", kind: FieldKind::Bytes },
];

/// Fields appended by a signature, in wire order.
pub const SIGNATURE_FIELDS: [FieldSpec; 3] = [
    FieldSpec { name: "v", kind: FieldKind::Uint { max_len: 1 } },
    FieldSpec { name: "r", kind: FieldKind::Uint { max_len: 32 } },
    FieldSpec { name: "s", kind: FieldKind::Uint { max_len: 32 } },
];

const SIGNED_FIELD_COUNT: usize = UNSIGNED_FIELDS.len() + SIGNATURE_FIELDS.len();

impl FieldSpec {
    /// Check `item` against this row and return its raw bytes.
    fn check<'a>(&self, item: &'a RlpItem, max_data_len: usize) -> Result<&'a [u8]> {
        let bytes = item
            .as_bytes()
            .map_err(|_| CodecError::malformed(format!("{}: expected byte string", self.name)))?;

        match self.kind {
            FieldKind::Uint { max_len } => {
                decode_uint(bytes, max_len).map_err(|e| self.annotate(e))?;
            }
            FieldKind::OptionalAddress => {
                if !bytes.is_empty() && bytes.len() != ADDRESS_LEN {
                    return Err(CodecError::malformed(format!(
                        "{}: expected empty or {ADDRESS_LEN} bytes, got {}",
                        self.name,
                        bytes.len()
                    )));
                }
            }
            FieldKind::Bytes => {
                if bytes.len() > max_data_len {
                    return Err(CodecError::malformed(format!(
                        "{}: {} bytes exceeds limit of {max_data_len}",
                        self.name,
                        bytes.len()
                    )));
                }
            }
        }
        Ok(bytes)
    }

    fn annotate(&self, err: CodecError) -> CodecError {
        match err {
            CodecError::MalformedEncoding(msg) => {
                CodecError::malformed(format!("{}: {msg}", self.name))
            }
            other => other,
        }
    }
}

/// Check a run of items against a run of table rows.
fn check_fields<'a>(
    specs: &[FieldSpec],
    items: &'a [RlpItem],
    max_data_len: usize,
) -> Result<Vec<&'a [u8]>> {
    specs
        .iter()
        .zip(items)
        .map(|(spec, item)| spec.check(item, max_data_len))
        .collect()
}

fn uint_field(bytes: &[u8]) -> U256 {
    U256::from_big_endian(bytes)
}

fn word_item(word: &H256) -> RlpItem {
    RlpItem::uint(U256::from_big_endian(word.as_bytes()))
}

/// Transaction fields before signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: U256,
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
}

impl UnsignedTransaction {
    /// A contract-creation transaction (no recipient).
    pub fn new(
        nonce: u64,
        gas_price: impl Into<U256>,
        gas_limit: impl Into<U256>,
        value: impl Into<U256>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            nonce,
            gas_price: gas_price.into(),
            gas_limit: gas_limit.into(),
            to: None,
            value: value.into(),
            data,
        }
    }

    pub fn with_recipient(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }

    /// RLP items in [`UNSIGNED_FIELDS`] order.
    fn field_items(&self) -> Vec<RlpItem> {
        vec![
            RlpItem::uint(self.nonce),
            RlpItem::uint(self.gas_price),
            RlpItem::uint(self.gas_limit),
            match &self.to {
                Some(to) => RlpItem::bytes(to.as_bytes()),
                None => RlpItem::empty(),
            },
            RlpItem::uint(self.value),
            RlpItem::bytes(self.data.as_slice()),
        ]
    }

    /// Canonical unsigned encoding.
    pub fn encode(&self) -> Vec<u8> {
        RlpItem::List(self.field_items()).encode()
    }

    /// Keccak-256 of the unsigned encoding; the value that gets signed.
    pub fn digest(&self) -> H256 {
        keccak256(self.encode())
    }

    /// Sign with the default codec limits.
    pub fn sign(&self, key: &PrivateKey) -> Result<SignedTransaction> {
        TxCodec::default().sign(self, key)
    }

    fn from_fields(fields: &[&[u8]]) -> Self {
        let nonce = uint_field(fields[0]).low_u64();
        Self {
            nonce,
            gas_price: uint_field(fields[1]),
            gas_limit: uint_field(fields[2]),
            to: if fields[3].is_empty() {
                None
            } else {
                Some(Address::from_slice(fields[3]))
            },
            value: uint_field(fields[4]),
            data: fields[5].to_vec(),
        }
    }
}

/// A signed transaction together with everything derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    transaction: UnsignedTransaction,
    signature: Signature,
    unsigned_encoding: Vec<u8>,
    signed_encoding: Vec<u8>,
    digest: H256,
    sender: Address,
}

impl SignedTransaction {
    /// Derive encodings, digest and sender. Fails if no sender can be recovered.
    fn assemble(transaction: UnsignedTransaction, signature: Signature) -> Result<Self> {
        let mut items = transaction.field_items();
        let unsigned_encoding = RlpItem::List(items.clone()).encode();
        let digest = keccak256(&unsigned_encoding);
        let sender = signer::recover_address(&digest, &signature)?;

        items.extend([
            RlpItem::uint(signature.v),
            word_item(&signature.r),
            word_item(&signature.s),
        ]);
        let signed_encoding = RlpItem::List(items).encode();

        Ok(Self {
            transaction,
            signature,
            unsigned_encoding,
            signed_encoding,
            digest,
            sender,
        })
    }

    pub fn transaction(&self) -> &UnsignedTransaction {
        &self.transaction
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn unsigned_encoding(&self) -> &[u8] {
        &self.unsigned_encoding
    }

    /// Canonical signed encoding, the bytes submitted to the ledger.
    pub fn encode(&self) -> &[u8] {
        &self.signed_encoding
    }

    pub fn to_hex(&self) -> String {
        hex::to_hex(&self.signed_encoding)
    }

    /// Digest of the unsigned encoding.
    pub fn digest(&self) -> H256 {
        self.digest
    }

    /// Keccak-256 of the signed encoding.
    pub fn hash(&self) -> H256 {
        keccak256(&self.signed_encoding)
    }

    /// Address recovered from the signature.
    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Require the recovered sender to be `expected`.
    pub fn verify_sender(&self, expected: &Address) -> Result<()> {
        signer::verify_signer(&self.digest, &self.signature, expected)
    }

    pub fn into_parts(self) -> (UnsignedTransaction, Signature) {
        (self.transaction, self.signature)
    }
}

/// Either shape that can arrive on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Unsigned(UnsignedTransaction),
    Signed(SignedTransaction),
}

impl Transaction {
    pub fn fields(&self) -> &UnsignedTransaction {
        match self {
            Transaction::Unsigned(tx) => tx,
            Transaction::Signed(tx) => tx.transaction(),
        }
    }

    pub fn has_signature(&self) -> bool {
        matches!(self, Transaction::Signed(_))
    }

    pub fn nonce(&self) -> u64 {
        self.fields().nonce
    }
}

/// Transaction encoder/decoder bound to a set of limits.
#[derive(Debug, Clone, Default)]
pub struct TxCodec {
    config: CodecConfig,
}

impl TxCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Unsigned encoding after checking every field against the table.
    pub fn encode_unsigned(&self, tx: &UnsignedTransaction) -> Result<Vec<u8>> {
        let items = tx.field_items();
        check_fields(&UNSIGNED_FIELDS, &items, self.config.max_data_len).map_err(|e| match e {
            CodecError::MalformedEncoding(msg) => CodecError::InvalidInput(msg),
            other => other,
        })?;
        Ok(RlpItem::List(items).encode())
    }

    /// Sign `tx` and check that the signature recovers to the key's address.
    pub fn sign(&self, tx: &UnsignedTransaction, key: &PrivateKey) -> Result<SignedTransaction> {
        let unsigned = self.encode_unsigned(tx)?;
        let digest = keccak256(&unsigned);
        let signature = signer::sign(&digest, key)?;

        let signed = SignedTransaction::assemble(tx.clone(), signature)?;
        let expected = key.address()?;
        if signed.sender() != expected {
            warn!(
                expected = %hex::to_hex(expected),
                recovered = %hex::to_hex(signed.sender()),
                "Signature does not recover to the signing key"
            );
            return Err(CodecError::SignatureMismatch {
                expected,
                recovered: signed.sender(),
            });
        }
        debug!(
            nonce = tx.nonce,
            data_len = tx.data.len(),
            create = tx.is_contract_creation(),
            digest = %hex::to_hex(digest),
            "Signed transaction"
        );
        Ok(signed)
    }

    /// Decode a 6-field unsigned or 9-field signed transaction.
    pub fn decode(&self, bytes: &[u8]) -> Result<Transaction> {
        self.decode_fields(bytes).map_err(|err| {
            debug!(len = bytes.len(), error = %err, "Rejected transaction encoding");
            err
        })
    }

    fn decode_fields(&self, bytes: &[u8]) -> Result<Transaction> {
        let items = rlp::decode_with_depth(bytes, 1)?.into_list()?;

        let tx = match items.len() {
            6 => {
                let fields = check_fields(&UNSIGNED_FIELDS, &items, self.config.max_data_len)?;
                Transaction::Unsigned(UnsignedTransaction::from_fields(&fields))
            }
            SIGNED_FIELD_COUNT => {
                let (head, tail) = items.split_at(UNSIGNED_FIELDS.len());
                let fields = check_fields(&UNSIGNED_FIELDS, head, self.config.max_data_len)?;
                let sig_fields = check_fields(&SIGNATURE_FIELDS, tail, self.config.max_data_len)?;
                let signature = signature_from_fields(&sig_fields)?;
                let signed = SignedTransaction::assemble(
                    UnsignedTransaction::from_fields(&fields),
                    signature,
                )?;
                debug!(
                    nonce = signed.transaction().nonce,
                    sender = %hex::to_hex(signed.sender()),
                    "Decoded signed transaction"
                );
                Transaction::Signed(signed)
            }
            other => {
                return Err(CodecError::malformed(format!(
                    "transaction has {other} fields, expected 6 or {SIGNED_FIELD_COUNT}"
                )))
            }
        };
        Ok(tx)
    }

    pub fn decode_hex(&self, input: &str) -> Result<Transaction> {
        let bytes = hex::from_hex(input)?;
        self.decode(&bytes)
    }

    /// Decode an arbitrary RLP item under the configured nesting limit.
    pub fn decode_rlp(&self, bytes: &[u8]) -> Result<RlpItem> {
        rlp::decode_with_depth(bytes, self.config.max_rlp_depth)
    }
}

fn signature_from_fields(fields: &[&[u8]]) -> Result<Signature> {
    let v = uint_field(fields[0]).low_u32() as u8;
    if v != LEGACY_V_OFFSET && v != LEGACY_V_OFFSET + 1 {
        return Err(CodecError::malformed(format!(
            "v: {v} is outside the legacy range 27..=28"
        )));
    }

    let mut words = [H256::zero(); 2];
    for (word, (bytes, name)) in words.iter_mut().zip([(fields[1], "r"), (fields[2], "s")]) {
        if bytes.is_empty() {
            return Err(CodecError::malformed(format!("{name}: must be non-zero")));
        }
        word.as_bytes_mut()[32 - bytes.len()..].copy_from_slice(bytes);
    }

    let signature = Signature {
        r: words[0],
        s: words[1],
        v,
    };
    if !signature.is_low_s() {
        return Err(CodecError::malformed("s: not in low-s form"));
    }
    Ok(signature)
}

/// Decode with the default limits.
pub fn decode(bytes: &[u8]) -> Result<Transaction> {
    TxCodec::default().decode(bytes)
}
