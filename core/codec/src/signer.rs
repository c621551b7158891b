// ledgerlink/core/codec/src/signer.rs

//! secp256k1 signing and public-key recovery.
//!
//! Signatures use RFC 6979 deterministic nonces and are always emitted in
//! low-s form. `v` follows the legacy rule `v = 27 + recovery_id`; there is
//! no chain-id binding, and recovery rejects any other `v`.

use ledgerlink_primitives::{
    hex, keccak256_truncated, Address, CodecError, Result, H256, U256, WORD_LEN,
};
use once_cell::sync::Lazy;
use rand::{CryptoRng, RngCore};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};
use std::fmt;
use tracing::{trace, warn};
use zeroize::Zeroizing;

static SECP256K1: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Order of the secp256k1 group.
const CURVE_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// Largest `s` accepted in low-s form, `CURVE_ORDER / 2`.
const HALF_CURVE_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// `v` of a legacy signature is this offset plus the recovery id.
pub const LEGACY_V_OFFSET: u8 = 27;

fn curve_order() -> U256 {
    U256::from_big_endian(&CURVE_ORDER)
}

fn half_curve_order() -> U256 {
    U256::from_big_endian(&HALF_CURVE_ORDER)
}

/// A secp256k1 private key. The scalar is wiped from memory when dropped.
pub struct PrivateKey(Zeroizing<[u8; 32]>);

impl PrivateKey {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let scalar: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CodecError::invalid_input("private key must be 32 bytes"))?;
        let key = PrivateKey(Zeroizing::new(scalar));
        key.with_secret(|_| ())?;
        Ok(key)
    }

    pub fn from_hex(input: &str) -> Result<Self> {
        let bytes = Zeroizing::new(hex::from_hex(input).map_err(|_| {
            CodecError::invalid_input("private key is not valid hex")
        })?);
        Self::from_slice(&bytes)
    }

    /// Draw a fresh key from `rng`.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut scalar = Zeroizing::new([0u8; 32]);
        loop {
            rng.fill_bytes(&mut scalar[..]);
            if let Ok(key) = Self::from_slice(&scalar[..]) {
                return key;
            }
        }
    }

    /// Address of the matching public key.
    pub fn address(&self) -> Result<Address> {
        let public = self.with_secret(|secret| PublicKey::from_secret_key(&SECP256K1, secret))?;
        Ok(address_from_uncompressed(&public.serialize_uncompressed()))
    }

    /// Run `f` against a library secret key that is erased before returning.
    fn with_secret<T>(&self, f: impl FnOnce(&SecretKey) -> T) -> Result<T> {
        let mut secret = SecretKey::from_slice(&self.0[..])
            .map_err(|_| CodecError::invalid_input("private key is not a valid secp256k1 scalar"))?;
        let out = f(&secret);
        secret.non_secure_erase();
        Ok(out)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Recoverable ECDSA signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    pub r: H256,
    pub s: H256,
    pub v: u8,
}

impl Signature {
    /// Build from raw components, folding a high `s` into the lower half of
    /// the curve order and flipping the recovery id to match. An `s` at or
    /// above the curve order is left untouched and fails recovery later.
    pub fn normalized(r: H256, s: H256, recovery_id: u8) -> Self {
        let order = curve_order();
        let s_value = U256::from_big_endian(s.as_bytes());
        let (s, recovery_id) = if s_value > half_curve_order() && s_value < order {
            let mut flipped = [0u8; WORD_LEN];
            (order - s_value).to_big_endian(&mut flipped);
            (H256::from(flipped), recovery_id ^ 1)
        } else {
            (s, recovery_id)
        };

        Signature {
            r,
            s,
            v: LEGACY_V_OFFSET + recovery_id,
        }
    }

    /// Recovery id encoded in `v`.
    pub fn recovery_id(&self) -> Result<u8> {
        match self.v {
            27 | 28 => Ok(self.v - LEGACY_V_OFFSET),
            other => Err(CodecError::invalid_signature(format!(
                "v = {other} is not a legacy recovery value"
            ))),
        }
    }

    pub fn is_low_s(&self) -> bool {
        U256::from_big_endian(self.s.as_bytes()) <= half_curve_order()
    }

    fn compact(&self) -> [u8; 64] {
        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(self.r.as_bytes());
        compact[32..].copy_from_slice(self.s.as_bytes());
        compact
    }
}

/// Sign a 32-byte digest.
pub fn sign(digest: &H256, key: &PrivateKey) -> Result<Signature> {
    let message = Message::from_slice(digest.as_bytes())
        .map_err(|e| CodecError::invalid_input(format!("digest: {e}")))?;
    let recoverable =
        key.with_secret(|secret| SECP256K1.sign_ecdsa_recoverable(&message, secret))?;

    let (recovery_id, compact) = recoverable.serialize_compact();
    let signature = Signature::normalized(
        H256::from_slice(&compact[..32]),
        H256::from_slice(&compact[32..]),
        recovery_id.to_i32() as u8,
    );
    trace!(digest = %hex::to_hex(digest), v = signature.v, "Signed digest");
    Ok(signature)
}

/// Recover the signer's address from a digest and signature.
pub fn recover_address(digest: &H256, signature: &Signature) -> Result<Address> {
    let recovery_id = signature.recovery_id()?;
    if !signature.is_low_s() {
        return Err(CodecError::invalid_signature("s is not in low-s form"));
    }

    let recovery_id = RecoveryId::from_i32(i32::from(recovery_id))
        .map_err(|e| CodecError::invalid_signature(format!("recovery id: {e}")))?;
    let recoverable = RecoverableSignature::from_compact(&signature.compact(), recovery_id)
        .map_err(|e| CodecError::invalid_signature(format!("signature: {e}")))?;
    let message = Message::from_slice(digest.as_bytes())
        .map_err(|e| CodecError::invalid_input(format!("digest: {e}")))?;
    let public = SECP256K1
        .recover_ecdsa(&message, &recoverable)
        .map_err(|e| CodecError::invalid_signature(format!("recovery: {e}")))?;

    Ok(address_from_uncompressed(&public.serialize_uncompressed()))
}

/// Recover the signer and require it to be `expected`.
pub fn verify_signer(digest: &H256, signature: &Signature, expected: &Address) -> Result<()> {
    let recovered = recover_address(digest, signature)?;
    if recovered != *expected {
        warn!(
            expected = %hex::to_hex(expected),
            recovered = %hex::to_hex(recovered),
            "Recovered signer does not match expected address"
        );
        return Err(CodecError::SignatureMismatch {
            expected: *expected,
            recovered,
        });
    }
    Ok(())
}

/// Ethereum address of a public key given as 65-byte uncompressed (`0x04`
/// prefix), 64-byte raw `x ++ y`, or 33-byte compressed form.
pub fn address_from_public_key(bytes: &[u8]) -> Result<Address> {
    let public = match bytes.len() {
        33 | 65 => PublicKey::from_slice(bytes),
        64 => {
            let mut prefixed = [0u8; 65];
            prefixed[0] = 0x04;
            prefixed[1..].copy_from_slice(bytes);
            PublicKey::from_slice(&prefixed)
        }
        other => {
            return Err(CodecError::invalid_input(format!(
                "public key of {other} bytes is neither compressed nor uncompressed"
            )))
        }
    }
    .map_err(|e| CodecError::invalid_input(format!("public key: {e}")))?;

    Ok(address_from_uncompressed(&public.serialize_uncompressed()))
}

fn address_from_uncompressed(uncompressed: &[u8; 65]) -> Address {
    Address::from(keccak256_truncated(&uncompressed[1..]))
}
