// End-to-end scenarios across the bridge codec
//
// Each scenario walks the full path a bridged transaction takes:
// key -> identifier -> signed bytes -> decode -> sender -> storage key.

use ledgerlink_codec::*;
use ::rlp::RlpStream;

const TEST_KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
const TEST_ADDRESS: &str = "2c7536e3605d9c16a7a3d7b1898e529396a65c23";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn key() -> PrivateKey {
    PrivateKey::from_hex(TEST_KEY).unwrap()
}

fn creation_tx() -> UnsignedTransaction {
    UnsignedTransaction::new(
        1,
        0x5af3107a4000u64,
        0x0186a0u64,
        0x0de0b6b3a7640000u64,
        Vec::new(),
    )
}

fn call_tx() -> UnsignedTransaction {
    UnsignedTransaction::new(0, 1u64, 21000u64, 0u64, vec![0x60, 0x10, 0x60, 0x00, 0x55])
        .with_recipient(Address::repeat_byte(0x35))
}

fn be_bytes(value: U256) -> Vec<u8> {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word.iter().copied().skip_while(|b| *b == 0).collect()
}

/// Reference encoding of a transaction via the `rlp` crate.
fn reference_encoding(tx: &UnsignedTransaction, signature: Option<&Signature>) -> Vec<u8> {
    let mut stream = RlpStream::new_list(if signature.is_some() { 9 } else { 6 });
    stream.append(&tx.nonce);
    stream.append(&be_bytes(tx.gas_price));
    stream.append(&be_bytes(tx.gas_limit));
    match &tx.to {
        Some(to) => stream.append(&to.as_bytes()),
        None => stream.append_empty_data(),
    };
    stream.append(&be_bytes(tx.value));
    stream.append(&tx.data);
    if let Some(sig) = signature {
        stream.append(&sig.v);
        stream.append(&be_bytes(U256::from_big_endian(sig.r.as_bytes())));
        stream.append(&be_bytes(U256::from_big_endian(sig.s.as_bytes())));
    }
    stream.out().to_vec()
}

// ============================================================================
// Golden scenarios
// ============================================================================

#[test]
fn test_contract_creation_golden() {
    init_tracing();
    let signed = creation_tx().sign(&key()).unwrap();

    assert_eq!(
        hex::to_hex(signed.unsigned_encoding()),
        "d701865af3107a4000830186a080880de0b6b3a764000080"
    );
    assert_eq!(
        hex::to_hex(signed.digest()),
        "de0ccfce33f23f4871557a1ee1673e53deb1bbe87e3e9502184781acf21c67a6"
    );
    assert_eq!(
        hex::to_hex(signed.signature().s),
        "7683fbcc753c7f98b8e0ab8d1ecf6f024c50865756024369d666136ee5fabbc1"
    );
    assert_eq!(signed.signature().v, 28);
    assert_eq!(hex::to_hex(signed.sender()), TEST_ADDRESS);
}

#[test]
fn test_call_golden() {
    let signed = call_tx().sign(&key()).unwrap();
    assert_eq!(
        hex::to_hex(signed.unsigned_encoding()),
        "e1800182520894353535353535353535353535353535353535353580856010600055"
    );
    assert_eq!(
        signed.to_hex(),
        "f8648001825208943535353535353535353535353535353535353535808560106000551ba031803f44c10efb4acef8a164953814ab8fbd815aae157ed10c6fbb68831abccfa02ec327668b060e5f4f89ae08ae567ec3c1b731161468009c5d2cf863fa215bd6"
    );
}

#[test]
fn test_encodings_match_reference_encoder() {
    for tx in [creation_tx(), call_tx()] {
        let signed = tx.sign(&key()).unwrap();
        assert_eq!(tx.encode(), reference_encoding(&tx, None));
        assert_eq!(
            signed.encode(),
            reference_encoding(&tx, Some(signed.signature())).as_slice()
        );
    }
}

#[test]
fn test_chain_bound_transaction_rejected() {
    let eip155 = "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83";
    assert!(matches!(
        TxCodec::default().decode_hex(eip155),
        Err(CodecError::MalformedEncoding(_))
    ));
}

// ============================================================================
// Full bridge flow
// ============================================================================

#[test]
fn test_bridge_flow() {
    init_tracing();
    let key = key();
    let address = key.address().unwrap();
    let id = AccountIdentifier::create("alice", &address).unwrap();
    assert_eq!(id.to_hex(), "09da7a7d97439ebe37aa611ebe27a558587ecb74");

    // Submit over the hex boundary and decode on the other side.
    let wire = creation_tx().sign(&key).unwrap().to_hex();
    let decoded = TxCodec::default().decode_hex(&wire).unwrap();
    let Transaction::Signed(signed) = &decoded else {
        panic!("expected a signed transaction");
    };
    signed.verify_sender(&address).unwrap();

    let resolved = resolve_sender("alice", &decoded, Some(id.to_hex().as_str())).unwrap();
    assert_eq!(resolved, id);

    // Executor and reader agree on the slot key.
    let writer_key = StorageKey::derive(&resolved, 0u64);
    let reader_key = StorageKey::derive(&AccountIdentifier::from_hex(&id.to_hex()).unwrap(), 0u64);
    assert_eq!(writer_key, reader_key);
    assert_eq!(
        writer_key.to_hex(),
        "2bf1f427d915fe4a3b529072005c71792d324bad4d9f032c1c84c083930f0196"
    );
    assert_ne!(writer_key, StorageKey::derive(&resolved, 1u64));

    // A new contract from this sender lands at the CREATE address.
    let contract = CreateScheme::Legacy { nonce: creation_tx().nonce }.contract_address(&address);
    assert_ne!(contract, address);
}

#[test]
fn test_tampered_transaction_changes_sender() {
    let signed = call_tx().sign(&key()).unwrap();
    let mut bytes = signed.encode().to_vec();
    // Flip the last byte of the data payload (0x55 -> 0x56).
    let pos = bytes.iter().position(|b| *b == 0x55).unwrap();
    bytes[pos] = 0x56;

    match decode(&bytes) {
        Ok(Transaction::Signed(tampered)) => {
            assert_ne!(tampered.sender(), signed.sender());
            assert!(matches!(
                tampered.verify_sender(&signed.sender()),
                Err(CodecError::SignatureMismatch { .. })
            ));
        }
        Err(CodecError::InvalidSignature(_)) => {}
        other => panic!("unexpected decode result: {other:?}"),
    }
}

#[test]
fn test_error_messages_never_contain_key() {
    let bad_sig = Signature {
        r: H256::repeat_byte(0x01),
        s: H256::repeat_byte(0x01),
        v: 35,
    };
    let err = recover_address(&H256::zero(), &bad_sig).unwrap_err();
    assert!(!err.to_string().contains(TEST_KEY));
    assert!(!format!("{:?}", key()).contains(TEST_KEY));
}
