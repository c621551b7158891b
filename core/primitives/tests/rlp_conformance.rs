// Cross-checks the RLP codec against the reference `rlp` crate and
// exercises the round-trip property over generated item trees.

use ledgerlink_primitives::rlp::{decode, encode_uint};
use ledgerlink_primitives::{CodecError, RlpItem, U256};
use proptest::prelude::*;
use rlp::RlpStream;

fn append_reference(stream: &mut RlpStream, item: &RlpItem) {
    match item {
        RlpItem::Bytes(data) => {
            stream.append(&data.as_slice());
        }
        RlpItem::List(items) => {
            stream.begin_list(items.len());
            for inner in items {
                append_reference(stream, inner);
            }
        }
    }
}

fn reference_encode(item: &RlpItem) -> Vec<u8> {
    let mut stream = RlpStream::new();
    append_reference(&mut stream, item);
    stream.out().to_vec()
}

fn arb_item() -> impl Strategy<Value = RlpItem> {
    let leaf = prop_oneof![
        any::<u8>().prop_map(|b| RlpItem::bytes(vec![b])),
        proptest::collection::vec(any::<u8>(), 0..80).prop_map(RlpItem::Bytes),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        proptest::collection::vec(inner, 0..8).prop_map(RlpItem::List)
    })
}

#[test]
fn test_account_name_address_pair_matches_reference() {
    let address = [0x2cu8; 20];
    let ours = RlpItem::list(vec![
        RlpItem::bytes(b"alice".to_vec()),
        RlpItem::bytes(address.to_vec()),
    ])
    .encode();

    let mut stream = RlpStream::new_list(2);
    stream.append(&"alice".as_bytes());
    stream.append(&address.as_slice());
    assert_eq!(ours, stream.out().to_vec());
}

#[test]
fn test_integers_match_reference() {
    for value in [0u64, 1, 0x7f, 0x80, 0xff, 0x0100, 0x0186a0, 0x5af3107a4000, u64::MAX] {
        let ours = RlpItem::uint(value).encode();
        let reference = rlp::encode(&value).to_vec();
        assert_eq!(ours, reference, "integer {value:#x}");
    }

    let wei = U256::from(0x0de0b6b3a7640000u64);
    assert_eq!(encode_uint(wei), vec![0x0d, 0xe0, 0xb6, 0xb3, 0xa7, 0x64, 0x00, 0x00]);
}

#[test]
fn test_long_list_header_matches_reference() {
    let item = RlpItem::list(vec![RlpItem::bytes(vec![0x11; 40]); 3]);
    assert_eq!(item.encode(), reference_encode(&item));
    assert_eq!(item.encode()[0], 0xf8);
}

#[test]
fn test_reference_output_decodes() {
    let mut stream = RlpStream::new_list(3);
    stream.append(&1u64);
    stream.append(&"ledger".as_bytes());
    stream.begin_list(0);
    let bytes = stream.out().to_vec();

    let item = decode(&bytes).unwrap();
    let items = item.as_list().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_bytes().unwrap(), &[0x01]);
    assert_eq!(items[1].as_bytes().unwrap(), b"ledger");
    assert_eq!(items[2], RlpItem::List(vec![]));
}

#[test]
fn test_non_canonical_size_prefix_is_rejected() {
    // "dog" with a one-byte long-form length instead of 0x83.
    let result = decode(&[0xb8, 0x03, b'd', b'o', b'g']);
    assert!(matches!(result, Err(CodecError::MalformedEncoding(_))));
}

proptest! {
    #[test]
    fn prop_round_trip(item in arb_item()) {
        let encoded = item.encode();
        prop_assert_eq!(encoded.len(), item.encoded_len());
        prop_assert_eq!(decode(&encoded).unwrap(), item);
    }

    #[test]
    fn prop_matches_reference_encoder(item in arb_item()) {
        prop_assert_eq!(item.encode(), reference_encode(&item));
    }

    #[test]
    fn prop_trailing_garbage_rejected(item in arb_item(), extra in any::<u8>()) {
        let mut encoded = item.encode();
        encoded.push(extra);
        prop_assert!(decode(&encoded).is_err());
    }
}
