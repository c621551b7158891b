// ledgerlink/core/primitives/src/rlp.rs

//! Recursive Length Prefix encoding over a tagged item tree.
//!
//! Items are either byte strings or ordered lists of items. Encoding always
//! produces the canonical form; decoding accepts only the canonical form, so
//! two different byte sequences can never decode to the same item.

use crate::error::{CodecError, Result};
use ethereum_types::U256;
use tracing::trace;

const OFFSET_SHORT_STRING: u8 = 0x80;
const OFFSET_LONG_STRING: u8 = 0xb7;
const OFFSET_SHORT_LIST: u8 = 0xc0;
const OFFSET_LONG_LIST: u8 = 0xf7;
const MAX_SHORT_PAYLOAD: usize = 55;

/// Default list nesting limit used by [`decode`].
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// A decoded or to-be-encoded RLP value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RlpItem {
    Bytes(Vec<u8>),
    List(Vec<RlpItem>),
}

impl RlpItem {
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        RlpItem::Bytes(data.into())
    }

    pub fn list(items: impl Into<Vec<RlpItem>>) -> Self {
        RlpItem::List(items.into())
    }

    /// The empty byte string (`0x80`), also the encoding of integer zero.
    pub fn empty() -> Self {
        RlpItem::Bytes(Vec::new())
    }

    /// Unsigned integer as a minimal big-endian byte string.
    pub fn uint(value: impl Into<U256>) -> Self {
        RlpItem::Bytes(encode_uint(value.into()))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, RlpItem::List(_))
    }

    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            RlpItem::Bytes(data) => Ok(data),
            RlpItem::List(_) => Err(CodecError::malformed("expected byte string, found list")),
        }
    }

    pub fn as_list(&self) -> Result<&[RlpItem]> {
        match self {
            RlpItem::List(items) => Ok(items),
            RlpItem::Bytes(_) => Err(CodecError::malformed("expected list, found byte string")),
        }
    }

    pub fn into_list(self) -> Result<Vec<RlpItem>> {
        match self {
            RlpItem::List(items) => Ok(items),
            RlpItem::Bytes(_) => Err(CodecError::malformed("expected list, found byte string")),
        }
    }

    /// Number of bytes [`RlpItem::encode`] will produce.
    pub fn encoded_len(&self) -> usize {
        match self {
            RlpItem::Bytes(data) if is_self_encoding(data) => 1,
            RlpItem::Bytes(data) => header_len(data.len()) + data.len(),
            RlpItem::List(items) => {
                let payload = list_payload_len(items);
                header_len(payload) + payload
            }
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            RlpItem::Bytes(data) if is_self_encoding(data) => out.push(data[0]),
            RlpItem::Bytes(data) => {
                write_header(out, OFFSET_SHORT_STRING, data.len());
                out.extend_from_slice(data);
            }
            RlpItem::List(items) => {
                write_header(out, OFFSET_SHORT_LIST, list_payload_len(items));
                for item in items {
                    item.encode_into(out);
                }
            }
        }
    }
}

impl From<Vec<u8>> for RlpItem {
    fn from(data: Vec<u8>) -> Self {
        RlpItem::Bytes(data)
    }
}

impl From<&[u8]> for RlpItem {
    fn from(data: &[u8]) -> Self {
        RlpItem::Bytes(data.to_vec())
    }
}

impl From<Vec<RlpItem>> for RlpItem {
    fn from(items: Vec<RlpItem>) -> Self {
        RlpItem::List(items)
    }
}

/// Encode an item to its canonical bytes.
pub fn encode(item: &RlpItem) -> Vec<u8> {
    item.encode()
}

/// Decode exactly one canonical item spanning all of `input`.
pub fn decode(input: &[u8]) -> Result<RlpItem> {
    decode_with_depth(input, DEFAULT_MAX_DEPTH)
}

/// Like [`decode`] but with an explicit list nesting limit. A limit of zero
/// accepts only a bare byte string.
pub fn decode_with_depth(input: &[u8], max_depth: usize) -> Result<RlpItem> {
    if input.is_empty() {
        return Err(CodecError::malformed("empty input"));
    }

    let (item, consumed) = decode_item(input, max_depth)?;
    if consumed != input.len() {
        trace!(consumed, total = input.len(), "rejecting rlp with trailing bytes");
        return Err(CodecError::malformed(format!(
            "{} trailing bytes after top-level item",
            input.len() - consumed
        )));
    }
    Ok(item)
}

/// Minimal big-endian bytes of `value`; zero is the empty string.
pub fn encode_uint(value: U256) -> Vec<u8> {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    let skip = (value.leading_zeros() / 8) as usize;
    word[skip..].to_vec()
}

/// Parse a minimal big-endian integer of at most `max_len` bytes.
pub fn decode_uint(bytes: &[u8], max_len: usize) -> Result<U256> {
    let limit = max_len.min(32);
    if bytes.len() > limit {
        return Err(CodecError::malformed(format!(
            "integer of {} bytes exceeds {} byte limit",
            bytes.len(),
            limit
        )));
    }
    if bytes.first() == Some(&0) {
        return Err(CodecError::malformed("integer has a leading zero byte"));
    }
    Ok(U256::from_big_endian(bytes))
}

fn is_self_encoding(data: &[u8]) -> bool {
    data.len() == 1 && data[0] < OFFSET_SHORT_STRING
}

fn list_payload_len(items: &[RlpItem]) -> usize {
    items.iter().map(RlpItem::encoded_len).sum()
}

fn header_len(payload_len: usize) -> usize {
    if payload_len <= MAX_SHORT_PAYLOAD {
        1
    } else {
        1 + minimal_len_bytes(payload_len).len()
    }
}

fn write_header(out: &mut Vec<u8>, offset: u8, payload_len: usize) {
    if payload_len <= MAX_SHORT_PAYLOAD {
        out.push(offset + payload_len as u8);
    } else {
        let len_bytes = minimal_len_bytes(payload_len);
        out.push(offset + MAX_SHORT_PAYLOAD as u8 + len_bytes.len() as u8);
        out.extend_from_slice(&len_bytes);
    }
}

fn minimal_len_bytes(len: usize) -> Vec<u8> {
    let bytes = (len as u64).to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    bytes[skip..].to_vec()
}

struct Header {
    list: bool,
    header_len: usize,
    payload_len: usize,
}

fn read_header(input: &[u8]) -> Result<Header> {
    let prefix = *input
        .first()
        .ok_or_else(|| CodecError::malformed("unexpected end of input"))?;

    match prefix {
        0x00..=0x7f => Ok(Header {
            list: false,
            header_len: 0,
            payload_len: 1,
        }),
        OFFSET_SHORT_STRING..=OFFSET_LONG_STRING => {
            let payload_len = (prefix - OFFSET_SHORT_STRING) as usize;
            if payload_len == 1 {
                if let Some(&byte) = input.get(1) {
                    if byte < OFFSET_SHORT_STRING {
                        return Err(CodecError::malformed(format!(
                            "byte 0x{byte:02x} must encode as itself"
                        )));
                    }
                }
            }
            Ok(Header {
                list: false,
                header_len: 1,
                payload_len,
            })
        }
        0xb8..=0xbf => read_long_header(input, prefix - OFFSET_LONG_STRING, false),
        OFFSET_SHORT_LIST..=OFFSET_LONG_LIST => Ok(Header {
            list: true,
            header_len: 1,
            payload_len: (prefix - OFFSET_SHORT_LIST) as usize,
        }),
        0xf8..=0xff => read_long_header(input, prefix - OFFSET_LONG_LIST, true),
    }
}

fn read_long_header(input: &[u8], len_of_len: u8, list: bool) -> Result<Header> {
    let len_of_len = len_of_len as usize;
    let len_bytes = input
        .get(1..1 + len_of_len)
        .ok_or_else(|| CodecError::malformed("truncated length prefix"))?;

    if len_bytes[0] == 0 {
        return Err(CodecError::malformed("length prefix has a leading zero byte"));
    }
    if len_of_len > std::mem::size_of::<usize>() {
        return Err(CodecError::malformed("length prefix overflows"));
    }

    let payload_len = len_bytes
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize);
    if payload_len <= MAX_SHORT_PAYLOAD {
        return Err(CodecError::malformed(format!(
            "long-form prefix used for a {payload_len} byte payload"
        )));
    }

    Ok(Header {
        list,
        header_len: 1 + len_of_len,
        payload_len,
    })
}

fn decode_item(input: &[u8], depth_left: usize) -> Result<(RlpItem, usize)> {
    let header = read_header(input)?;
    let end = header
        .header_len
        .checked_add(header.payload_len)
        .ok_or_else(|| CodecError::malformed("payload length overflows"))?;
    let payload = input.get(header.header_len..end).ok_or_else(|| {
        CodecError::malformed(format!(
            "declared {} payload bytes, {} available",
            header.payload_len,
            input.len().saturating_sub(header.header_len)
        ))
    })?;

    if !header.list {
        return Ok((RlpItem::Bytes(payload.to_vec()), end));
    }

    if depth_left == 0 {
        return Err(CodecError::malformed("list nesting exceeds limit"));
    }

    let mut items = Vec::new();
    let mut offset = 0;
    while offset < payload.len() {
        let (item, used) = decode_item(&payload[offset..], depth_left - 1)?;
        items.push(item);
        offset += used;
    }

    Ok((RlpItem::List(items), end))
}
