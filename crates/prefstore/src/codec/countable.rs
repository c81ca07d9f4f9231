// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Countable frames: the `[tag][count][payload]` layout shared by text,
//! blobs, containers and records, plus the text and blob codecs.
//!
//! For text and blobs the count is a byte length and the payload is raw
//! bytes; for containers the count is an element count and the payload
//! is a run of complete frames.

use super::tags::TypeTag;
use super::{read_tag_word, CacheDecode, CacheEncode, DecodeError, EncodeError, COUNT_SIZE, TAG_SIZE};

/// Append the `[tag][count]` header of a countable frame.
pub(super) fn encode_countable_header(out: &mut Vec<u8>, tag: TypeTag, count: u64) {
    out.extend_from_slice(&tag.raw().to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
}

/// Decode the `[tag][count]` header.
///
/// Returns the count and the remainder positioned at the payload.
pub(super) fn decode_countable_header(
    buf: &[u8],
    tag: TypeTag,
) -> Result<(usize, &[u8]), DecodeError> {
    if buf.len() < TAG_SIZE + COUNT_SIZE {
        return Err(DecodeError::InvalidLength {
            tag,
            expected: TAG_SIZE + COUNT_SIZE,
            actual: buf.len(),
        });
    }
    let found = read_tag_word(buf);
    if found != tag.raw() {
        return Err(DecodeError::TypeMismatch {
            expected: tag,
            found,
        });
    }
    let mut count_bytes = [0u8; COUNT_SIZE];
    count_bytes.copy_from_slice(&buf[TAG_SIZE..TAG_SIZE + COUNT_SIZE]);
    let count = u64::from_le_bytes(count_bytes);
    let count = usize::try_from(count).map_err(|_| DecodeError::InvalidValue {
        tag,
        context: format!("count {} exceeds the platform address range", count),
        cause: None,
    })?;
    Ok((count, &buf[TAG_SIZE + COUNT_SIZE..]))
}

/// Slice `count` payload bytes off the front of `rest`.
///
/// `rest` is the buffer immediately after a countable header; the
/// reported lengths are relative to the frame start.
pub(super) fn take_payload<'a>(
    rest: &'a [u8],
    count: usize,
    tag: TypeTag,
) -> Result<(&'a [u8], &'a [u8]), DecodeError> {
    if rest.len() < count {
        return Err(DecodeError::InvalidLength {
            tag,
            expected: TAG_SIZE + COUNT_SIZE + count,
            actual: TAG_SIZE + COUNT_SIZE + rest.len(),
        });
    }
    Ok(rest.split_at(count))
}

impl CacheEncode for String {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        encode_countable_header(out, TypeTag::Text, self.len() as u64);
        out.extend_from_slice(self.as_bytes());
        Ok(())
    }
}

impl CacheDecode for String {
    fn decode_from(buf: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let (count, rest) = decode_countable_header(buf, TypeTag::Text)?;
        let (payload, rest) = take_payload(rest, count, TypeTag::Text)?;
        let text = std::str::from_utf8(payload).map_err(|e| DecodeError::InvalidValue {
            tag: TypeTag::Text,
            context: "payload is not valid UTF-8".to_string(),
            cause: Some(Box::new(e)),
        })?;
        Ok((text.to_string(), rest))
    }
}

/// Opaque binary payload.
///
/// Distinct from `Vec<T>`: a blob frame stores its bytes raw under a
/// byte-length count, where a sequence frame stores element frames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(pub Vec<u8>);

impl Blob {
    pub fn new(bytes: Vec<u8>) -> Self {
        Blob(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Blob(bytes)
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Self {
        Blob(bytes.to_vec())
    }
}

impl CacheEncode for Blob {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        encode_countable_header(out, TypeTag::Blob, self.0.len() as u64);
        out.extend_from_slice(&self.0);
        Ok(())
    }
}

impl CacheDecode for Blob {
    fn decode_from(buf: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let (count, rest) = decode_countable_header(buf, TypeTag::Blob)?;
        let (payload, rest) = take_payload(rest, count, TypeTag::Blob)?;
        Ok((Blob(payload.to_vec()), rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_frame_layout() {
        let frame = String::from("hi").to_frame().expect("encode text");
        let mut expected = TypeTag::Text.raw().to_le_bytes().to_vec();
        expected.extend_from_slice(&2u64.to_le_bytes());
        expected.extend_from_slice(b"hi");
        assert_eq!(frame, expected);

        let (decoded, rest) = String::decode_from(&frame).expect("decode text");
        assert_eq!(decoded, "hi");
        assert!(rest.is_empty());
    }

    #[test]
    fn test_text_roundtrip_multibyte() {
        let original = String::from("This is String \u{1F60A}");
        let frame = original.to_frame().expect("encode text");
        let (decoded, rest) = String::decode_from(&frame).expect("decode text");
        assert_eq!(decoded, original);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_empty_text() {
        let frame = String::new().to_frame().expect("encode text");
        assert_eq!(frame.len(), TAG_SIZE + COUNT_SIZE);
        let (decoded, rest) = String::decode_from(&frame).expect("decode text");
        assert!(decoded.is_empty());
        assert!(rest.is_empty());
    }

    #[test]
    fn test_text_rejects_invalid_utf8() {
        let mut frame = TypeTag::Text.raw().to_le_bytes().to_vec();
        frame.extend_from_slice(&2u64.to_le_bytes());
        frame.extend_from_slice(&[0xFF, 0xFE]);
        let err = String::decode_from(&frame).unwrap_err();
        match &err {
            DecodeError::InvalidValue { tag, .. } => assert_eq!(*tag, TypeTag::Text),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_truncated_header_is_invalid_length() {
        let frame = String::from("hi").to_frame().expect("encode text");
        let err = String::decode_from(&frame[..10]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidLength {
                tag: TypeTag::Text,
                expected: 12,
                actual: 10,
            }
        ));
    }

    #[test]
    fn test_truncated_payload_is_invalid_length() {
        let frame = String::from("hello").to_frame().expect("encode text");
        let err = String::decode_from(&frame[..frame.len() - 2]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidLength {
                tag: TypeTag::Text,
                ..
            }
        ));
    }

    #[test]
    fn test_blob_roundtrip_with_remainder() {
        let blob = Blob::from(&b"Data data \xE2\x9C\x94"[..]);
        let mut buf = blob.to_frame().expect("encode blob");
        buf.extend_from_slice(&[0x99]);
        let (decoded, rest) = Blob::decode_from(&buf).expect("decode blob");
        assert_eq!(decoded, blob);
        assert_eq!(rest, &[0x99]);
    }

    #[test]
    fn test_blob_is_not_text() {
        let frame = Blob::from(vec![1, 2, 3]).to_frame().expect("encode blob");
        let err = String::decode_from(&frame).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TypeMismatch {
                expected: TypeTag::Text,
                ..
            }
        ));
    }
}
