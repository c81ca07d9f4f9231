// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Recursive container codecs for sequences and mappings.
//!
//! Element payloads are complete frames laid end to end; decoding
//! element `i` consumes the remainder produced by element `i - 1`, and a
//! mapping entry is a key frame immediately followed by a value frame.
//! Any nested failure aborts the whole container decode.

use std::collections::HashMap;
use std::hash::Hash;

use super::countable::{decode_countable_header, encode_countable_header};
use super::tags::TypeTag;
use super::{CacheDecode, CacheEncode, DecodeError, EncodeError};

impl<T: CacheEncode> CacheEncode for Vec<T> {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        encode_countable_header(out, TypeTag::Seq, self.len() as u64);
        for (index, element) in self.iter().enumerate() {
            element.encode_into(out).map_err(|e| EncodeError::InvalidValue {
                tag: TypeTag::Seq,
                context: format!("element {} failed to encode", index),
                cause: Some(Box::new(e)),
            })?;
        }
        Ok(())
    }
}

impl<T: CacheDecode> CacheDecode for Vec<T> {
    fn decode_from(buf: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let (count, mut rest) = decode_countable_header(buf, TypeTag::Seq)?;
        let mut elements = Vec::new();
        for index in 0..count {
            let (element, remainder) =
                T::decode_from(rest).map_err(|e| DecodeError::ContainerIncomplete {
                    tag: TypeTag::Seq,
                    context: format!("element {} of {} failed to decode", index, count),
                    cause: Box::new(e),
                })?;
            elements.push(element);
            rest = remainder;
        }
        Ok((elements, rest))
    }
}

impl<K: CacheEncode, V: CacheEncode> CacheEncode for HashMap<K, V> {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        encode_countable_header(out, TypeTag::Map, self.len() as u64);
        for (key, value) in self {
            key.encode_into(out).map_err(|e| EncodeError::InvalidValue {
                tag: TypeTag::Map,
                context: "map key failed to encode".to_string(),
                cause: Some(Box::new(e)),
            })?;
            value.encode_into(out).map_err(|e| EncodeError::InvalidValue {
                tag: TypeTag::Map,
                context: "map value failed to encode".to_string(),
                cause: Some(Box::new(e)),
            })?;
        }
        Ok(())
    }
}

impl<K: CacheDecode + Eq + Hash, V: CacheDecode> CacheDecode for HashMap<K, V> {
    fn decode_from(buf: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let (count, mut rest) = decode_countable_header(buf, TypeTag::Map)?;
        let mut map = HashMap::new();
        for index in 0..count {
            let (key, after_key) =
                K::decode_from(rest).map_err(|e| DecodeError::ContainerIncomplete {
                    tag: TypeTag::Map,
                    context: format!("key of entry {} failed to decode", index),
                    cause: Box::new(e),
                })?;
            let (value, after_value) =
                V::decode_from(after_key).map_err(|e| DecodeError::ContainerIncomplete {
                    tag: TypeTag::Map,
                    context: format!("value of entry {} failed to decode", index),
                    cause: Box::new(e),
                })?;
            // Keys are unique by construction; a duplicate keeps the
            // last value.
            map.insert(key, value);
            rest = after_value;
        }
        Ok((map, rest))
    }
}
