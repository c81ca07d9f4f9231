// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structured-record adapter.
//!
//! Record types outside the built-in catalog are framed through the
//! general-purpose JSON codec: the serializer output becomes the payload
//! of a countable frame under the record tag, with the count holding the
//! payload byte length.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::countable::{decode_countable_header, encode_countable_header, take_payload};
use super::tags::TypeTag;
use super::{CacheDecode, CacheEncode, DecodeError, EncodeError};

/// Wrapper that stores any serde-codable value as a JSON record frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JsonRecord<T> {
    pub value: T,
}

impl<T> JsonRecord<T> {
    pub fn new(value: T) -> Self {
        JsonRecord { value }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Serialize> CacheEncode for JsonRecord<T> {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        let payload = serde_json::to_vec(&self.value).map_err(|e| EncodeError::InvalidValue {
            tag: TypeTag::Record,
            context: "record failed to serialize".to_string(),
            cause: Some(Box::new(e)),
        })?;
        encode_countable_header(out, TypeTag::Record, payload.len() as u64);
        out.extend_from_slice(&payload);
        Ok(())
    }
}

impl<T: DeserializeOwned> CacheDecode for JsonRecord<T> {
    fn decode_from(buf: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let (count, rest) = decode_countable_header(buf, TypeTag::Record)?;
        let (payload, rest) = take_payload(rest, count, TypeTag::Record)?;
        let value =
            serde_json::from_slice(payload).map_err(|e| DecodeError::ContainerIncomplete {
                tag: TypeTag::Record,
                context: "record failed to deserialize".to_string(),
                cause: Box::new(e),
            })?;
        Ok((JsonRecord { value }, rest))
    }
}
