// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scalar frame codecs: booleans, fixed-width integers and floats, and
//! timestamps.
//!
//! Numeric frames are `[4-byte tag][N-byte little-endian payload]`.
//! Booleans are a single tag word with the truth value OR'd into its low
//! bits, because a boolean's only information is one bit.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::tags::{TypeTag, BOOL_TRUTH_BIT};
use super::{read_tag_word, CacheDecode, CacheEncode, DecodeError, EncodeError, TAG_SIZE};

/// Append a fixed-width scalar frame: tag word, then payload.
fn encode_fixed(out: &mut Vec<u8>, tag: TypeTag, payload: &[u8]) {
    out.extend_from_slice(&tag.raw().to_le_bytes());
    out.extend_from_slice(payload);
}

/// Decode a fixed-width scalar frame.
///
/// Checks the buffer length, verifies the tag by exact equality and
/// returns the payload bytes plus the remainder after them.
fn decode_fixed<const N: usize>(
    buf: &[u8],
    tag: TypeTag,
) -> Result<([u8; N], &[u8]), DecodeError> {
    if buf.len() < TAG_SIZE + N {
        return Err(DecodeError::InvalidLength {
            tag,
            expected: TAG_SIZE + N,
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
    let mut payload = [0u8; N];
    payload.copy_from_slice(&buf[TAG_SIZE..TAG_SIZE + N]);
    Ok((payload, &buf[TAG_SIZE + N..]))
}

/// Generate the codec impls for a fixed-width numeric type.
macro_rules! impl_numeric_codec {
    ($ty:ty, $tag:expr, $size:expr) => {
        impl CacheEncode for $ty {
            fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
                encode_fixed(out, $tag, &self.to_le_bytes());
                Ok(())
            }
        }

        impl CacheDecode for $ty {
            fn decode_from(buf: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
                let (payload, rest) = decode_fixed::<$size>(buf, $tag)?;
                Ok((<$ty>::from_le_bytes(payload), rest))
            }
        }
    };
}

impl_numeric_codec!(i32, TypeTag::Int32, 4);
impl_numeric_codec!(i64, TypeTag::Int64, 8);
impl_numeric_codec!(u32, TypeTag::UInt32, 4);
impl_numeric_codec!(u64, TypeTag::UInt64, 8);
impl_numeric_codec!(f32, TypeTag::Float, 4);
impl_numeric_codec!(f64, TypeTag::Double, 8);

impl CacheEncode for bool {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        let word = TypeTag::Bool.raw() | u32::from(*self);
        out.extend_from_slice(&word.to_le_bytes());
        Ok(())
    }
}

impl CacheDecode for bool {
    fn decode_from(buf: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        if buf.len() < TAG_SIZE {
            return Err(DecodeError::InvalidLength {
                tag: TypeTag::Bool,
                expected: TAG_SIZE,
                actual: buf.len(),
            });
        }
        let word = read_tag_word(buf);
        // Only the boolean marker bit is checked; the remaining tag bits
        // are reserved.
        if word & TypeTag::Bool.raw() != TypeTag::Bool.raw() {
            return Err(DecodeError::InvalidValue {
                tag: TypeTag::Bool,
                context: format!("word {:#010x} does not carry the boolean marker bit", word),
                cause: None,
            });
        }
        let truth = word & 0xFF;
        if truth > BOOL_TRUTH_BIT {
            return Err(DecodeError::InvalidValue {
                tag: TypeTag::Bool,
                context: format!("boolean byte out of range: {:#04x}", truth),
                cause: None,
            });
        }
        Ok((truth == BOOL_TRUTH_BIT, &buf[TAG_SIZE..]))
    }
}

impl CacheEncode for SystemTime {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        // Seconds since the Unix epoch as an IEEE-754 double; negative
        // for pre-epoch instants. Only this precision survives a round
        // trip.
        let secs = match self.duration_since(UNIX_EPOCH) {
            Ok(offset) => offset.as_secs_f64(),
            Err(before) => -before.duration().as_secs_f64(),
        };
        encode_fixed(out, TypeTag::Timestamp, &secs.to_le_bytes());
        Ok(())
    }
}

impl CacheDecode for SystemTime {
    fn decode_from(buf: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let (payload, rest) = decode_fixed::<8>(buf, TypeTag::Timestamp)?;
        let secs = f64::from_le_bytes(payload);
        let magnitude = Duration::try_from_secs_f64(secs.abs()).map_err(|e| {
            DecodeError::InvalidValue {
                tag: TypeTag::Timestamp,
                context: format!("{} is not a representable epoch offset", secs),
                cause: Some(Box::new(e)),
            }
        })?;
        let instant = if secs >= 0.0 {
            UNIX_EPOCH.checked_add(magnitude)
        } else {
            UNIX_EPOCH.checked_sub(magnitude)
        };
        let instant = instant.ok_or_else(|| DecodeError::InvalidValue {
            tag: TypeTag::Timestamp,
            context: format!("{} is outside the representable time range", secs),
            cause: None,
        })?;
        Ok((instant, rest))
    }
}
