// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-tagged binary frame codec.
//!
//! Every supported value serializes to a self-describing frame: a 4-byte
//! little-endian type tag followed by either a fixed-width payload
//! (scalars) or an 8-byte count plus payload (countable types). Decoding
//! always returns the value together with the unconsumed remainder of the
//! buffer, so containers and callers can keep parsing without knowing
//! frame lengths up front.

pub mod containers;
pub mod countable;
pub mod record;
pub mod scalars;
pub mod tags;

pub use countable::Blob;
pub use record::JsonRecord;
pub use tags::TypeTag;

use std::error::Error;
use std::fmt;

/// Width of the tag word at the start of every frame.
pub const TAG_SIZE: usize = 4;

/// Width of the count field in countable frames. Fixed at 64 bits on
/// every platform so persisted frames stay portable across hosts.
pub const COUNT_SIZE: usize = 8;

/// Chained underlying cause carried by codec errors.
pub type BoxedCause = Box<dyn Error + Send + Sync>;

/// Read the tag word from the front of `buf`.
///
/// Callers have already verified that `buf` holds at least `TAG_SIZE`
/// bytes.
pub(crate) fn read_tag_word(buf: &[u8]) -> u32 {
    let mut word = [0u8; TAG_SIZE];
    word.copy_from_slice(&buf[..TAG_SIZE]);
    u32::from_le_bytes(word)
}

/// A value that can encode itself into a binary frame.
pub trait CacheEncode {
    /// Append this value's complete frame to `out`.
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), EncodeError>;

    /// Encode this value as a standalone frame.
    fn to_frame(&self) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        self.encode_into(&mut out)?;
        Ok(out)
    }
}

/// A value that can decode itself from the front of a buffer.
pub trait CacheDecode: Sized {
    /// Decode one frame from the front of `buf`.
    ///
    /// Returns the decoded value and the unconsumed remainder of `buf`.
    /// The remainder lets a container feed the bytes left by element `i`
    /// into the decode of element `i + 1`.
    fn decode_from(buf: &[u8]) -> Result<(Self, &[u8]), DecodeError>;
}

/// Encoding failure.
#[derive(Debug)]
pub enum EncodeError {
    /// The value cannot be represented, or a nested element's encode
    /// failed (chained as `cause`).
    InvalidValue {
        tag: TypeTag,
        context: String,
        cause: Option<BoxedCause>,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::InvalidValue { tag, context, .. } => {
                write!(f, "cannot encode {}: {}", tag, context)
            }
        }
    }
}

impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EncodeError::InvalidValue { cause, .. } => {
                cause.as_deref().map(|c| c as &(dyn Error + 'static))
            }
        }
    }
}

/// Decoding failure.
#[derive(Debug)]
pub enum DecodeError {
    /// Buffer shorter than the frame requires. `expected` is the minimum
    /// byte count from the frame start, `actual` what the buffer held.
    InvalidLength {
        tag: TypeTag,
        expected: usize,
        actual: usize,
    },
    /// A tag word is present but does not equal the expected type's tag.
    TypeMismatch { expected: TypeTag, found: u32 },
    /// A nested element or pair inside a container failed to decode;
    /// the inner failure is chained as `cause`.
    ContainerIncomplete {
        tag: TypeTag,
        context: String,
        cause: BoxedCause,
    },
    /// Payload bits inconsistent with the type, e.g. an out-of-range
    /// boolean byte or an undecodable text byte sequence.
    InvalidValue {
        tag: TypeTag,
        context: String,
        cause: Option<BoxedCause>,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidLength {
                tag,
                expected,
                actual,
            } => write!(
                f,
                "cannot decode {}: expected at least {} bytes, but storage is {}",
                tag, expected, actual
            ),
            DecodeError::TypeMismatch { expected, found } => match TypeTag::from_raw(*found) {
                Some(found) => write!(f, "type mismatch: expected {}, found {}", expected, found),
                None => write!(
                    f,
                    "type mismatch: expected {}, found unknown tag {:#010x}",
                    expected, found
                ),
            },
            DecodeError::ContainerIncomplete { tag, context, .. } => {
                write!(f, "cannot decode {}: {}", tag, context)
            }
            DecodeError::InvalidValue { tag, context, .. } => {
                write!(f, "invalid {} payload: {}", tag, context)
            }
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DecodeError::ContainerIncomplete { cause, .. } => {
                Some(cause.as_ref() as &(dyn Error + 'static))
            }
            DecodeError::InvalidValue { cause, .. } => {
                cause.as_deref().map(|c| c as &(dyn Error + 'static))
            }
            _ => None,
        }
    }
}
