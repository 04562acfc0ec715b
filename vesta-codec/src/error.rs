use std::borrow::Cow;

use thiserror::Error;

use crate::decoder::Type;

/// Errors surfaced by the decoder, the encoder and the codec impls built on
/// top of them.
///
/// Decode-side variants carry the position of the offending byte; the cursor
/// of the [`crate::Decoder`] is left at that same position so callers can
/// inspect the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of input at position {0}")]
    UnexpectedEof(usize),

    #[error("unexpected cbor type {found} at position {pos}, expected {expected}")]
    TypeMismatch {
        expected: &'static str,
        found: Type,
        pos: usize,
    },

    #[error("invalid cbor value at position {pos}: {msg}")]
    InvalidValue { msg: Cow<'static, str>, pos: usize },

    #[error("invalid array size for {what}, expected {expected} elements")]
    InvalidArrayLength {
        what: &'static str,
        expected: u64,
        found: Option<u64>,
    },

    #[error("invalid map size for {what}, expected {expected} entries")]
    InvalidMapLength {
        what: &'static str,
        expected: u64,
        found: Option<u64>,
    },

    #[error("extra elements found while decoding {what}")]
    TrailingElements { what: &'static str },

    #[error("unexpected tag {found} for {what}, expected tag {expected}")]
    UnexpectedTag {
        what: &'static str,
        expected: u64,
        found: u64,
    },

    #[error("unknown variant id {id} for {what}")]
    UnknownVariant { what: &'static str, id: u64 },

    #[error("duplicate key while decoding {what}")]
    DuplicateKey { what: &'static str },

    #[error("nesting depth exceeds the supported maximum of {max} levels")]
    MaxDepthExceeded { max: usize },

    #[error("value doesn't fit within {what}")]
    IntOverflow { what: &'static str },

    #[error("{what} of {len} bytes exceeds the maximum of {max}")]
    MaxLength {
        what: &'static str,
        len: usize,
        max: usize,
    },

    #[error("trailing data after top-level item at position {0}")]
    TrailingData(usize),

    #[error("{0}")]
    Message(Cow<'static, str>),
}

impl Error {
    /// Free-form error with human-readable context.
    pub fn message(msg: impl Into<Cow<'static, str>>) -> Self {
        Error::Message(msg.into())
    }

    /// Diagnostic for an unrecognized discriminant of a tagged sum.
    pub fn unknown_variant(what: &'static str, id: u64) -> Self {
        Error::UnknownVariant { what, id }
    }
}
