use std::fmt;

use thiserror::Error;

/// Value kinds that are read with a fixed width (plus the padded string
/// tail), used to make `TooShort` errors specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Float,
    Int64,
    TimeTag,
    Double,
    Char,
    Rgba,
    Midi,
    Length,
    String,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Int64 => "int64",
            ValueKind::TimeTag => "time tag",
            ValueKind::Double => "double",
            ValueKind::Char => "char",
            ValueKind::Rgba => "rgba",
            ValueKind::Midi => "midi",
            ValueKind::Length => "length",
            ValueKind::String => "string padding",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors returned by OSC packet decoding.
///
/// Decoding stops at the first error; no partial packet is ever returned.
///
/// # Examples
/// ```
/// use vmcparser_core::osc::{OscError, read_packet};
///
/// let err = read_packet(b"").unwrap_err();
/// assert!(matches!(err, OscError::InputEmpty));
/// assert!(err.to_string().contains("input data is empty"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OscError {
    #[error("input data is empty")]
    InputEmpty,
    #[error("content is too short for {kind}: need {needed} bytes, got {actual}")]
    TooShort {
        kind: ValueKind,
        needed: usize,
        actual: usize,
    },
    #[error("string missing 0 terminator")]
    MissingTerminator,
    #[error("invalid negative length: {length}")]
    NegativeLength { length: i32 },
    #[error("content is too short for a blob: need {needed} bytes, got {actual}")]
    BlobTooShort { needed: usize, actual: usize },
    #[error("invalid packet (neither message nor bundle), first byte 0x{marker:02x}")]
    InvalidPacket { marker: u8 },
    #[error("invalid bundle identifier")]
    InvalidBundleIdentifier,
    #[error("element content is too short: need {needed} bytes, got {actual}")]
    ElementTooShort { needed: usize, actual: usize },
    #[error("expected start of type tags")]
    TypeTagsStartMissing,
    #[error("unknown type tag `{tag}`")]
    UnknownTypeTag { tag: char },
    #[error("arrays not supported")]
    ArraysNotSupported,
}

impl OscError {
    /// Stable identifier used in analysis reports.
    pub fn code(&self) -> &'static str {
        match self {
            OscError::InputEmpty => "OSC-INPUT-EMPTY",
            OscError::TooShort { .. } => "OSC-TOO-SHORT",
            OscError::MissingTerminator => "OSC-MISSING-TERMINATOR",
            OscError::NegativeLength { .. } => "OSC-NEGATIVE-LENGTH",
            OscError::BlobTooShort { .. } => "OSC-BLOB-TOO-SHORT",
            OscError::InvalidPacket { .. } => "OSC-INVALID-PACKET",
            OscError::InvalidBundleIdentifier => "OSC-INVALID-BUNDLE-IDENTIFIER",
            OscError::ElementTooShort { .. } => "OSC-ELEMENT-TOO-SHORT",
            OscError::TypeTagsStartMissing => "OSC-TYPE-TAGS-MISSING",
            OscError::UnknownTypeTag { .. } => "OSC-UNKNOWN-TYPE-TAG",
            OscError::ArraysNotSupported => "OSC-ARRAYS-NOT-SUPPORTED",
        }
    }
}
