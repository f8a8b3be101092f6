//! Error types for the IFD/TIFF parsing core.
//!
//! These are the failures that can occur strictly within a well-formed
//! Exif APP1 payload: a malformed header, an offset that escapes the
//! payload, a value whose declared size overflows, or a type mismatch at
//! the accessor boundary. Segment-level failures (bad JPEG framing, I/O)
//! live one layer up, in `jpegmeta::Error`.

use thiserror::Error;

use crate::format::ExifType;

/// Core IFD/TIFF parsing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of data: need {need} bytes, have {have}")]
    UnexpectedEnd { need: usize, have: usize },

    #[error("missing or malformed Exif header")]
    BadExifHeader,

    #[error("invalid byte order marker: expected 'II' or 'MM', got {0:?}")]
    BadByteOrder([u8; 2]),

    #[error("invalid TIFF magic: expected 0x002A, got 0x{0:04X}")]
    BadTiffMagic(u16),

    #[error("invalid Exif value type code: {0}")]
    InvalidType(u16),

    #[error("tag 0x{tag:04X}: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        tag: u16,
        expected: ExifType,
        found: ExifType,
    },

    #[error("value offset escapes the APP1 payload")]
    Truncated,

    #[error("offset {offset} + size {size} exceeds payload length {limit}")]
    OutOfRangeOffset { offset: u32, size: usize, limit: usize },

    #[error("value size overflow: type size * count overflows usize")]
    ValueSizeOverflow,

    #[error("IFD recursion depth exceeded (cyclic or too-deep Sub-IFD chain)")]
    CycleOrDepth,

    #[error("IFD entry count {0} exceeds maximum {1}")]
    TooManyIfdEntries(u16, u16),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
