//! Top-level error type: JPEG segment framing plus everything from the
//! embedded TIFF/Exif parser.

use thiserror::Error;

/// Segment-level and I/O failures that abort the whole parse.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a JPEG file: missing SOI marker")]
    NotAJpeg,

    #[error("expected 0xFF marker preamble, found something else")]
    BadMarker,

    #[error("segment declared length {0} is smaller than its own 2 length bytes")]
    BadSegmentLength(usize),

    #[error("core error: {0}")]
    Core(#[from] jpegmeta_core::Error),
}

/// Result type alias for the `jpegmeta` crate.
pub type Result<T> = std::result::Result<T, Error>;
