//! Byte-order, value model, and IFD parser for embedded Exif/TIFF metadata.
//!
//! This crate knows nothing about JPEG segment framing; it starts from
//! the TIFF header inside an Exif APP1 payload (the "II"/"MM" marker) and
//! walks IFD0, its Exif Sub-IFD, and optionally GPS/Interop sub-IFDs,
//! flattening them into one entry list. JPEG-level concerns (marker
//! scanning, APPn dispatch, scan-data walking) live in the `jpegmeta`
//! crate, which depends on this one.

mod byte_order;
mod error;
mod format;
pub mod ifd;
mod value;
mod warning;

pub use byte_order::ByteOrder;
pub use error::{Error, Result};
pub use format::ExifType;
pub use ifd::IfdWalker;
pub use value::{Entry, RawValue, SRational, URational};
pub use warning::Warning;
