//! The raw-parse result aggregate.

use std::collections::BTreeMap;

use jpegmeta_core::{Entry, Warning};

use crate::frame::Frame;

/// Everything extracted from one JPEG file by [`crate::parse_raw`].
///
/// Constructed once per call; every byte sequence here is an owned copy,
/// the underlying file handle is dropped before the caller sees this.
#[derive(Debug, Clone, Default)]
pub struct RawMetadata {
    /// IFD0 and its Exif/GPS/Interop Sub-IFD tags, merged. `BTreeMap` keeps
    /// iteration order deterministic by tag, which is load-bearing for
    /// reproducible snapshots and equality checks across repeated parses.
    pub image_entries: BTreeMap<u16, Entry>,
    /// IFD1 (the thumbnail directory) tags.
    pub thumbnail_entries: BTreeMap<u16, Entry>,
    /// The embedded thumbnail JPEG, sliced from the thumbnail IFD. Empty if absent or if
    /// extraction failed.
    pub thumbnail: Vec<u8>,
    /// `true` if the thumbnail's Compression tag was absent or not `6`
    /// (old JPEG), i.e. the thumbnail was extracted on a best guess
    /// rather than a confirmed tag.
    pub thumbnail_heuristic: bool,
    /// Decoded Start-of-Frame fields, if a SOFn marker was seen.
    pub frame: Option<Frame>,
    /// Raw bytes of the APP0 JFIF payload, if present.
    pub jfif: Vec<u8>,
    /// Raw bytes of the APP1 Adobe XMP payload, if present. Opaque;
    /// this crate never parses XMP's internal XML structure.
    pub xmp: Vec<u8>,
    /// Raw bytes of the COM comment segment, if present, trimmed of a
    /// single trailing NUL.
    pub comment: Vec<u8>,
    /// Bounded snapshot of the entropy-coded data immediately following the
    /// first SOS marker, up to `ParseConfig::max_scan_snapshot` bytes.
    /// Captured by a non-destructive peek regardless of `parse_image_data`;
    /// not a decode of the compressed pixels, just raw bytes preserved for
    /// downstream consumers.
    pub scan_data: Vec<u8>,
    /// Per-entry soft failures collected during parsing (dropped IFD
    /// entries, best-effort thumbnail extraction failures). Also logged
    /// via `tracing::warn!` as they occur.
    pub warnings: Vec<Warning>,
}
