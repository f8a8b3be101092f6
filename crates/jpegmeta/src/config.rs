//! Process-wide mutable flags from the original design, re-architected as a
//! plain value threaded through each parse call.

/// Parse-time options. Cheap to copy; pass by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    /// When `true`, the scan walker is invoked to skip past entropy-coded
    /// scan data so segment scanning can continue past the first SOS
    /// (needed to reach a trailing APP1/thumbnail IFD in some files). When
    /// `false` (the default), the scanner terminates at the first SOS.
    pub parse_image_data: bool,
    /// Largest APP1 payload the scanner will buffer into memory, in bytes.
    /// Segments beyond this are skipped rather than read, to bound worst-
    /// case memory use on adversarial length fields.
    pub max_app1_size: usize,
    /// Largest prefix of the entropy-coded scan data (the bytes immediately
    /// following the first SOS marker) captured verbatim into
    /// `RawMetadata::scan_data`, in bytes. This is a bounded snapshot for
    /// downstream consumers (e.g. a hash or a sniff of the compressed
    /// stream), not a decode; it is captured by a non-destructive peek, so
    /// it costs nothing extra on the cursor position whether or not
    /// `parse_image_data` also walks the full scan.
    pub max_scan_snapshot: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            parse_image_data: false,
            max_app1_size: 16 * 1024 * 1024,
            max_scan_snapshot: 64 * 1024,
        }
    }
}
