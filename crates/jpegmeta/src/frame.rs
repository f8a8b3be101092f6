//! Start-of-Frame decoding and embedded-thumbnail extraction.

use std::collections::BTreeMap;

use jpegmeta_core::{ifd::tags, Entry, IfdWalker};

/// Decoded SOFn payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub bits_per_sample: u8,
    pub height: u16,
    pub width: u16,
    pub components: u8,
    pub is_color: bool,
    pub encoding_name: &'static str,
}

/// Human-readable encoding name for each of the 13 SOFn marker bytes.
fn encoding_name(marker: u8) -> &'static str {
    match marker {
        0xC0 => "Baseline DCT",
        0xC1 => "Extended Sequential DCT",
        0xC2 => "Progressive DCT",
        0xC3 => "Lossless",
        0xC5 => "Differential Sequential DCT",
        0xC6 => "Differential Progressive DCT",
        0xC7 => "Differential Lossless",
        0xC9 => "Extended Sequential DCT (Arithmetic)",
        0xCA => "Progressive DCT (Arithmetic)",
        0xCB => "Lossless (Arithmetic)",
        0xCD => "Differential Sequential DCT (Arithmetic)",
        0xCE => "Differential Progressive DCT (Arithmetic)",
        0xCF => "Differential Lossless (Arithmetic)",
        _ => "Unknown",
    }
}

/// Decode a SOFn payload: `bitsPerSample(1) | height(2, BE) | width(2, BE) | components(1) | ...`.
/// Returns `None` if the payload is too short to hold the fixed fields.
pub fn parse_sof(marker: u8, payload: &[u8]) -> Option<Frame> {
    if payload.len() < 6 {
        return None;
    }
    let bits_per_sample = payload[0];
    let height = u16::from_be_bytes([payload[1], payload[2]]);
    let width = u16::from_be_bytes([payload[3], payload[4]]);
    let components = payload[5];

    Some(Frame {
        bits_per_sample,
        height,
        width,
        components,
        is_color: components == 3,
        encoding_name: encoding_name(marker),
    })
}

/// Slice the embedded thumbnail JPEG out of the thumbnail IFD (IFD1), per
/// the presence of both `0x0201` (offset) and `0x0202` (length). Returns
/// `(bytes, heuristic)`; `heuristic` is `true` when the `0x0103`
/// Compression tag is absent or not `6` (old JPEG). Best-effort: any
/// failure (missing tags, out-of-range offset, missing signature) returns
/// an empty `Vec` rather than propagating an error.
pub fn extract_thumbnail(
    thumbnail_entries: &BTreeMap<u16, Entry>,
    walker: &IfdWalker<'_>,
) -> (Vec<u8>, bool) {
    let offset = match thumbnail_entries.get(&tags::THUMBNAIL_OFFSET) {
        Some(e) => e.value.as_u32() as usize,
        None => return (Vec::new(), false),
    };
    let length = match thumbnail_entries.get(&tags::THUMBNAIL_LENGTH) {
        Some(e) => e.value.as_u32() as usize,
        None => return (Vec::new(), false),
    };

    let compression = thumbnail_entries.get(&tags::COMPRESSION).map(|e| e.value.as_u32());
    let heuristic = compression != Some(6);

    match walker.get_bytes(offset, length) {
        Some(data) if data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8 => {
            (data.to_vec(), heuristic)
        }
        Some(_) => {
            tracing::warn!(offset, length, "thumbnail data missing JPEG SOI signature");
            (Vec::new(), heuristic)
        }
        None => {
            tracing::warn!(offset, length, "thumbnail offset/length out of range");
            (Vec::new(), heuristic)
        }
    }
}
