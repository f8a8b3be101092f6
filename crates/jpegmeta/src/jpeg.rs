//! JPEG segment scanner: the outer control loop.
//!
//! JPEG files consist of segments, each starting with a `0xFF` marker:
//! - SOI (0xFFD8) - Start of Image
//! - APP0 (0xFFE0) - JFIF
//! - APP1 (0xFFE1) - Exif or XMP
//! - SOFn - frame header (image dimensions)
//! - SOS (0xFFDA) - Start of Scan: a declared-length header (component
//!   selectors, spectral selection) followed by entropy-coded data of
//!   implicit length
//! - EOI (0xFFD9) - End of Image

use std::collections::BTreeMap;
use std::io::{Read, Seek};

use jpegmeta_core::{ByteOrder, Entry, IfdWalker};

use crate::config::ParseConfig;
use crate::error::Error;
use crate::frame;
use crate::metadata::RawMetadata;
use crate::reader::SegmentReader;
use crate::Result;

/// Wire constants for JPEG segment framing. Marker IDs are the second
/// byte of the `0xFF xx` pair (the leading `0xFF` is stripped by the
/// scanner before dispatch).
pub mod markers {
    pub const SOI: u8 = 0xD8;
    pub const EOI: u8 = 0xD9;
    pub const SOS: u8 = 0xDA;
    pub const DRI: u8 = 0xDD;
    pub const APP0: u8 = 0xE0;
    pub const APP1: u8 = 0xE1;
    pub const COM: u8 = 0xFE;
    pub const TEM: u8 = 0x01;

    /// The 13 Start-of-Frame marker IDs this crate recognises.
    pub const SOF_MARKERS: [u8; 13] = [
        0xC0, 0xC1, 0xC2, 0xC3, 0xC5, 0xC6, 0xC7, 0xC9, 0xCA, 0xCB, 0xCD, 0xCE, 0xCF,
    ];

    /// Restart markers, legal only inside entropy-coded scan data.
    pub const RESTART_LO: u8 = 0xD0;
    pub const RESTART_HI: u8 = 0xD7;

    /// The literal 6-byte Exif APP1 sub-header.
    pub const EXIF_HEADER: &[u8; 6] = b"Exif\0\0";
    /// Leading 4 bytes that distinguish an Exif APP1 payload.
    pub const EXIF_PEEK: &[u8; 4] = b"Exif";
    /// Leading 4 bytes of the Adobe XMP identifier `"http://ns.adobe.com/xap/1.0/\0"`.
    pub const XMP_PEEK: &[u8; 4] = b"http";
}

fn is_sof(marker_id: u8) -> bool {
    markers::SOF_MARKERS.contains(&marker_id)
}

fn is_restart(marker_id: u8) -> bool {
    (markers::RESTART_LO..=markers::RESTART_HI).contains(&marker_id)
}

/// Scan a JPEG byte stream to completion and return everything this
/// library extracts from it.
pub fn scan<R: Read + Seek>(inner: R, config: ParseConfig) -> Result<RawMetadata> {
    let mut reader = SegmentReader::new(inner)?;
    let mut meta = RawMetadata::default();
    let mut restart_markers_allowed = false;

    let soi = reader.read_bytes(2)?;
    if soi != [0xFF, 0xD8] {
        return Err(Error::NotAJpeg);
    }

    loop {
        let m = reader.read_u8()?;
        if m != 0xFF {
            return Err(Error::BadMarker);
        }

        // Padding: a run of extra 0xFF fill bytes before the real marker id.
        let mut marker_id = reader.read_u8()?;
        while marker_id == 0xFF {
            marker_id = reader.read_u8()?;
        }

        tracing::debug!(marker = format!("0xFF{:02X}", marker_id), "dispatch");

        match marker_id {
            markers::EOI => break,

            markers::SOS => {
                // The SOS marker carries its own declared-length header
                // (component selectors, spectral selection) like any other
                // segment; only what follows that header is the
                // implicit-length entropy-coded scan data.
                let data_len = read_segment_body_len(&mut reader)?;
                reader.skip(data_len as u64)?;

                if meta.scan_data.is_empty() {
                    let snapshot_len =
                        (reader.remaining()? as usize).min(config.max_scan_snapshot);
                    meta.scan_data = reader.peek_bytes(snapshot_len)?;
                }
                if config.parse_image_data {
                    scan_walker(&mut reader, restart_markers_allowed)?;
                    continue;
                } else {
                    break;
                }
            }

            markers::TEM => continue,
            id if is_restart(id) => continue,

            markers::DRI => {
                let data_len = read_segment_body_len(&mut reader)?;
                reader.skip(data_len as u64)?;
                restart_markers_allowed = true;
            }

            id if is_sof(id) => {
                let data_len = read_segment_body_len(&mut reader)?;
                let payload = reader.read_bytes(data_len)?;
                if let Some(f) = frame::parse_sof(id, &payload) {
                    meta.frame = Some(f);
                }
            }

            markers::APP0 => {
                let data_len = read_segment_body_len(&mut reader)?;
                let data = reader.read_bytes(data_len)?;
                if data.starts_with(b"JFIF\0") {
                    meta.jfif = data;
                }
            }

            markers::APP1 => {
                let data_len = read_segment_body_len(&mut reader)?;
                handle_app1(&mut reader, data_len, &config, &mut meta)?;
            }

            markers::COM => {
                let data_len = read_segment_body_len(&mut reader)?;
                let mut data = reader.read_bytes(data_len)?;
                if data.last() == Some(&0) {
                    data.pop();
                }
                meta.comment = data;
            }

            _ => {
                let data_len = read_segment_body_len(&mut reader)?;
                reader.skip(data_len as u64)?;
            }
        }
    }

    Ok(meta)
}

/// Read the 2-byte big-endian declared segment length and return the body
/// length (the declared length includes the two length bytes themselves).
fn read_segment_body_len<R: Read + Seek>(reader: &mut SegmentReader<R>) -> Result<usize> {
    let len = reader.read_u16(ByteOrder::BigEndian)? as usize;
    len.checked_sub(2)
        .ok_or(Error::BadSegmentLength(len))
}

/// APP1 dispatch: Exif (invokes the TIFF/IFD walker) vs Adobe XMP vs
/// anything else (skipped).
fn handle_app1<R: Read + Seek>(
    reader: &mut SegmentReader<R>,
    data_len: usize,
    config: &ParseConfig,
    meta: &mut RawMetadata,
) -> Result<()> {
    if data_len > config.max_app1_size {
        tracing::warn!(data_len, limit = config.max_app1_size, "APP1 payload exceeds size limit, skipping");
        reader.skip(data_len as u64)?;
        return Ok(());
    }

    let peek_len = markers::EXIF_PEEK.len().min(data_len);
    let peek = reader.peek_bytes(peek_len)?;

    if peek == markers::EXIF_PEEK {
        let data = reader.read_bytes(data_len)?;
        parse_exif(&data, meta)?;
    } else if peek == markers::XMP_PEEK {
        let data = reader.read_bytes(data_len)?;
        meta.xmp = data;
    } else {
        reader.skip(data_len as u64)?;
    }

    Ok(())
}

/// Parse an Exif APP1 payload: 6-byte header, then hand off to the
/// TIFF/IFD walker for IFD0 (+ flattened Sub-IFDs) and IFD1 (thumbnail).
fn parse_exif(data: &[u8], meta: &mut RawMetadata) -> Result<()> {
    if data.len() < markers::EXIF_HEADER.len() || &data[..6] != markers::EXIF_HEADER {
        return Err(jpegmeta_core::Error::BadExifHeader.into());
    }
    let tiff_data = &data[6..];

    if tiff_data.len() < 2 {
        return Err(jpegmeta_core::Error::UnexpectedEnd {
            need: 2,
            have: tiff_data.len(),
        }
        .into());
    }
    let byte_order = ByteOrder::from_marker([tiff_data[0], tiff_data[1]])?;

    let walker = IfdWalker::new(tiff_data, byte_order);
    let first_ifd_offset = walker.parse_header()?;
    let (image_entries, thumbnail_entries, warnings) = walker.read_chain(first_ifd_offset)?;

    meta.image_entries.extend(entries_to_map(image_entries));
    let thumbnail_map = entries_to_map(thumbnail_entries);
    let (thumbnail, heuristic) = frame::extract_thumbnail(&thumbnail_map, &walker);
    meta.thumbnail_entries = thumbnail_map;
    meta.thumbnail = thumbnail;
    meta.thumbnail_heuristic = heuristic;
    meta.warnings.extend(warnings);

    Ok(())
}

/// Last-occurrence-wins conversion from a flat entry list to a tag map.
fn entries_to_map(entries: Vec<Entry>) -> BTreeMap<u16, Entry> {
    entries.into_iter().map(|e| (e.tag, e)).collect()
}

/// Walk forward through entropy-coded scan data until the next real
/// marker, then reposition the cursor at that marker's `0xFF` so the main
/// loop reads it next. A real marker is `0xFF XX` where `XX` is not a
/// stuffed `0x00` and, when restart markers are allowed, not a restart
/// marker (`0xD0..=0xD7`) either.
fn scan_walker<R: Read + Seek>(
    reader: &mut SegmentReader<R>,
    restart_markers_allowed: bool,
) -> Result<()> {
    loop {
        let mark_pos = reader.position()?;
        let b = reader.read_u8()?;
        if b != 0xFF {
            continue;
        }
        let next = reader.read_u8()?;
        if next == 0x00 {
            continue; // stuffed byte
        }
        if restart_markers_allowed && is_restart(next) {
            continue;
        }
        reader.seek_absolute(mark_pos)?;
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// S1: minimal file, no segments between SOI and EOI.
    #[test]
    fn s1_empty_file_parses_clean() {
        let data = [0xFF, 0xD8, 0xFF, 0xD9];
        let meta = scan(Cursor::new(data), ParseConfig::default()).unwrap();
        assert!(meta.image_entries.is_empty());
        assert!(meta.thumbnail.is_empty());
        assert!(meta.frame.is_none());
    }

    /// S2: APP1 Exif payload with one Ascii entry, all-zero inline bytes.
    #[test]
    fn s2_ascii_make_tag_scenario() {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x26];
        data.extend_from_slice(b"Exif\x00\x00");
        data.extend_from_slice(&[0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00]);
        data.extend_from_slice(&[0x01, 0x00]); // count = 1
        data.extend_from_slice(&[0x0F, 0x01]); // tag 0x010F
        data.extend_from_slice(&[0x02, 0x00]); // type Ascii
        data.extend_from_slice(&[0x05, 0x00, 0x00, 0x00]); // count 5
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // inline value field
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // next ifd offset
        data.extend_from_slice(&[0xFF, 0xD9]);

        let meta = scan(Cursor::new(data), ParseConfig::default()).unwrap();
        let entry = meta.image_entries.get(&0x010F).unwrap();
        assert_eq!(entry.kind, jpegmeta_core::ExifType::Ascii);
        assert_eq!(entry.bytes, vec![0, 0, 0, 0, 0]);
        assert_eq!(entry.value.as_ascii(), "");
    }

    #[test]
    fn bad_soi_is_rejected() {
        let data = [0x00, 0x00];
        assert!(matches!(
            scan(Cursor::new(data), ParseConfig::default()),
            Err(Error::NotAJpeg)
        ));
    }

    #[test]
    fn jfif_app0_is_captured() {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        data.extend_from_slice(b"JFIF\x00");
        data.extend_from_slice(&[0x01, 0x02, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
        data.extend_from_slice(&[0xFF, 0xD9]);

        let meta = scan(Cursor::new(data), ParseConfig::default()).unwrap();
        assert!(meta.jfif.starts_with(b"JFIF\x00"));
    }

    #[test]
    fn comment_segment_trims_trailing_nul() {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xFE, 0x00, 0x08];
        data.extend_from_slice(b"hi\0\0\0\0");
        data.extend_from_slice(&[0xFF, 0xD9]);

        let meta = scan(Cursor::new(data), ParseConfig::default()).unwrap();
        assert!(meta.comment.starts_with(b"hi"));
    }

    /// S6: DRI before SOS, restart markers interleaved in scan data, with
    /// `parse_image_data = true`.
    #[test]
    fn s6_dri_and_restart_markers_in_scan_data() {
        let mut data = vec![0xFF, 0xD8];
        data.extend_from_slice(&[0xFF, 0xDD, 0x00, 0x04, 0x00, 0x01]); // DRI, interval=1
        data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02]); // SOS, empty header; entropy data follows
        data.extend_from_slice(&[0x11, 0x22, 0xFF, 0x00, 0x33, 0xFF, 0xD0, 0x44, 0xFF, 0xD1, 0x55]);
        data.extend_from_slice(&[0xFF, 0xD9]); // EOI: the real next marker

        let config = ParseConfig {
            parse_image_data: true,
            ..ParseConfig::default()
        };
        let meta = scan(Cursor::new(data), config).unwrap();
        // Reaching here without error/hang means the walker correctly
        // skipped the stuffed 0xFF00 and the two restart markers and
        // landed on EOI.
        assert!(meta.image_entries.is_empty());
    }

    #[test]
    fn sos_without_parse_image_data_terminates_scan() {
        let data = vec![0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x02];
        // SOS header length 2 means zero header bytes and no entropy data
        // follows; if the scanner tried to walk scan data anyway it would
        // hit UnexpectedEnd, so termination at SOS must avoid that.
        let meta = scan(Cursor::new(data), ParseConfig::default()).unwrap();
        assert!(meta.frame.is_none());
    }

    /// The bounded scan-data snapshot is captured by a peek even when
    /// `parse_image_data` is false and the scanner terminates right after.
    #[test]
    fn scan_data_snapshot_captured_without_walking() {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x02];
        data.extend_from_slice(&[0x11, 0x22, 0x33, 0x44]);
        let meta = scan(Cursor::new(data), ParseConfig::default()).unwrap();
        assert_eq!(meta.scan_data, vec![0x11, 0x22, 0x33, 0x44]);
    }

    /// The snapshot never exceeds `max_scan_snapshot`, even when more scan
    /// data is available.
    #[test]
    fn scan_data_snapshot_is_bounded() {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x02];
        data.extend_from_slice(&[0xAA; 10]);
        data.extend_from_slice(&[0xFF, 0xD9]);
        let config = ParseConfig {
            max_scan_snapshot: 3,
            ..ParseConfig::default()
        };
        let meta = scan(Cursor::new(data), config).unwrap();
        assert_eq!(meta.scan_data.len(), 3);
    }
}
