//! TIFF/IFD walker.
//!
//! TIFF/Exif data is a chain of Image File Directories (IFDs), each a list
//! of 12-byte entries:
//! - Tag ID (2 bytes)
//! - Type (2 bytes)
//! - Count (4 bytes), number of values
//! - Value or offset (4 bytes), inline if the value fits in 4 bytes,
//!   otherwise an offset (relative to the TIFF header) to the value data.
//!
//! `IfdWalker` is constructed over the Exif APP1 payload starting at the
//! TIFF header ("II"/"MM" marker) and walks IFD0, its Exif Sub-IFD (tag
//! `0x8769`, flattened into the same list), and, when the caller asks,
//! the GPS (`0x8825`) and Interop (`0xA005`) sub-IFDs, also flattened.
//! Reference: TIFF 6.0 specification, Section 2; Exif 2.32 specification.

use crate::{ByteOrder, Entry, Error, ExifType, RawValue, Result, SRational, URational, Warning};

/// Maximum number of IFD entries accepted in one directory (sanity bound).
const MAX_IFD_ENTRIES: u16 = 10_000;

/// Maximum Sub-IFD recursion depth; defeats cyclic-pointer attacks.
pub const MAX_IFD_DEPTH: u32 = 4;

/// Well-known pointer/thumbnail tag IDs used while walking an IFD chain.
pub mod tags {
    /// Pointer to the Exif Sub-IFD, flattened into the same entry list.
    pub const EXIF_SUB_IFD: u16 = 0x8769;
    /// Pointer to the GPS IFD.
    pub const GPS_IFD: u16 = 0x8825;
    /// Pointer to the Interop IFD.
    pub const INTEROP_IFD: u16 = 0xA005;
    /// JPEGInterchangeFormat, thumbnail offset (IFD1).
    pub const THUMBNAIL_OFFSET: u16 = 0x0201;
    /// JPEGInterchangeFormatLength, thumbnail length (IFD1).
    pub const THUMBNAIL_LENGTH: u16 = 0x0202;
    /// Compression, should be 6 (old JPEG) for a JPEG thumbnail.
    pub const COMPRESSION: u16 = 0x0103;
}

/// Reader over a TIFF/Exif payload, offset-addressed relative to the TIFF
/// header (byte 0 of `data`, i.e. the byte-order marker).
pub struct IfdWalker<'a> {
    data: &'a [u8],
    byte_order: ByteOrder,
}

impl<'a> IfdWalker<'a> {
    /// `data` is the complete TIFF payload, starting at the byte-order
    /// marker (immediately after the 6-byte `"Exif\0\0"` header).
    pub fn new(data: &'a [u8], byte_order: ByteOrder) -> Self {
        Self { data, byte_order }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw bytes at a TIFF-relative offset (used for thumbnail extraction).
    /// Returns `None` if `offset + len` exceeds the payload.
    pub fn get_bytes(&self, offset: usize, len: usize) -> Option<&'a [u8]> {
        if offset.checked_add(len)? <= self.data.len() {
            Some(&self.data[offset..offset + len])
        } else {
            None
        }
    }

    fn read_bytes(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let end = offset.checked_add(len).ok_or(Error::Truncated)?;
        if end > self.data.len() {
            return Err(Error::UnexpectedEnd {
                need: end,
                have: self.data.len(),
            });
        }
        Ok(&self.data[offset..end])
    }

    fn read_u16(&self, offset: usize) -> Result<u16> {
        let b = self.read_bytes(offset, 2)?;
        Ok(self.byte_order.read_u16([b[0], b[1]]))
    }

    fn read_u32(&self, offset: usize) -> Result<u32> {
        let b = self.read_bytes(offset, 4)?;
        Ok(self.byte_order.read_u32([b[0], b[1], b[2], b[3]]))
    }

    /// Parse the 8-byte TIFF header (byte order marker, magic, first IFD
    /// offset) and return the first IFD's offset.
    ///
    /// Exif-in-JPEG embedding never carries BigTIFF: magic must be exactly
    /// `0x002A` (42), not the BigTIFF `0x002B` (43) a generic TIFF reader
    /// would also accept.
    pub fn parse_header(&self) -> Result<u32> {
        if self.data.len() < 8 {
            return Err(Error::UnexpectedEnd {
                need: 8,
                have: self.data.len(),
            });
        }
        let magic = self.read_u16(2)?;
        if magic != 42 {
            return Err(Error::BadTiffMagic(magic));
        }
        self.read_u32(4)
    }

    /// Walk the top-level IFD chain starting at `first_ifd_offset`:
    /// IFD0 (with its Exif/GPS/Interop sub-IFDs flattened in) and, if
    /// present, IFD1 (the thumbnail directory).
    ///
    /// Returns `(image_entries, thumbnail_entries, warnings)`.
    pub fn read_chain(
        &self,
        first_ifd_offset: u32,
    ) -> Result<(Vec<Entry>, Vec<Entry>, Vec<Warning>)> {
        let mut warnings = Vec::new();
        let mut image_entries = Vec::new();
        let next_ifd = self.parse_ifd(first_ifd_offset, 0, &mut image_entries, &mut warnings)?;

        let mut thumbnail_entries = Vec::new();
        if next_ifd != 0 {
            match self.parse_ifd(next_ifd, 0, &mut thumbnail_entries, &mut warnings) {
                Ok(_next) => {}
                Err(e) => warnings.push(Warning::general(format!(
                    "failed to parse thumbnail IFD (IFD1): {e}"
                ))),
            }
        }

        Ok((image_entries, thumbnail_entries, warnings))
    }

    /// Parse one IFD at `offset`, appending its entries (and, for
    /// `0x8769`/`0x8825`/`0xA005` pointers, the flattened Sub-IFD entries)
    /// into `out`. Returns the next-IFD offset (`0` if none).
    fn parse_ifd(
        &self,
        offset: u32,
        depth: u32,
        out: &mut Vec<Entry>,
        warnings: &mut Vec<Warning>,
    ) -> Result<u32> {
        if depth > MAX_IFD_DEPTH {
            return Err(Error::CycleOrDepth);
        }

        let offset = offset as usize;
        if offset >= self.data.len() {
            return Err(Error::OutOfRangeOffset {
                offset: offset as u32,
                size: 0,
                limit: self.data.len(),
            });
        }

        let count = self.read_u16(offset)?;
        if count > MAX_IFD_ENTRIES {
            return Err(Error::TooManyIfdEntries(count, MAX_IFD_ENTRIES));
        }

        for i in 0..count as usize {
            let entry_offset = offset + 2 + i * 12;
            match self.read_entry(entry_offset) {
                Ok(entry) => {
                    let tag = entry.tag;
                    let pointer_value = entry.value.try_as_u32();
                    out.push(entry);

                    if let Some(sub_offset) = pointer_value {
                        let is_subifd_pointer = matches!(
                            tag,
                            tags::EXIF_SUB_IFD | tags::GPS_IFD | tags::INTEROP_IFD
                        );
                        if is_subifd_pointer {
                            match self.parse_ifd(sub_offset, depth + 1, out, warnings) {
                                Ok(_next) => {}
                                Err(Error::CycleOrDepth) => {
                                    warnings.push(Warning::for_tag(
                                        tag,
                                        "Sub-IFD recursion depth exceeded; branch truncated",
                                    ));
                                }
                                Err(e) => warnings.push(Warning::for_tag(
                                    tag,
                                    format!("failed to parse Sub-IFD: {e}"),
                                )),
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(entry_index = i, error = %e, "dropping malformed IFD entry");
                    warnings.push(Warning::general(format!(
                        "entry {i} in IFD at offset {offset}: {e}"
                    )));
                }
            }
        }

        let next_offset_pos = offset + 2 + (count as usize) * 12;
        if next_offset_pos + 4 > self.data.len() {
            return Ok(0);
        }
        self.read_u32(next_offset_pos)
    }

    /// Read and fully resolve a single 12-byte IFD entry at `offset`.
    fn read_entry(&self, offset: usize) -> Result<Entry> {
        let tag = self.read_u16(offset)?;
        let type_code = self.read_u16(offset + 2)?;
        let count = self.read_u32(offset + 4)?;
        let value_field = self.read_u32(offset + 8)?;

        let kind = ExifType::from_u16(type_code)?;
        let size = kind
            .size()
            .checked_mul(count as usize)
            .ok_or(Error::ValueSizeOverflow)?;

        // TIFF 6.0 contract: a value that fits in the 4-byte field is
        // always inline, never an offset, regardless of whether the bytes
        // happen to look like a plausible offset too.
        let (bytes, value) = if size <= 4 {
            let inline = self.read_bytes(offset + 8, 4)?;
            let data = &inline[..size];
            (data.to_vec(), self.decode(kind, count, data)?)
        } else {
            let data_offset = value_field as usize;
            let end = data_offset.checked_add(size).ok_or(Error::Truncated)?;
            if end > self.data.len() {
                return Err(Error::OutOfRangeOffset {
                    offset: value_field,
                    size,
                    limit: self.data.len(),
                });
            }
            let data = &self.data[data_offset..end];
            (data.to_vec(), self.decode(kind, count, data)?)
        };

        Ok(Entry {
            tag,
            kind,
            bytes,
            value,
        })
    }

    /// Decode raw bytes into a `RawValue` according to `kind`, honouring
    /// this reader's declared byte order for every multi-byte scalar.
    fn decode(&self, kind: ExifType, count: u32, data: &[u8]) -> Result<RawValue> {
        let count = count as usize;
        let bo = self.byte_order;

        Ok(match kind {
            ExifType::Byte => RawValue::Byte(data[..count].to_vec()),

            ExifType::Ascii => {
                let s: String = data[..count]
                    .iter()
                    .take_while(|&&b| b != 0)
                    .map(|&b| b as char)
                    .collect();
                RawValue::Ascii(s)
            }

            ExifType::Short => RawValue::Short(
                (0..count)
                    .map(|i| bo.read_u16([data[i * 2], data[i * 2 + 1]]))
                    .collect(),
            ),

            ExifType::Long => RawValue::Long(
                (0..count)
                    .map(|i| {
                        let o = i * 4;
                        bo.read_u32([data[o], data[o + 1], data[o + 2], data[o + 3]])
                    })
                    .collect(),
            ),

            ExifType::Rational => RawValue::Rational(
                (0..count)
                    .map(|i| {
                        let o = i * 8;
                        let num = bo.read_u32([data[o], data[o + 1], data[o + 2], data[o + 3]]);
                        let den =
                            bo.read_u32([data[o + 4], data[o + 5], data[o + 6], data[o + 7]]);
                        URational::new(num, den)
                    })
                    .collect(),
            ),

            ExifType::SByte => RawValue::SByte(data[..count].iter().map(|&b| b as i8).collect()),

            ExifType::Undefined => RawValue::Undefined(data[..count].to_vec()),

            ExifType::SShort => RawValue::SShort(
                (0..count)
                    .map(|i| bo.read_i16([data[i * 2], data[i * 2 + 1]]))
                    .collect(),
            ),

            ExifType::SLong => RawValue::SLong(
                (0..count)
                    .map(|i| {
                        let o = i * 4;
                        bo.read_i32([data[o], data[o + 1], data[o + 2], data[o + 3]])
                    })
                    .collect(),
            ),

            ExifType::SRational => RawValue::SRational(
                (0..count)
                    .map(|i| {
                        let o = i * 8;
                        let num = bo.read_i32([data[o], data[o + 1], data[o + 2], data[o + 3]]);
                        let den =
                            bo.read_i32([data[o + 4], data[o + 5], data[o + 6], data[o + 7]]);
                        SRational::new(num, den)
                    })
                    .collect(),
            ),

            ExifType::Float => RawValue::Float(
                (0..count)
                    .map(|i| {
                        let o = i * 4;
                        bo.read_f32([data[o], data[o + 1], data[o + 2], data[o + 3]])
                    })
                    .collect(),
            ),

            ExifType::Double => RawValue::Double(
                (0..count)
                    .map(|i| {
                        let o = i * 8;
                        bo.read_f64([
                            data[o],
                            data[o + 1],
                            data[o + 2],
                            data[o + 3],
                            data[o + 4],
                            data[o + 5],
                            data[o + 6],
                            data[o + 7],
                        ])
                    })
                    .collect(),
            ),
        })
    }
}
