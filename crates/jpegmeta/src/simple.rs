//! Flattened, convenience projection of the well-known Exif/SOF tags.

use std::path::Path;

use jpegmeta_core::{Entry, ExifType};

use crate::metadata::RawMetadata;

/// `Orientation` (tag `0x0112`), one of the eight EXIF-standard values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    Transpose,
    Rotate90Cw,
    Transverse,
    Rotate270Cw,
}

impl Orientation {
    fn from_u32(v: u32) -> Option<Self> {
        match v {
            1 => Some(Self::Normal),
            2 => Some(Self::FlipHorizontal),
            3 => Some(Self::Rotate180),
            4 => Some(Self::FlipVertical),
            5 => Some(Self::Transpose),
            6 => Some(Self::Rotate90Cw),
            7 => Some(Self::Transverse),
            8 => Some(Self::Rotate270Cw),
            _ => None,
        }
    }
}

/// `ExposureProgram` (tag `0x8822`), one of the nine EXIF-standard values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureProgram {
    NotDefined,
    Manual,
    Normal,
    AperturePriority,
    ShutterPriority,
    Creative,
    Action,
    Portrait,
    Landscape,
}

impl ExposureProgram {
    fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(Self::NotDefined),
            1 => Some(Self::Manual),
            2 => Some(Self::Normal),
            3 => Some(Self::AperturePriority),
            4 => Some(Self::ShutterPriority),
            5 => Some(Self::Creative),
            6 => Some(Self::Action),
            7 => Some(Self::Portrait),
            8 => Some(Self::Landscape),
            _ => None,
        }
    }
}

/// Flattened subset of the tags a caller typically wants, without having
/// to know Exif tag numbers.
#[derive(Debug, Clone, Default)]
pub struct SimpleMetadata {
    pub name: String,

    pub width: Option<u16>,
    pub height: Option<u16>,
    pub bits_per_sample: Option<u8>,
    pub encoding: Option<&'static str>,
    pub color_components: Option<u8>,
    pub is_color: Option<bool>,

    pub software: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub orientation: Option<Orientation>,
    pub iso: Option<u32>,
    pub exposure_time: Option<f64>,
    /// f-number derived from the APEX `ApertureValue` via `exp(apex * ln(2) / 2)`.
    pub aperture_value: Option<f64>,
    pub max_aperture: Option<f64>,
    pub focal_length_in_35mm: Option<u32>,
    pub exposure_program: Option<ExposureProgram>,
    pub lens_model: Option<String>,
    pub original_create_date: Option<String>,
    pub modify_date: Option<String>,
    pub copyright: Option<String>,
    pub artist: Option<String>,
}

mod well_known_tags {
    pub const SOFTWARE: u16 = 0x0131;
    pub const MAKE: u16 = 0x010F;
    pub const MODEL: u16 = 0x0110;
    pub const ORIENTATION: u16 = 0x0112;
    pub const ISO: u16 = 0x8827;
    pub const EXPOSURE_TIME: u16 = 0x829A;
    pub const APERTURE_VALUE: u16 = 0x9202;
    pub const MAX_APERTURE: u16 = 0x9205;
    pub const FOCAL_LENGTH_IN_35MM: u16 = 0xA405;
    pub const EXPOSURE_PROGRAM: u16 = 0x8822;
    pub const LENS_MODEL: u16 = 0xA434;
    pub const ORIGINAL_CREATE_DATE: u16 = 0x9003;
    pub const MODIFY_DATE: u16 = 0x0132;
    pub const COPYRIGHT: u16 = 0x8298;
    pub const ARTIST: u16 = 0x013B;
}

fn ascii(entries: &std::collections::BTreeMap<u16, Entry>, tag: u16) -> Option<String> {
    entries.get(&tag).map(|e| e.value.as_ascii().to_string())
}

/// ISO is read via whichever `ExifType` the entry actually declares
/// (`Short` or `Long`) rather than hard-wired to `Short`, since modern
/// cameras can write ISO values that overflow a 16-bit field.
fn iso(entries: &std::collections::BTreeMap<u16, Entry>) -> Option<u32> {
    let entry = entries.get(&well_known_tags::ISO)?;
    match entry.kind {
        ExifType::Short | ExifType::Long => Some(entry.value.as_u32()),
        _ => None,
    }
}

/// APEX aperture value to f-number: `exp(apex * ln(2) / 2)`.
fn apex_to_fnumber(apex: f64) -> f64 {
    (apex * std::f64::consts::LN_2 / 2.0).exp()
}

/// Project a [`RawMetadata`] into the flattened, well-known-tag view.
pub fn project(name: impl AsRef<Path>, raw: &RawMetadata) -> SimpleMetadata {
    use well_known_tags::*;

    let entries = &raw.image_entries;
    let mut out = SimpleMetadata {
        name: name
            .as_ref()
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        ..Default::default()
    };

    if let Some(f) = &raw.frame {
        out.width = Some(f.width);
        out.height = Some(f.height);
        out.bits_per_sample = Some(f.bits_per_sample);
        out.encoding = Some(f.encoding_name);
        out.color_components = Some(f.components);
        out.is_color = Some(f.is_color);
    }

    out.software = ascii(entries, SOFTWARE);
    out.make = ascii(entries, MAKE);
    out.model = ascii(entries, MODEL);
    out.orientation = entries
        .get(&ORIENTATION)
        .and_then(|e| Orientation::from_u32(e.value.as_u32()));
    out.iso = iso(entries);
    out.exposure_time = entries.get(&EXPOSURE_TIME).map(|e| e.value.as_urational().to_f64());
    out.aperture_value = entries
        .get(&APERTURE_VALUE)
        .map(|e| apex_to_fnumber(e.value.as_urational().to_f64()));
    out.max_aperture = entries.get(&MAX_APERTURE).map(|e| e.value.as_urational().to_f64());
    out.focal_length_in_35mm = entries.get(&FOCAL_LENGTH_IN_35MM).map(|e| e.value.as_u32());
    out.exposure_program = entries
        .get(&EXPOSURE_PROGRAM)
        .and_then(|e| ExposureProgram::from_u32(e.value.as_u32()));
    out.lens_model = ascii(entries, LENS_MODEL);
    out.original_create_date = ascii(entries, ORIGINAL_CREATE_DATE);
    out.modify_date = ascii(entries, MODIFY_DATE);
    out.copyright = ascii(entries, COPYRIGHT);
    out.artist = ascii(entries, ARTIST);

    out
}
