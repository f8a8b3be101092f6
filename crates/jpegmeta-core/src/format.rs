//! Exif physical value types.
//!
//! The Exif/TIFF specification defines twelve physical types for tag
//! values, each with a fixed per-element byte size. Any other type code
//! encountered on the wire is invalid; the owning IFD entry is dropped
//! rather than failing the whole parse (see `jpegmeta_core::ifd`).

use crate::{Error, Result};

/// The twelve Exif/TIFF physical value types, with their per-element size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ExifType {
    /// Unsigned 8-bit integer (BYTE).
    Byte = 1,
    /// ASCII string, null-terminated (ASCII).
    Ascii = 2,
    /// Unsigned 16-bit integer (SHORT).
    Short = 3,
    /// Unsigned 32-bit integer (LONG).
    Long = 4,
    /// Unsigned rational: two LONG values (numerator/denominator) (RATIONAL).
    Rational = 5,
    /// Signed 8-bit integer (SBYTE).
    SByte = 6,
    /// Undefined byte sequence (UNDEFINED).
    Undefined = 7,
    /// Signed 16-bit integer (SSHORT).
    SShort = 8,
    /// Signed 32-bit integer (SLONG).
    SLong = 9,
    /// Signed rational: two SLONG values (numerator/denominator) (SRATIONAL).
    SRational = 10,
    /// 32-bit IEEE float (FLOAT).
    Float = 11,
    /// 64-bit IEEE double (DOUBLE).
    Double = 12,
}

impl ExifType {
    /// Parse a physical type from its wire type code.
    pub fn from_u16(value: u16) -> Result<Self> {
        match value {
            1 => Ok(ExifType::Byte),
            2 => Ok(ExifType::Ascii),
            3 => Ok(ExifType::Short),
            4 => Ok(ExifType::Long),
            5 => Ok(ExifType::Rational),
            6 => Ok(ExifType::SByte),
            7 => Ok(ExifType::Undefined),
            8 => Ok(ExifType::SShort),
            9 => Ok(ExifType::SLong),
            10 => Ok(ExifType::SRational),
            11 => Ok(ExifType::Float),
            12 => Ok(ExifType::Double),
            other => Err(Error::InvalidType(other)),
        }
    }

    /// Size of one element in bytes.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            ExifType::Byte => 1,
            ExifType::Ascii => 1,
            ExifType::Short => 2,
            ExifType::Long => 4,
            ExifType::Rational => 8,
            ExifType::SByte => 1,
            ExifType::Undefined => 1,
            ExifType::SShort => 2,
            ExifType::SLong => 4,
            ExifType::SRational => 8,
            ExifType::Float => 4,
            ExifType::Double => 8,
        }
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            ExifType::Byte => "byte",
            ExifType::Ascii => "ascii",
            ExifType::Short => "short",
            ExifType::Long => "long",
            ExifType::Rational => "rational",
            ExifType::SByte => "sbyte",
            ExifType::Undefined => "undefined",
            ExifType::SShort => "sshort",
            ExifType::SLong => "slong",
            ExifType::SRational => "srational",
            ExifType::Float => "float",
            ExifType::Double => "double",
        }
    }
}

impl std::fmt::Display for ExifType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_spec_table() {
        assert_eq!(ExifType::Byte.size(), 1);
        assert_eq!(ExifType::Ascii.size(), 1);
        assert_eq!(ExifType::Short.size(), 2);
        assert_eq!(ExifType::Long.size(), 4);
        assert_eq!(ExifType::Rational.size(), 8);
        assert_eq!(ExifType::SByte.size(), 1);
        assert_eq!(ExifType::Undefined.size(), 1);
        assert_eq!(ExifType::SShort.size(), 2);
        assert_eq!(ExifType::SLong.size(), 4);
        assert_eq!(ExifType::SRational.size(), 8);
        assert_eq!(ExifType::Float.size(), 4);
        assert_eq!(ExifType::Double.size(), 8);
    }

    #[test]
    fn unknown_type_code_is_an_error() {
        assert!(ExifType::from_u16(0).is_err());
        assert!(ExifType::from_u16(13).is_err());
        assert!(ExifType::from_u16(9999).is_err());
    }

    #[test]
    fn round_trips_known_codes() {
        for code in 1u16..=12 {
            assert_eq!(ExifType::from_u16(code).unwrap().size() > 0, true);
        }
    }
}
