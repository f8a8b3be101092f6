//! JPEG segment scanning, embedded Exif/TIFF metadata extraction, and
//! thumbnail/frame accessors.
//!
//! Walks the segment structure of a JPEG file, locates the APP1 Exif
//! segment, parses its embedded TIFF IFD chain (via [`jpegmeta_core`]),
//! and returns a typed, queryable set of Exif tags plus frame information
//! and the embedded thumbnail JPEG, if present. Also preserves the raw
//! bytes of other sidecar payloads (JFIF APP0, Adobe XMP APP1, the COM
//! comment) for downstream consumers.
//!
//! ```no_run
//! use jpegmeta::{get_simple, ParseConfig};
//!
//! let simple = get_simple("photo.jpg", ParseConfig::default()).unwrap();
//! println!("{}x{}", simple.width.unwrap_or(0), simple.height.unwrap_or(0));
//! ```

mod cache;
mod config;
mod error;
mod frame;
mod jpeg;
mod metadata;
mod reader;
mod simple;
mod source;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub use cache::MetadataCache;
pub use config::ParseConfig;
pub use error::{Error, Result};
pub use frame::Frame;
pub use jpegmeta_core::{Entry, ExifType, RawValue, Warning};
pub use metadata::RawMetadata;
pub use simple::{ExposureProgram, Orientation, SimpleMetadata};
pub use source::ReadSeek;

/// Perform a full parse of a JPEG file, returning every raw tag, the
/// frame header, the embedded thumbnail, and sidecar payloads.
pub fn parse_raw(path: impl AsRef<Path>, config: ParseConfig) -> Result<RawMetadata> {
    let file = source::open(path)?;
    jpeg::scan(file, config)
}

/// Parse in-memory JPEG bytes directly, without touching the filesystem.
/// Used by the fuzz target and by tests that construct scenarios as
/// literal byte arrays.
pub fn parse_raw_bytes(data: &[u8], config: ParseConfig) -> Result<RawMetadata> {
    jpeg::scan(std::io::Cursor::new(data), config)
}

/// Project a file's metadata into the flattened, well-known-tag view.
pub fn get_simple(path: impl AsRef<Path>, config: ParseConfig) -> Result<SimpleMetadata> {
    let raw = parse_raw(path.as_ref(), config)?;
    Ok(simple::project(path, &raw))
}

/// Look up a single image-Exif tag (IFD0 + its flattened Sub-IFDs).
/// Returns `Ok(None)` when the tag is simply absent; "not found" and
/// "found but wrong type" are distinct outcomes; the latter only ever
/// surfaces from [`Entry`]'s strict `try_as_*` accessors.
pub fn try_get_tag(path: impl AsRef<Path>, tag: u16, config: ParseConfig) -> Result<Option<Entry>> {
    let raw = parse_raw(path, config)?;
    Ok(raw.image_entries.get(&tag).cloned())
}

/// All image-Exif tags (IFD0 + its flattened Sub-IFDs).
pub fn get_tags(path: impl AsRef<Path>, config: ParseConfig) -> Result<BTreeMap<u16, Entry>> {
    let raw = parse_raw(path, config)?;
    Ok(raw.image_entries)
}

/// The embedded thumbnail JPEG, or an empty `Vec` if none is present.
/// Same bytes as `parse_raw(...)?.thumbnail`.
pub fn get_thumbnail(path: impl AsRef<Path>, config: ParseConfig) -> Result<Vec<u8>> {
    let raw = parse_raw(path, config)?;
    Ok(raw.thumbnail)
}

/// A parser bound to a [`ParseConfig`] and, optionally, a shared
/// [`MetadataCache`]. Equivalent to the free functions above, but avoids
/// re-parsing a file already seen by the cache.
pub struct Extractor<'a> {
    config: ParseConfig,
    cache: Option<&'a MetadataCache>,
}

impl<'a> Extractor<'a> {
    pub fn new(config: ParseConfig) -> Self {
        Self { config, cache: None }
    }

    pub fn with_cache(config: ParseConfig, cache: &'a MetadataCache) -> Self {
        Self {
            config,
            cache: Some(cache),
        }
    }

    /// Full parse, consulting and populating the cache if one is configured.
    pub fn parse_raw(&self, path: impl AsRef<Path>) -> Result<Arc<RawMetadata>> {
        let path = path.as_ref();
        if let Some(cache) = self.cache {
            if let Some(hit) = cache.get(path) {
                return Ok(hit);
            }
        }

        let raw = Arc::new(parse_raw(path, self.config)?);
        if let Some(cache) = self.cache {
            cache.insert(path.to_path_buf(), raw.clone());
        }
        Ok(raw)
    }

    pub fn get_simple(&self, path: impl AsRef<Path>) -> Result<SimpleMetadata> {
        let raw = self.parse_raw(path.as_ref())?;
        Ok(simple::project(path, &raw))
    }

    pub fn try_get_tag(&self, path: impl AsRef<Path>, tag: u16) -> Result<Option<Entry>> {
        let raw = self.parse_raw(path)?;
        Ok(raw.image_entries.get(&tag).cloned())
    }

    pub fn get_tags(&self, path: impl AsRef<Path>) -> Result<BTreeMap<u16, Entry>> {
        let raw = self.parse_raw(path)?;
        Ok(raw.image_entries.clone())
    }

    pub fn get_thumbnail(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let raw = self.parse_raw(path)?;
        Ok(raw.thumbnail.clone())
    }
}
