//! Byte-seekable input source: the conventional file opener.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::{Error, Result};

/// Combined `Read + Seek` trait so trait objects are usable (Rust doesn't
/// allow `dyn Read + Seek` directly).
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Open `path` and reject it immediately as `Error::NotAJpeg` if its first
/// two bytes are not `FF D8`, before any segment scanning begins.
pub fn open(path: impl AsRef<Path>) -> Result<File> {
    let mut file = File::open(path)?;
    let mut header = [0u8; 2];
    let read = file.read(&mut header)?;
    file.seek(SeekFrom::Start(0))?;
    if read < 2 || header != [0xFF, 0xD8] {
        return Err(Error::NotAJpeg);
    }
    Ok(file)
}
