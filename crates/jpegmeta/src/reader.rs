//! Byte-window reader: a bounded, seekable view over a JPEG byte stream.
//!
//! Every read validates `remaining() >= n` before touching the underlying
//! source; a short read is always surfaced as `Error::UnexpectedEnd`,
//! never a panic or a truncated `Vec`.

use std::io::{Read, Seek, SeekFrom};

use jpegmeta_core::ByteOrder;

use crate::{Error, Result};

/// Seekable cursor over a JPEG byte stream with explicit endianness on
/// every multi-byte read.
pub struct SegmentReader<R: Read + Seek> {
    inner: R,
    len: u64,
}

impl<R: Read + Seek> SegmentReader<R> {
    /// Wrap `inner`. Probes the stream length once by seeking to the end
    /// and back (the same end-probe-then-restore used to size-check a
    /// whole file before reading it), so `remaining()` never needs to
    /// reseek.
    pub fn new(mut inner: R) -> Result<Self> {
        let current = inner.stream_position()?;
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(current))?;
        Ok(Self { inner, len })
    }

    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    pub fn remaining(&mut self) -> Result<u64> {
        let pos = self.position()?;
        Ok(self.len.saturating_sub(pos))
    }

    fn require(&mut self, n: u64) -> Result<()> {
        if self.remaining()? < n {
            return Err(jpegmeta_core::Error::UnexpectedEnd {
                need: n as usize,
                have: self.remaining()? as usize,
            }
            .into());
        }
        Ok(())
    }

    pub fn seek_absolute(&mut self, pos: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    pub fn skip(&mut self, n: u64) -> Result<()> {
        self.require(n)?;
        self.inner.seek(SeekFrom::Current(n as i64))?;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.require(1)?;
        let mut b = [0u8; 1];
        self.inner.read_exact(&mut b)?;
        tracing::trace!(byte = b[0], "read_u8");
        Ok(b[0])
    }

    pub fn read_u16(&mut self, order: ByteOrder) -> Result<u16> {
        self.require(2)?;
        let mut b = [0u8; 2];
        self.inner.read_exact(&mut b)?;
        Ok(order.read_u16(b))
    }

    pub fn read_i16(&mut self, order: ByteOrder) -> Result<i16> {
        self.require(2)?;
        let mut b = [0u8; 2];
        self.inner.read_exact(&mut b)?;
        Ok(order.read_i16(b))
    }

    pub fn read_u32(&mut self, order: ByteOrder) -> Result<u32> {
        self.require(4)?;
        let mut b = [0u8; 4];
        self.inner.read_exact(&mut b)?;
        Ok(order.read_u32(b))
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.require(n as u64)?;
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn read_ascii_exact(&mut self, n: usize) -> Result<String> {
        let bytes = self.read_bytes(n)?;
        Ok(bytes.iter().map(|&b| b as char).collect())
    }

    /// Non-destructive lookahead of one byte.
    pub fn peek_u8(&mut self) -> Result<u8> {
        let b = self.peek_bytes(1)?;
        Ok(b[0])
    }

    /// Non-destructive lookahead of `n` bytes.
    pub fn peek_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let pos = self.position()?;
        let data = self.read_bytes(n)?;
        self.seek_absolute(pos)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_and_tracks_remaining() {
        let mut r = SegmentReader::new(Cursor::new(vec![0xFF, 0xD8, 0x01, 0x02])).unwrap();
        assert_eq!(r.remaining().unwrap(), 4);
        assert_eq!(r.read_u8().unwrap(), 0xFF);
        assert_eq!(r.remaining().unwrap(), 3);
    }

    #[test]
    fn short_read_is_unexpected_end() {
        let mut r = SegmentReader::new(Cursor::new(vec![0x01])).unwrap();
        assert!(r.read_u16(ByteOrder::BigEndian).is_err());
    }

    #[test]
    fn peek_does_not_advance_cursor() {
        let mut r = SegmentReader::new(Cursor::new(vec![0xAB, 0xCD, 0xEF])).unwrap();
        assert_eq!(r.peek_bytes(2).unwrap(), vec![0xAB, 0xCD]);
        assert_eq!(r.position().unwrap(), 0);
        assert_eq!(r.read_u8().unwrap(), 0xAB);
    }

    #[test]
    fn big_endian_u16_reads_correctly() {
        let mut r = SegmentReader::new(Cursor::new(vec![0x01, 0x02])).unwrap();
        assert_eq!(r.read_u16(ByteOrder::BigEndian).unwrap(), 0x0102);
    }
}
