//! Bounds-checked little-endian byte reader
//!
//! Every read names the field it is decoding so a failure can say exactly
//! what was being read when the buffer ran out.

use crate::error::{DecodeError, DecodeResult};

/// Cursor over a byte buffer
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    /// Fail unless `width` more bytes are available for `field`
    pub fn require(&self, field: &str, width: usize) -> DecodeResult<()> {
        match self.offset.checked_add(width) {
            Some(end) if end <= self.bytes.len() => Ok(()),
            _ => Err(DecodeError::bounds(
                field,
                format!(
                    "need {} bytes at offset {}, buffer is {} bytes",
                    width,
                    self.offset,
                    self.bytes.len()
                ),
            )),
        }
    }

    /// Read `N` bytes after checking they are in bounds
    fn take<const N: usize>(&mut self, field: &str) -> DecodeResult<[u8; N]> {
        self.require(field, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.offset..self.offset + N]);
        self.offset += N;
        Ok(out)
    }

    pub fn read_u8(&mut self, field: &str) -> DecodeResult<u8> {
        Ok(self.take::<1>(field)?[0])
    }

    pub fn read_u16(&mut self, field: &str) -> DecodeResult<u16> {
        Ok(u16::from_le_bytes(self.take(field)?))
    }

    pub fn read_u32(&mut self, field: &str) -> DecodeResult<u32> {
        Ok(u32::from_le_bytes(self.take(field)?))
    }

    pub fn read_u64(&mut self, field: &str) -> DecodeResult<u64> {
        Ok(u64::from_le_bytes(self.take(field)?))
    }

    pub fn read_f32(&mut self, field: &str) -> DecodeResult<f32> {
        Ok(f32::from_le_bytes(self.take(field)?))
    }

    /// Read a fixed-width tag such as a file magic
    pub fn read_tag<const N: usize>(&mut self, field: &str) -> DecodeResult<[u8; N]> {
        self.take(field)
    }
}
