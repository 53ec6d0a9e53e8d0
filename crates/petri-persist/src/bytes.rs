//! Big-endian primitive codec over a byte cursor.
//!
//! Every read is bounds-checked and fails with [`PersistError::UnexpectedEof`]
//! instead of panicking. Strings are a big-endian `i32` length followed by
//! that many raw bytes.

use crate::error::{PersistError, PersistResult};

/// Cursor over an in-memory chunk buffer.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes left to read.
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub const fn position(&self) -> usize {
        self.pos
    }

    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> PersistResult<&'a [u8]> {
        self.ensure_bytes(len)?;
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> PersistResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_be_i32(&mut self) -> PersistResult<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    pub fn read_be_u32(&mut self) -> PersistResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_be_u64(&mut self) -> PersistResult<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    pub fn read_be_f32(&mut self) -> PersistResult<f32> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    pub fn read_be_f64(&mut self) -> PersistResult<f64> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    /// Read a length-prefixed byte string.
    pub fn read_prefixed_bytes(&mut self) -> PersistResult<&'a [u8]> {
        let len = self.read_count("string length", 1)?;
        self.read_bytes(len)
    }

    /// Read a length-prefixed string. The bytes must be valid UTF-8.
    pub fn read_string(&mut self) -> PersistResult<String> {
        let bytes = self.read_prefixed_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| PersistError::InvalidString { len: bytes.len() })
    }

    /// Read a big-endian `i32` element count.
    ///
    /// Negative counts, and counts that could not possibly fit in the rest of
    /// the buffer at `min_element_size` bytes each, are rejected before any
    /// allocation is sized from them.
    pub fn read_count(&mut self, what: &'static str, min_element_size: usize) -> PersistResult<usize> {
        let count = self.read_be_i32()?;
        if count < 0 {
            return Err(PersistError::InvalidCount {
                what,
                count: count as i64,
            });
        }
        let count = count as usize;
        let needed = count.saturating_mul(min_element_size);
        if needed > self.remaining() {
            return Err(PersistError::UnexpectedEof {
                requested: needed,
                available: self.remaining(),
            });
        }
        Ok(count)
    }

    fn ensure_bytes(&self, len: usize) -> PersistResult<()> {
        let available = self.remaining();
        if len > available {
            return Err(PersistError::UnexpectedEof {
                requested: len,
                available,
            });
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> PersistResult<[u8; N]> {
        self.ensure_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }
}

/// Growable big-endian writer.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_be_i32(&mut self, value: i32) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_be_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_be_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_be_f32(&mut self, value: f32) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_be_f64(&mut self, value: f64) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Write an element count. Counts above `i32::MAX` cannot be represented.
    pub fn write_count(&mut self, what: &'static str, count: usize) -> PersistResult<()> {
        let count = i32::try_from(count).map_err(|_| PersistError::InvalidCount {
            what,
            count: count as i64,
        })?;
        self.write_be_i32(count);
        Ok(())
    }

    pub fn write_prefixed_bytes(&mut self, bytes: &[u8]) -> PersistResult<()> {
        self.write_count("string length", bytes.len())?;
        self.write_bytes(bytes);
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> PersistResult<()> {
        self.write_prefixed_bytes(value.as_bytes())
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}
