//! Buffer utilities for reading PostgreSQL wire data.

use crate::error::{Error, Result};
use bytes::Bytes;

/// A buffer for reading backend message payloads.
///
/// All multi-byte integers on the PostgreSQL wire are big-endian.
pub struct ReadBuffer {
    data: Bytes,
    pos: usize,
}

impl ReadBuffer {
    /// Create a new read buffer from bytes.
    pub fn new(data: Bytes) -> Self {
        Self { data, pos: 0 }
    }

    /// Get the current position in the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the remaining bytes in the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Check if the buffer has at least `n` bytes remaining.
    pub fn has_remaining(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    #[track_caller]
    fn ensure(&self, n: usize) -> Result<()> {
        if !self.has_remaining(n) {
            return Err(Error::buffer_too_small(n, self.remaining()));
        }
        Ok(())
    }

    /// Skip `n` bytes.
    #[track_caller]
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Read a single byte.
    #[track_caller]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let val = self.data[self.pos];
        self.pos += 1;
        Ok(val)
    }

    /// Read a big-endian i16 (Int16).
    #[track_caller]
    pub fn read_i16_be(&mut self) -> Result<i16> {
        self.ensure(2)?;
        let val = i16::from_be_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        Ok(val)
    }

    /// Read a big-endian u32 (oids).
    #[track_caller]
    pub fn read_u32_be(&mut self) -> Result<u32> {
        self.ensure(4)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[self.pos..self.pos + 4]);
        self.pos += 4;
        Ok(u32::from_be_bytes(bytes))
    }

    /// Read a big-endian i32 (Int32).
    #[track_caller]
    pub fn read_i32_be(&mut self) -> Result<i32> {
        self.read_u32_be().map(|v| v as i32)
    }

    /// Read raw bytes.
    #[track_caller]
    pub fn read_bytes(&mut self, n: usize) -> Result<Bytes> {
        self.ensure(n)?;
        let bytes = self.data.slice(self.pos..self.pos + n);
        self.pos += n;
        Ok(bytes)
    }

    /// Read a NUL-terminated UTF-8 string (String in the protocol docs).
    pub fn read_cstr(&mut self) -> Result<String> {
        let rest = &self.data[self.pos.min(self.data.len())..];
        let end = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::protocol("Unterminated string"))?;
        let s = std::str::from_utf8(&rest[..end])
            .map_err(|e| Error::protocol(format!("Invalid UTF-8 in string: {}", e)))?
            .to_string();
        self.pos += end + 1;
        Ok(s)
    }
}
