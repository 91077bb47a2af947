//! Avro binary encoding primitives.
//!
//! See: https://avro.apache.org/docs/1.11.1/specification/#binary-encoding

use crate::error::{IcebergError, Result};

/// Forward-only reader over Avro binary-encoded bytes.
///
/// `source` is the file the bytes came from, carried for error messages.
#[derive(Debug)]
pub(crate) struct BinaryCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    source: &'a str,
}

impl<'a> BinaryCursor<'a> {
    pub(crate) fn new(buf: &'a [u8], source: &'a str) -> Self {
        Self {
            buf,
            pos: 0,
            source,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.pos == self.buf.len()
    }

    pub(crate) fn error(&self, reason: impl Into<String>) -> IcebergError {
        IcebergError::malformed(self.source, reason)
    }

    pub(crate) fn read_byte(&mut self) -> Result<u8> {
        let byte = *self
            .buf
            .get(self.pos)
            .ok_or_else(|| self.error(format!("Unexpected end of data at offset {}", self.pos)))?;
        self.pos += 1;
        Ok(byte)
    }

    /// Borrow the next `len` bytes.
    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.error(format!(
                "Need {} bytes at offset {}, only {} remain",
                len,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub(crate) fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }

    /// Zig-zag encoded variable-length long.
    pub(crate) fn read_long(&mut self) -> Result<i64> {
        let mut raw: u64 = 0;
        let mut shift = 0u32;
        loop {
            if shift > 63 {
                return Err(self.error(format!("Varint overflow at offset {}", self.pos)));
            }
            let byte = self.read_byte()?;
            raw |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        Ok((raw >> 1) as i64 ^ -((raw & 1) as i64))
    }

    pub(crate) fn read_int(&mut self) -> Result<i32> {
        let value = self.read_long()?;
        i32::try_from(value).map_err(|_| self.error(format!("Int value {} out of range", value)))
    }

    /// A non-negative length prefix.
    pub(crate) fn read_len(&mut self) -> Result<usize> {
        let len = self.read_long()?;
        usize::try_from(len).map_err(|_| self.error(format!("Negative length {}", len)))
    }

    pub(crate) fn read_bool(&mut self) -> Result<bool> {
        match self.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(self.error(format!("Invalid boolean byte {}", other))),
        }
    }

    pub(crate) fn read_float(&mut self) -> Result<f32> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn read_double(&mut self) -> Result<f64> {
        let bytes = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(f64::from_le_bytes(raw))
    }

    pub(crate) fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_len()?;
        self.take(len)
    }

    pub(crate) fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| self.error(format!("Invalid UTF-8 in string: {}", e)))
    }

    /// Item count of the next array/map block, plus its byte size when the
    /// writer recorded one (negative count form). A zero count ends the
    /// sequence.
    pub(crate) fn read_block_header(&mut self) -> Result<(usize, Option<usize>)> {
        let count = self.read_long()?;
        if count < 0 {
            let size = self.read_len()?;
            Ok((count.unsigned_abs() as usize, Some(size)))
        } else {
            Ok((count as usize, None))
        }
    }
}
