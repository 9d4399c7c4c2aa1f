//! Binary primitive decoders.

use super::error::AvroError;

/// Cursor over an encoded byte slice
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    /// Start decoding at the beginning of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset into the input
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True once every byte has been consumed
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read a zigzag-encoded `long`.
    pub fn read_long(&mut self) -> Result<i64, AvroError> {
        let start = self.pos;
        let mut value: u64 = 0;
        let mut shift = 0u32;
        loop {
            let byte = self.read_byte()?;
            if shift == 63 && byte > 1 {
                return Err(AvroError::VarintOverflow(start));
            }
            value |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
            if shift > 63 {
                return Err(AvroError::VarintOverflow(start));
            }
        }
        Ok(((value >> 1) as i64) ^ -((value & 1) as i64))
    }

    /// Read a zigzag-encoded `int`.
    pub fn read_int(&mut self) -> Result<i32, AvroError> {
        let start = self.pos;
        let value = self.read_long()?;
        i32::try_from(value).map_err(|_| AvroError::VarintOverflow(start))
    }

    /// Read length-prefixed bytes, borrowing from the input.
    pub fn read_bytes(&mut self) -> Result<&'a [u8], AvroError> {
        let offset = self.pos;
        let length = self.read_long()?;
        let len = usize::try_from(length).map_err(|_| AvroError::InvalidLength { length, offset })?;
        self.take(len)
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String, AvroError> {
        let bytes = self.read_bytes()?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Read a union branch index.
    pub fn read_union_index(&mut self) -> Result<i64, AvroError> {
        self.read_long()
    }

    /// Read a `["null", T]` union whose non-null branch is never expected.
    pub fn read_null_union(&mut self, field: &'static str) -> Result<(), AvroError> {
        match self.read_union_index()? {
            0 => Ok(()),
            index => Err(AvroError::InvalidUnionBranch { index, field }),
        }
    }

    /// Consume exactly `len` raw bytes.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], AvroError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or(AvroError::UnexpectedEof(self.pos))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_byte(&mut self) -> Result<u8, AvroError> {
        let byte = *self
            .buf
            .get(self.pos)
            .ok_or(AvroError::UnexpectedEof(self.pos))?;
        self.pos += 1;
        Ok(byte)
    }
}
