use byteorder::{BigEndian, ByteOrder};
use graphbinary_error::{GraphBinaryError, GraphBinaryResult};

/// Read position over an immutable byte slice.
///
/// The position only ever moves forward. Every read that would run past the
/// end fails with [`GraphBinaryError::TruncatedInput`] and leaves the position
/// where it was.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Next byte without consuming it.
    pub fn peek_u8(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    /// Consumes `n` bytes and returns them as a borrowed slice.
    pub fn read_bytes(
        &mut self,
        n: usize,
        what: &'static str,
    ) -> GraphBinaryResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(GraphBinaryError::TruncatedInput {
                what,
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(
        &mut self,
        what: &'static str,
    ) -> GraphBinaryResult<u8> {
        Ok(self.read_bytes(1, what)?[0])
    }

    pub fn read_i8(
        &mut self,
        what: &'static str,
    ) -> GraphBinaryResult<i8> {
        Ok(self.read_u8(what)? as i8)
    }

    pub fn read_i16(
        &mut self,
        what: &'static str,
    ) -> GraphBinaryResult<i16> {
        self.read_bytes(2, what).map(BigEndian::read_i16)
    }

    pub fn read_i32(
        &mut self,
        what: &'static str,
    ) -> GraphBinaryResult<i32> {
        self.read_bytes(4, what).map(BigEndian::read_i32)
    }

    pub fn read_i64(
        &mut self,
        what: &'static str,
    ) -> GraphBinaryResult<i64> {
        self.read_bytes(8, what).map(BigEndian::read_i64)
    }

    pub fn read_f32(
        &mut self,
        what: &'static str,
    ) -> GraphBinaryResult<f32> {
        self.read_bytes(4, what).map(BigEndian::read_f32)
    }

    pub fn read_f64(
        &mut self,
        what: &'static str,
    ) -> GraphBinaryResult<f64> {
        self.read_bytes(8, what).map(BigEndian::read_f64)
    }

    /// Reads a 4-byte length or count; negative values are malformed.
    pub fn read_length(
        &mut self,
        what: &'static str,
    ) -> GraphBinaryResult<usize> {
        let at = self.pos;
        let len = self.read_i32(what)?;
        usize::try_from(len).map_err(|_| {
            GraphBinaryError::malformed(what, format!("negative length {len}")).with_offset(at)
        })
    }

    /// Reads a length-prefixed UTF-8 string into an owned `String`.
    pub fn read_string(
        &mut self,
        what: &'static str,
    ) -> GraphBinaryResult<String> {
        let len = self.read_length(what)?;
        let at = self.pos;
        let bytes = self.read_bytes(len, what)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| GraphBinaryError::malformed(what, e.to_string()).with_offset(at))
    }
}
