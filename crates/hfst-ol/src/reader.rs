// Forward-only little-endian decoder over the raw transducer image.

use std::fmt;

use crate::FormatError;

/// The part of the file a read belongs to. Carried into `FormatError::Truncated`
/// so a short file reports which section ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Container,
    Header,
    Alphabet,
    IndexTable,
    TransitionTable,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Container => "container header",
            Section::Header => "header",
            Section::Alphabet => "alphabet",
            Section::IndexTable => "index table",
            Section::TransitionTable => "transition table",
        };
        f.write_str(name)
    }
}

/// Sequential reader over a byte slice.
///
/// Every read either consumes exactly the bytes it decodes or fails with
/// [`FormatError::Truncated`] and leaves the cursor where it was. There is no
/// way to move the cursor backwards.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    section: Section,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            section: Section::Header,
        }
    }

    /// Label subsequent reads as belonging to `section`.
    pub fn enter(&mut self, section: Section) {
        self.section = section;
    }

    /// Byte offset of the next read.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Look at the next `n` bytes without consuming them.
    pub fn peek(&self, n: usize) -> Option<&'a [u8]> {
        let data = self.data;
        data.get(self.pos..self.pos.checked_add(n)?)
    }

    /// Consume `n` raw bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        let bytes = self.peek(n).ok_or_else(|| self.truncated(n))?;
        self.pos += n;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let bytes = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.array::<1>()?[0])
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16, FormatError> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32, FormatError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    /// One byte, nonzero = true.
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool, FormatError> {
        Ok(self.read_u8()? != 0)
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32, FormatError> {
        Ok(f32::from_le_bytes(self.array()?))
    }

    /// Read a null-terminated string and consume its terminator. The
    /// returned bytes exclude the terminator.
    pub fn read_cstr_bytes(&mut self) -> Result<&'a [u8], FormatError> {
        let data = self.data;
        let rest = &data[self.pos..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| self.truncated(rest.len() + 1))?;
        let bytes = &rest[..len];
        self.pos += len + 1;
        Ok(bytes)
    }

    /// Read a null-terminated UTF-8 string.
    pub fn read_cstr(&mut self) -> Result<&'a str, FormatError> {
        let start = self.pos;
        let bytes = self.read_cstr_bytes()?;
        std::str::from_utf8(bytes).map_err(|_| {
            self.pos = start;
            FormatError::InvalidUtf8 { offset: start }
        })
    }

    fn truncated(&self, needed: usize) -> FormatError {
        FormatError::Truncated {
            section: self.section,
            offset: self.pos,
            needed,
            available: self.remaining(),
        }
    }
}
