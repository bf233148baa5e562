//! Bounded little-endian cursor over an in-memory shell link buffer
//!
//! Every structure in a shell link is either read sequentially or located through
//! an offset relative to the start of its enclosing structure. `ByteReader` wraps a
//! `Cursor` over a borrowed slice and hands out scoped sub-readers so that a nested
//! structure can never read past its own declared extent.

use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

/// Cursor over an immutable byte region of the input buffer
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
    /// Absolute offset of this region inside the original buffer
    base: usize,
    /// Structure name reported in errors
    section: &'static str,
}

impl<'a> ByteReader<'a> {
    /// Create a reader over a complete buffer
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_section(data, "ShellLink")
    }

    /// Create a reader over a buffer, naming the structure it holds
    pub fn with_section(data: &'a [u8], section: &'static str) -> Self {
        Self {
            cursor: Cursor::new(data),
            base: 0,
            section,
        }
    }

    /// Structure name used in error reports
    pub fn section(&self) -> &'static str {
        self.section
    }

    /// Current offset relative to the start of this region
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Current offset relative to the start of the whole input buffer
    pub fn absolute_position(&self) -> usize {
        self.base + self.position()
    }

    /// Total length of this region
    pub fn len(&self) -> usize {
        self.data().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes left between the cursor and the end of the region
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position())
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    fn data(&self) -> &'a [u8] {
        self.cursor.get_ref()
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if needed > available {
            return Err(Error::UnexpectedEnd {
                section: self.section,
                offset: self.absolute_position(),
                needed,
                available,
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.cursor.read_u8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(self.cursor.read_i16::<LittleEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.cursor.read_i32::<LittleEndian>()?)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(self.cursor.read_u64::<LittleEndian>()?)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.ensure(8)?;
        Ok(self.cursor.read_i64::<LittleEndian>()?)
    }

    /// Read a u32 without advancing the cursor
    pub fn peek_u32(&self) -> Result<u32> {
        self.clone().read_u32()
    }

    /// Read a fixed-size byte array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N)?;
        let mut buf = [0u8; N];
        self.cursor.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Borrow the next `count` bytes and advance past them
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.ensure(count)?;
        let start = self.position();
        let end = start + count;
        self.cursor.set_position(end as u64);
        Ok(&self.data()[start..end])
    }

    /// Borrow everything left in the region and move to its end
    pub fn read_rest(&mut self) -> &'a [u8] {
        let start = self.position().min(self.len());
        self.cursor.set_position(self.len() as u64);
        &self.data()[start..]
    }

    /// Read `count` UTF-16LE code units
    pub fn read_utf16_units(&mut self, count: usize) -> Result<Vec<u16>> {
        let byte_len = count.checked_mul(2).ok_or(Error::UnexpectedEnd {
            section: self.section,
            offset: self.absolute_position(),
            needed: usize::MAX,
            available: self.remaining(),
        })?;
        let bytes = self.read_bytes(byte_len)?;
        Ok(bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect())
    }

    /// Consume the next `count` bytes as a sub-reader with its own offset zero
    pub fn take(&mut self, count: usize, section: &'static str) -> Result<ByteReader<'a>> {
        let base = self.absolute_position();
        let bytes = self.read_bytes(count)?;
        Ok(ByteReader {
            cursor: Cursor::new(bytes),
            base,
            section,
        })
    }

    /// Sub-reader starting at `offset` in this region and running to its end.
    /// The parent cursor does not move.
    pub fn region_at(&self, offset: u64, field: &'static str, section: &'static str) -> Result<ByteReader<'a>> {
        let start = self.check_offset(offset, field)?;
        Ok(ByteReader {
            cursor: Cursor::new(&self.data()[start..]),
            base: self.base + start,
            section,
        })
    }

    /// Move to an absolute offset within this region
    pub fn seek(&mut self, offset: u64, field: &'static str) -> Result<()> {
        let target = self.check_offset(offset, field)?;
        self.cursor.set_position(target as u64);
        Ok(())
    }

    /// Move to `mark + delta` within this region
    pub fn seek_relative(&mut self, mark: usize, delta: i64, field: &'static str) -> Result<()> {
        let target = match (mark as i64).checked_add(delta) {
            Some(target) if target >= 0 => target as u64,
            _ => {
                // The target lies before the region; report the mark it was measured from
                log::debug!("{}: {} bytes before offset 0x{:X}", field, delta.unsigned_abs(), mark);
                return Err(Error::InvalidOffset {
                    section: self.section,
                    field,
                    offset: mark as u64,
                    limit: self.len(),
                });
            }
        };
        self.seek(target, field)
    }

    // An offset addresses data, so it must name a byte inside the region
    fn check_offset(&self, offset: u64, field: &'static str) -> Result<usize> {
        if offset >= self.len() as u64 {
            return Err(Error::InvalidOffset {
                section: self.section,
                field,
                offset,
                limit: self.len(),
            });
        }
        Ok(offset as usize)
    }

    /// Read bytes up to a NUL terminator, scanning at most `max_len` bytes.
    ///
    /// The terminator is consumed but not returned. Unterminated input yields the
    /// bytes scanned before the cap or the end of the region.
    pub fn read_zero_terminated(&mut self, max_len: usize) -> &'a [u8] {
        let start = self.position().min(self.len());
        let window = &self.data()[start..];
        let limit = window.len().min(max_len);

        match window[..limit].iter().position(|&b| b == 0) {
            Some(nul) => {
                self.cursor.set_position((start + nul + 1) as u64);
                &window[..nul]
            }
            None => {
                log::debug!(
                    "{}: unterminated string at offset 0x{:X}, stopped after {} bytes",
                    self.section,
                    self.base + start,
                    limit
                );
                self.cursor.set_position((start + limit) as u64);
                &window[..limit]
            }
        }
    }

    /// Read UTF-16LE code units up to a NUL code unit, scanning at most `max_chars` units.
    pub fn read_zero_terminated_utf16(&mut self, max_chars: usize) -> Vec<u16> {
        let mut units = Vec::new();
        while units.len() < max_chars && self.remaining() >= 2 {
            let start = self.position();
            let unit = u16::from_le_bytes([self.data()[start], self.data()[start + 1]]);
            self.cursor.set_position((start + 2) as u64);
            if unit == 0 {
                return units;
            }
            units.push(unit);
        }
        log::debug!(
            "{}: unterminated UTF-16 string ending at offset 0x{:X}",
            self.section,
            self.absolute_position()
        );
        units
    }
}
