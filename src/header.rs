//! ShellLinkHeader: the fixed 76-byte structure every shell link starts with

use crate::datetime::filetime_to_datetime;
use crate::error::{Error, Result};
use crate::flags::{FileAttributes, LinkFlags};
use crate::reader::ByteReader;
use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Size of the header on disk
pub const HEADER_SIZE: u32 = 0x0000_004C;

/// LinkCLSID 00021401-0000-0000-C000-000000000046 as stored on disk
pub const LINK_CLSID: [u8; 16] = [
    0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46,
];

/// Shell Link Header structure (76 bytes)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellLinkHeader {
    /// Header size (always 0x0000004C)
    pub header_size: u32,
    /// Link class identifier
    pub link_clsid: Uuid,
    /// Raw LinkFlags word, see `flags()`
    pub link_flags: u32,
    /// Raw FileAttributes word, see `attributes()`
    pub file_attributes: u32,
    /// Creation time (FILETIME)
    pub creation_time: u64,
    /// Access time (FILETIME)
    pub access_time: u64,
    /// Write time (FILETIME)
    pub write_time: u64,
    /// Size of the target in bytes (low 32 bits)
    pub file_size: u32,
    pub icon_index: i32,
    pub show_command: ShowCommand,
    pub hotkey: HotKey,
    pub reserved1: u16,
    pub reserved2: u32,
    pub reserved3: u32,
}

impl ShellLinkHeader {
    /// Decode the header from the start of `reader`.
    ///
    /// The full 76 bytes are claimed before any field is validated, so a short
    /// buffer always fails with `UnexpectedEnd`.
    pub fn parse(reader: &mut ByteReader<'_>) -> Result<Self> {
        let mut header = reader.take(HEADER_SIZE as usize, "ShellLinkHeader")?;

        let header_size = header.read_u32()?;
        if header_size != HEADER_SIZE {
            return Err(Error::FormatMismatch {
                field: "HeaderSize",
                expected: format!("0x{:X}", HEADER_SIZE),
                actual: format!("0x{:X}", header_size),
            });
        }

        let clsid: [u8; 16] = header.read_array()?;
        if clsid != LINK_CLSID {
            return Err(Error::FormatMismatch {
                field: "LinkCLSID",
                expected: Uuid::from_bytes_le(LINK_CLSID).hyphenated().to_string().to_uppercase(),
                actual: Uuid::from_bytes_le(clsid).hyphenated().to_string().to_uppercase(),
            });
        }

        let link_flags = header.read_u32()?;
        let file_attributes = header.read_u32()?;
        let creation_time = header.read_u64()?;
        let access_time = header.read_u64()?;
        let write_time = header.read_u64()?;
        let file_size = header.read_u32()?;
        let icon_index = header.read_i32()?;
        let show_command = ShowCommand::from(header.read_u32()?);
        let hotkey = HotKey::from(header.read_u16()?);
        let reserved1 = header.read_u16()?;
        let reserved2 = header.read_u32()?;
        let reserved3 = header.read_u32()?;

        log::debug!(
            "Header: flags=0x{:08X} attributes=0x{:08X} size={}",
            link_flags,
            file_attributes,
            file_size
        );

        Ok(Self {
            header_size,
            link_clsid: Uuid::from_bytes_le(clsid),
            link_flags,
            file_attributes,
            creation_time,
            access_time,
            write_time,
            file_size,
            icon_index,
            show_command,
            hotkey,
            reserved1,
            reserved2,
            reserved3,
        })
    }

    /// Named view of `link_flags`
    pub fn flags(&self) -> LinkFlags {
        LinkFlags::from_bits(self.link_flags)
    }

    /// Named view of `file_attributes`
    pub fn attributes(&self) -> FileAttributes {
        FileAttributes::from_bits(self.file_attributes)
    }

    pub fn creation_time(&self) -> Option<DateTime<Utc>> {
        filetime_to_datetime(self.creation_time)
    }

    pub fn access_time(&self) -> Option<DateTime<Utc>> {
        filetime_to_datetime(self.access_time)
    }

    pub fn write_time(&self) -> Option<DateTime<Utc>> {
        filetime_to_datetime(self.write_time)
    }
}

/// Window state the target is launched with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShowCommand {
    /// SW_SHOWNORMAL
    Normal,
    /// SW_SHOWMAXIMIZED
    Maximized,
    /// SW_SHOWMINNOACTIVE
    MinNoActive,
    /// Any other value, which readers treat as Normal
    Other(u32),
}

impl From<u32> for ShowCommand {
    fn from(value: u32) -> Self {
        match value {
            0x1 => ShowCommand::Normal,
            0x3 => ShowCommand::Maximized,
            0x7 => ShowCommand::MinNoActive,
            other => ShowCommand::Other(other),
        }
    }
}

impl ShowCommand {
    pub fn value(&self) -> u32 {
        match self {
            ShowCommand::Normal => 0x1,
            ShowCommand::Maximized => 0x3,
            ShowCommand::MinNoActive => 0x7,
            ShowCommand::Other(value) => *value,
        }
    }
}

bitflags! {
    /// Modifier keys of a HotKey
    #[derive(Serialize, Deserialize)]
    pub struct HotKeyModifiers: u8 {
        const SHIFT   = 0x01;
        const CONTROL = 0x02;
        const ALT     = 0x04;
    }
}

/// Keyboard shortcut: low byte is the virtual key code, high byte the modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotKey {
    pub key: u8,
    pub modifiers: HotKeyModifiers,
    /// Modifier bits outside SHIFT, CONTROL and ALT
    pub unknown_modifiers: u8,
}

impl From<u16> for HotKey {
    fn from(value: u16) -> Self {
        let [key, high] = value.to_le_bytes();
        Self {
            key,
            modifiers: HotKeyModifiers::from_bits_truncate(high),
            unknown_modifiers: high & !HotKeyModifiers::all().bits(),
        }
    }
}

impl HotKey {
    /// The 16-bit word as stored in the header
    pub fn raw(&self) -> u16 {
        u16::from_le_bytes([self.key, self.modifiers.bits() | self.unknown_modifiers])
    }

    pub fn is_set(&self) -> bool {
        self.key != 0
    }

    /// Readable form such as "Ctrl+Alt+T" or "Shift+F5"
    pub fn describe(&self) -> Option<String> {
        if !self.is_set() {
            return None;
        }
        let mut parts = Vec::new();
        if self.modifiers.contains(HotKeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.contains(HotKeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        if self.modifiers.contains(HotKeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        parts.push(key_name(self.key));
        Some(parts.join("+"))
    }
}

fn key_name(key: u8) -> String {
    match key {
        b'0'..=b'9' | b'A'..=b'Z' => (key as char).to_string(),
        0x70..=0x87 => format!("F{}", key - 0x6F),
        0x90 => "NumLock".to_string(),
        0x91 => "ScrollLock".to_string(),
        other => format!("0x{:02X}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::header_bytes;

    #[test]
    fn test_parse_minimal_header() {
        let data = header_bytes(0, 0);
        let mut reader = ByteReader::new(&data);
        let header = ShellLinkHeader::parse(&mut reader).unwrap();
        assert_eq!(header.header_size, 0x4C);
        assert_eq!(
            header.link_clsid.to_string(),
            "00021401-0000-0000-c000-000000000046"
        );
        assert_eq!(header.show_command, ShowCommand::Normal);
        assert_eq!(reader.position(), 76);
    }

    #[test]
    fn test_raw_words_survive() {
        let data = header_bytes(0x8024_0A9B, 0x0000_2021);
        let header = ShellLinkHeader::parse(&mut ByteReader::new(&data)).unwrap();
        assert_eq!(header.link_flags, 0x8024_0A9B);
        assert_eq!(header.file_attributes, 0x0000_2021);
        assert_eq!(header.flags().bits(), header.link_flags);
        assert_eq!(header.attributes().bits(), header.file_attributes);
    }

    #[test]
    fn test_header_size_mismatch() {
        let mut data = header_bytes(0, 0);
        data[0] = 0x4D;
        match ShellLinkHeader::parse(&mut ByteReader::new(&data)) {
            Err(Error::FormatMismatch { field, expected, actual }) => {
                assert_eq!(field, "HeaderSize");
                assert_eq!(expected, "0x4C");
                assert_eq!(actual, "0x4D");
            }
            other => panic!("expected FormatMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_clsid_mismatch() {
        let mut data = header_bytes(0, 0);
        data[4] = 0x02;
        assert!(matches!(
            ShellLinkHeader::parse(&mut ByteReader::new(&data)),
            Err(Error::FormatMismatch { field: "LinkCLSID", .. })
        ));
    }

    #[test]
    fn test_short_buffers_are_unexpected_end() {
        let data = header_bytes(0, 0);
        for len in 0..76 {
            let result = ShellLinkHeader::parse(&mut ByteReader::new(&data[..len]));
            assert!(
                matches!(result, Err(Error::UnexpectedEnd { .. })),
                "length {} gave {:?}",
                len,
                result
            );
        }
    }

    #[test]
    fn test_hotkey() {
        // Ctrl+Alt+T
        let hotkey = HotKey::from(0x0654);
        assert_eq!(hotkey.key, b'T');
        assert!(hotkey.modifiers.contains(HotKeyModifiers::CONTROL | HotKeyModifiers::ALT));
        assert_eq!(hotkey.raw(), 0x0654);
        assert_eq!(hotkey.describe().as_deref(), Some("Ctrl+Alt+T"));

        let odd = HotKey::from(0x8870);
        assert_eq!(odd.unknown_modifiers, 0x88);
        assert_eq!(odd.raw(), 0x8870);
        assert_eq!(odd.describe().as_deref(), Some("F1"));

        assert_eq!(HotKey::from(0).describe(), None);
    }

    #[test]
    fn test_show_command_values() {
        assert_eq!(ShowCommand::from(3), ShowCommand::Maximized);
        assert_eq!(ShowCommand::from(7), ShowCommand::MinNoActive);
        assert_eq!(ShowCommand::from(5), ShowCommand::Other(5));
        assert_eq!(ShowCommand::from(5).value(), 5);
    }
}
