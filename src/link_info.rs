//! LinkInfo: where the link target lives, as a local volume path and/or a network share
//!
//! Every offset in LinkInfo counts from the first byte of the structure, which is
//! its LinkInfoSize field. The decoder scopes a sub-reader to exactly that region so
//! offsets index it directly and cannot escape it.

use crate::error::{Error, Result};
use crate::flags::bit_record;
use crate::lnk_parser::ParserConfig;
use crate::network::CommonNetworkRelativeLink;
use crate::reader::ByteReader;
use crate::text::{decode_ansi, decode_utf16, LnkString};
use serde::{Deserialize, Serialize};

const SECTION: &str = "LinkInfo";

/// LinkInfoSize and LinkInfoHeaderSize of the legacy layout
pub const MIN_HEADER_SIZE: u32 = 0x1C;

/// Header size from which the Unicode offsets are present
pub const EXTENDED_HEADER_SIZE: u32 = 0x24;

/// Smallest VolumeID: size, drive type, serial number, label offset
pub const MIN_VOLUME_ID_SIZE: u32 = 0x10;

/// VolumeLabelOffset value announcing a Unicode label
const UNICODE_LABEL_MARKER: u32 = 0x14;

bit_record! {
    /// LinkInfoFlags
    pub struct LinkInfoFlags {
        /// VolumeID and LocalBasePath are present
        volume_id_and_local_base_path = 0x0000_0001, "VolumeIDAndLocalBasePath";
        /// CommonNetworkRelativeLink is present
        common_network_relative_link_and_path_suffix = 0x0000_0002, "CommonNetworkRelativeLinkAndPathSuffix";
    }
}

/// Header layout, chosen by LinkInfoHeaderSize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum LinkInfoLayout {
    /// Header size below 0x24: ANSI paths only
    Legacy,
    /// Header size 0x24 or more: Unicode path offsets follow the legacy fields
    Extended {
        local_base_path_offset_unicode: u32,
        common_path_suffix_offset_unicode: u32,
    },
}

/// LinkInfo structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInfo {
    pub size: u32,
    pub header_size: u32,
    pub flags: LinkInfoFlags,
    pub volume_id_offset: u32,
    pub local_base_path_offset: u32,
    pub common_network_relative_link_offset: u32,
    pub common_path_suffix_offset: u32,
    pub layout: LinkInfoLayout,
    pub volume_id: Option<VolumeId>,
    pub common_network_relative_link: Option<CommonNetworkRelativeLink>,
    pub local_base_path: Option<LnkString>,
    pub local_base_path_unicode: Option<LnkString>,
    pub common_path_suffix: Option<LnkString>,
    pub common_path_suffix_unicode: Option<LnkString>,
}

impl LinkInfo {
    /// Decode a LinkInfo at the reader's position, consuming LinkInfoSize bytes
    pub fn parse(reader: &mut ByteReader<'_>, config: &ParserConfig) -> Result<Self> {
        let size = reader.peek_u32()?;
        if size < MIN_HEADER_SIZE {
            return Err(Error::InvalidSize {
                section: SECTION,
                field: "LinkInfoSize",
                minimum: MIN_HEADER_SIZE as u64,
                actual: size as u64,
            });
        }
        let mut info = reader.take(size as usize, SECTION)?;
        info.read_u32()?;

        let header_size = info.read_u32()?;
        if header_size < MIN_HEADER_SIZE {
            return Err(Error::InvalidSize {
                section: SECTION,
                field: "LinkInfoHeaderSize",
                minimum: MIN_HEADER_SIZE as u64,
                actual: header_size as u64,
            });
        }
        let flags = LinkInfoFlags::from_bits(info.read_u32()?);
        let volume_id_offset = info.read_u32()?;
        let local_base_path_offset = info.read_u32()?;
        let common_network_relative_link_offset = info.read_u32()?;
        let common_path_suffix_offset = info.read_u32()?;

        let layout = if header_size >= EXTENDED_HEADER_SIZE {
            LinkInfoLayout::Extended {
                local_base_path_offset_unicode: info.read_u32()?,
                common_path_suffix_offset_unicode: info.read_u32()?,
            }
        } else {
            LinkInfoLayout::Legacy
        };

        let (local_unicode_offset, suffix_unicode_offset) = match layout {
            LinkInfoLayout::Extended {
                local_base_path_offset_unicode,
                common_path_suffix_offset_unicode,
            } => (local_base_path_offset_unicode, common_path_suffix_offset_unicode),
            LinkInfoLayout::Legacy => (0, 0),
        };

        let mut volume_id = None;
        let mut local_base_path = None;
        let mut local_base_path_unicode = None;
        if flags.volume_id_and_local_base_path {
            if volume_id_offset != 0 {
                let mut region = info.region_at(volume_id_offset as u64, "VolumeIDOffset", "VolumeID")?;
                volume_id = Some(VolumeId::parse(&mut region, config)?);
            }
            local_base_path = ansi_at(&info, local_base_path_offset, "LocalBasePathOffset", config)?;
            local_base_path_unicode = unicode_at(&info, local_unicode_offset, "LocalBasePathOffsetUnicode", config)?;
        }

        let mut common_network_relative_link = None;
        if flags.common_network_relative_link_and_path_suffix && common_network_relative_link_offset != 0 {
            let mut region = info.region_at(
                common_network_relative_link_offset as u64,
                "CommonNetworkRelativeLinkOffset",
                "CommonNetworkRelativeLink",
            )?;
            common_network_relative_link = Some(CommonNetworkRelativeLink::parse(&mut region, config)?);
        }

        let common_path_suffix = ansi_at(&info, common_path_suffix_offset, "CommonPathSuffixOffset", config)?;
        let common_path_suffix_unicode =
            unicode_at(&info, suffix_unicode_offset, "CommonPathSuffixOffsetUnicode", config)?;

        log::debug!(
            "LinkInfo: {} bytes, header 0x{:X}, flags {:?}",
            size,
            header_size,
            flags.names()
        );

        Ok(Self {
            size,
            header_size,
            flags,
            volume_id_offset,
            local_base_path_offset,
            common_network_relative_link_offset,
            common_path_suffix_offset,
            layout,
            volume_id,
            common_network_relative_link,
            local_base_path,
            local_base_path_unicode,
            common_path_suffix,
            common_path_suffix_unicode,
        })
    }

    /// Local base path, preferring the Unicode form
    pub fn local_path(&self) -> Option<&LnkString> {
        self.local_base_path_unicode.as_ref().or(self.local_base_path.as_ref())
    }

    /// Common path suffix, preferring the Unicode form
    pub fn path_suffix(&self) -> Option<&LnkString> {
        self.common_path_suffix_unicode.as_ref().or(self.common_path_suffix.as_ref())
    }

    /// Full target path: local base path or network share, joined with the suffix
    pub fn full_path(&self) -> Option<String> {
        let base = match self.local_path() {
            Some(path) => path.to_lossy(),
            None => self.common_network_relative_link.as_ref()?.share_name()?.to_lossy(),
        };
        let suffix = self.path_suffix().map(|s| s.to_lossy()).unwrap_or_default();
        if suffix.is_empty() {
            return Some(base);
        }
        if base.ends_with('\\') {
            Some(format!("{}{}", base, suffix))
        } else {
            Some(format!("{}\\{}", base, suffix))
        }
    }
}

/// Type of drive the target was stored on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveType {
    Unknown,
    NoRootDir,
    Removable,
    Fixed,
    Remote,
    CdRom,
    RamDisk,
    Other(u32),
}

impl From<u32> for DriveType {
    fn from(value: u32) -> Self {
        match value {
            0 => DriveType::Unknown,
            1 => DriveType::NoRootDir,
            2 => DriveType::Removable,
            3 => DriveType::Fixed,
            4 => DriveType::Remote,
            5 => DriveType::CdRom,
            6 => DriveType::RamDisk,
            other => DriveType::Other(other),
        }
    }
}

/// Volume label, stored either in the legacy code page or as UTF-16
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "encoding", rename_all = "lowercase")]
pub enum VolumeLabel {
    Ansi { text: Option<LnkString> },
    Unicode { offset: u32, text: Option<LnkString> },
}

impl VolumeLabel {
    pub fn text(&self) -> Option<&LnkString> {
        match self {
            VolumeLabel::Ansi { text } | VolumeLabel::Unicode { text, .. } => text.as_ref(),
        }
    }
}

/// VolumeID structure; label offsets count from its first byte
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeId {
    pub size: u32,
    pub drive_type: DriveType,
    pub drive_serial_number: u32,
    pub volume_label_offset: u32,
    pub label: VolumeLabel,
}

impl VolumeId {
    pub fn parse(reader: &mut ByteReader<'_>, config: &ParserConfig) -> Result<Self> {
        let size = reader.peek_u32()?;
        if size < MIN_VOLUME_ID_SIZE {
            return Err(Error::InvalidSize {
                section: "VolumeID",
                field: "VolumeIDSize",
                minimum: MIN_VOLUME_ID_SIZE as u64,
                actual: size as u64,
            });
        }
        let mut volume = reader.take(size as usize, "VolumeID")?;
        volume.read_u32()?;

        let drive_type = DriveType::from(volume.read_u32()?);
        let drive_serial_number = volume.read_u32()?;
        let volume_label_offset = volume.read_u32()?;

        let label = if volume_label_offset == UNICODE_LABEL_MARKER {
            let offset = volume.read_u32()?;
            VolumeLabel::Unicode {
                offset,
                text: unicode_at(&volume, offset, "VolumeLabelOffsetUnicode", config)?,
            }
        } else {
            VolumeLabel::Ansi {
                text: ansi_at(&volume, volume_label_offset, "VolumeLabelOffset", config)?,
            }
        };

        Ok(Self {
            size,
            drive_type,
            drive_serial_number,
            volume_label_offset,
            label,
        })
    }
}

// Offset zero means the field is absent
fn ansi_at(region: &ByteReader<'_>, offset: u32, field: &'static str, config: &ParserConfig) -> Result<Option<LnkString>> {
    if offset == 0 {
        return Ok(None);
    }
    let mut text = region.region_at(offset as u64, field, region.section())?;
    let bytes = text.read_zero_terminated(config.max_string_len);
    Ok(Some(decode_ansi(bytes, config.ansi_fallback)))
}

fn unicode_at(region: &ByteReader<'_>, offset: u32, field: &'static str, config: &ParserConfig) -> Result<Option<LnkString>> {
    if offset == 0 {
        return Ok(None);
    }
    let mut text = region.region_at(offset as u64, field, region.section())?;
    let units = text.read_zero_terminated_utf16(config.max_string_len);
    Ok(Some(decode_utf16(&units)))
}
