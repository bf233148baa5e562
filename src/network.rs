//! CommonNetworkRelativeLink: the network share half of a LinkInfo
//!
//! All offsets inside the structure are relative to its own first byte.

use crate::error::{Error, Result};
use crate::flags::bit_record;
use crate::lnk_parser::ParserConfig;
use crate::reader::ByteReader;
use crate::text::{decode_ansi, decode_utf16, LnkString};
use serde::{Deserialize, Serialize};

const SECTION: &str = "CommonNetworkRelativeLink";

/// Size of the fixed fields before the optional Unicode offsets
pub const MIN_SIZE: u32 = 0x14;

bit_record! {
    /// CommonNetworkRelativeLinkFlags
    pub struct NetworkLinkFlags {
        /// DeviceNameOffset is meaningful
        valid_device = 0x0000_0001, "ValidDevice";
        /// NetworkProviderType is meaningful
        valid_net_type = 0x0000_0002, "ValidNetType";
    }
}

/// Offsets of the UTF-16 names, present when NetNameOffset > 0x14
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnicodeNameOffsets {
    pub net_name_offset_unicode: u32,
    pub device_name_offset_unicode: u32,
}

/// CommonNetworkRelativeLink structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonNetworkRelativeLink {
    pub size: u32,
    pub flags: NetworkLinkFlags,
    pub net_name_offset: u32,
    pub device_name_offset: u32,
    /// Raw NetworkProviderType word
    pub network_provider_type: u32,
    /// Decoded provider, only when ValidNetType is set
    pub network_provider: Option<NetworkProvider>,
    pub unicode_offsets: Option<UnicodeNameOffsets>,
    /// Share name, e.g. \\server\share
    pub net_name: Option<LnkString>,
    /// Mapped drive, e.g. Z:
    pub device_name: Option<LnkString>,
    pub net_name_unicode: Option<LnkString>,
    pub device_name_unicode: Option<LnkString>,
}

impl CommonNetworkRelativeLink {
    /// Decode the structure starting at the reader's position
    pub fn parse(reader: &mut ByteReader<'_>, config: &ParserConfig) -> Result<Self> {
        let size = reader.peek_u32()?;
        if size < MIN_SIZE {
            return Err(Error::InvalidSize {
                section: SECTION,
                field: "CommonNetworkRelativeLinkSize",
                minimum: MIN_SIZE as u64,
                actual: size as u64,
            });
        }
        let mut link = reader.take(size as usize, SECTION)?;
        link.read_u32()?;

        let flags = NetworkLinkFlags::from_bits(link.read_u32()?);
        let net_name_offset = link.read_u32()?;
        let device_name_offset = link.read_u32()?;
        let network_provider_type = link.read_u32()?;

        let unicode_offsets = if net_name_offset > MIN_SIZE {
            Some(UnicodeNameOffsets {
                net_name_offset_unicode: link.read_u32()?,
                device_name_offset_unicode: link.read_u32()?,
            })
        } else {
            None
        };

        let net_name = ansi_at(&link, net_name_offset, "NetNameOffset", config)?;
        let device_name = ansi_at(&link, device_name_offset, "DeviceNameOffset", config)?;
        let (net_name_unicode, device_name_unicode) = match unicode_offsets {
            Some(offsets) => (
                unicode_at(&link, offsets.net_name_offset_unicode, "NetNameOffsetUnicode", config)?,
                unicode_at(&link, offsets.device_name_offset_unicode, "DeviceNameOffsetUnicode", config)?,
            ),
            None => (None, None),
        };

        Ok(Self {
            size,
            flags,
            net_name_offset,
            device_name_offset,
            network_provider_type,
            network_provider: flags.valid_net_type.then(|| NetworkProvider::from(network_provider_type)),
            unicode_offsets,
            net_name,
            device_name,
            net_name_unicode,
            device_name_unicode,
        })
    }

    /// Share name, preferring the Unicode form
    pub fn share_name(&self) -> Option<&LnkString> {
        self.net_name_unicode.as_ref().or(self.net_name.as_ref())
    }
}

fn ansi_at(link: &ByteReader<'_>, offset: u32, field: &'static str, config: &ParserConfig) -> Result<Option<LnkString>> {
    if offset == 0 {
        return Ok(None);
    }
    let mut region = link.region_at(offset as u64, field, SECTION)?;
    let bytes = region.read_zero_terminated(config.max_string_len);
    Ok(Some(decode_ansi(bytes, config.ansi_fallback)))
}

fn unicode_at(link: &ByteReader<'_>, offset: u32, field: &'static str, config: &ParserConfig) -> Result<Option<LnkString>> {
    if offset == 0 {
        return Ok(None);
    }
    let mut region = link.region_at(offset as u64, field, SECTION)?;
    let units = region.read_zero_terminated_utf16(config.max_string_len);
    Ok(Some(decode_utf16(&units)))
}

macro_rules! providers {
    ($( $variant:ident = $code:literal, $label:literal; )+) => {
        /// Network provider type (WNNC_NET_*)
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum NetworkProvider {
            $( $variant, )+
            Other(u32),
        }

        impl From<u32> for NetworkProvider {
            fn from(code: u32) -> Self {
                match code {
                    $( $code => NetworkProvider::$variant, )+
                    other => NetworkProvider::Other(other),
                }
            }
        }

        impl NetworkProvider {
            pub fn code(&self) -> u32 {
                match self {
                    $( NetworkProvider::$variant => $code, )+
                    NetworkProvider::Other(code) => *code,
                }
            }

            /// WNNC constant name
            pub fn name(&self) -> &'static str {
                match self {
                    $( NetworkProvider::$variant => $label, )+
                    NetworkProvider::Other(_) => "UNKNOWN",
                }
            }
        }
    };
}

providers! {
    Avid = 0x001A_0000, "WNNC_NET_AVID";
    Docuspace = 0x001B_0000, "WNNC_NET_DOCUSPACE";
    Mangosoft = 0x001C_0000, "WNNC_NET_MANGOSOFT";
    Sernet = 0x001D_0000, "WNNC_NET_SERNET";
    Riverfront1 = 0x001E_0000, "WNNC_NET_RIVERFRONT1";
    Riverfront2 = 0x001F_0000, "WNNC_NET_RIVERFRONT2";
    Decorb = 0x0020_0000, "WNNC_NET_DECORB";
    Protstor = 0x0021_0000, "WNNC_NET_PROTSTOR";
    FjRedir = 0x0022_0000, "WNNC_NET_FJ_REDIR";
    Distinct = 0x0023_0000, "WNNC_NET_DISTINCT";
    Twins = 0x0024_0000, "WNNC_NET_TWINS";
    Rdr2Sample = 0x0025_0000, "WNNC_NET_RDR2SAMPLE";
    Csc = 0x0026_0000, "WNNC_NET_CSC";
    ThreeIn1 = 0x0027_0000, "WNNC_NET_3IN1";
    ExtendNet = 0x0029_0000, "WNNC_NET_EXTENDNET";
    Stac = 0x002A_0000, "WNNC_NET_STAC";
    Foxbat = 0x002B_0000, "WNNC_NET_FOXBAT";
    Yahoo = 0x002C_0000, "WNNC_NET_YAHOO";
    Exifs = 0x002D_0000, "WNNC_NET_EXIFS";
    Dav = 0x002E_0000, "WNNC_NET_DAV";
    Knoware = 0x002F_0000, "WNNC_NET_KNOWARE";
    ObjectDire = 0x0030_0000, "WNNC_NET_OBJECT_DIRE";
    Masfax = 0x0031_0000, "WNNC_NET_MASFAX";
    HobNfs = 0x0032_0000, "WNNC_NET_HOB_NFS";
    Shiva = 0x0033_0000, "WNNC_NET_SHIVA";
    Ibmal = 0x0034_0000, "WNNC_NET_IBMAL";
    Lock = 0x0035_0000, "WNNC_NET_LOCK";
    Termsrv = 0x0036_0000, "WNNC_NET_TERMSRV";
    Srt = 0x0037_0000, "WNNC_NET_SRT";
    Quincy = 0x0038_0000, "WNNC_NET_QUINCY";
    Openafs = 0x0039_0000, "WNNC_NET_OPENAFS";
    Avid1 = 0x003A_0000, "WNNC_NET_AVID1";
    Dfs = 0x003B_0000, "WNNC_NET_DFS";
    Kwnp = 0x003C_0000, "WNNC_NET_KWNP";
    Zenworks = 0x003D_0000, "WNNC_NET_ZENWORKS";
    DriveOnWeb = 0x003E_0000, "WNNC_NET_DRIVEONWEB";
    Vmware = 0x003F_0000, "WNNC_NET_VMWARE";
    Rsfx = 0x0040_0000, "WNNC_NET_RSFX";
    Mfiles = 0x0041_0000, "WNNC_NET_MFILES";
    MsNfs = 0x0042_0000, "WNNC_NET_MS_NFS";
    Google = 0x0043_0000, "WNNC_NET_GOOGLE";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::{utf16z, VBOX_NETWORK_LINK};

    #[test]
    fn test_parse_vbox_share() {
        let mut reader = ByteReader::new(&VBOX_NETWORK_LINK);
        let link = CommonNetworkRelativeLink::parse(&mut reader, &ParserConfig::default()).unwrap();

        assert_eq!(link.size, 43);
        assert!(link.flags.valid_device);
        assert!(link.flags.valid_net_type);
        assert_eq!(link.net_name_offset, 20);
        assert_eq!(link.device_name_offset, 40);
        assert_eq!(link.network_provider, Some(NetworkProvider::Rdr2Sample));
        assert!(link.unicode_offsets.is_none());
        assert_eq!(link.net_name, Some(LnkString::from("\\\\VBoxSvr\\Downloads")));
        assert_eq!(link.device_name, Some(LnkString::from("Z:")));
        assert_eq!(link.net_name_unicode, None);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_provider_ignored_without_valid_net_type() {
        let mut data = VBOX_NETWORK_LINK;
        data[4] = 0x01;
        let link = CommonNetworkRelativeLink::parse(&mut ByteReader::new(&data), &ParserConfig::default()).unwrap();
        assert_eq!(link.network_provider, None);
        assert_eq!(link.network_provider_type, 0x0025_0000);
    }

    #[test]
    fn test_unicode_names() {
        let ansi = b"\\\\nas\\media\0".to_vec();
        let net = utf16z("\\\\nas\\média");
        let device = utf16z("Y:");
        let ansi_offset = 0x1Cu32;
        let net_offset = ansi_offset + ansi.len() as u32;
        let device_offset = net_offset + net.len() as u32;
        let size = device_offset + device.len() as u32;

        let mut data = Vec::new();
        data.extend_from_slice(&size.to_le_bytes());
        data.extend_from_slice(&0x3u32.to_le_bytes());
        data.extend_from_slice(&ansi_offset.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0x003F_0000u32.to_le_bytes());
        data.extend_from_slice(&net_offset.to_le_bytes());
        data.extend_from_slice(&device_offset.to_le_bytes());
        data.extend(ansi);
        data.extend(net);
        data.extend(device);

        let link = CommonNetworkRelativeLink::parse(&mut ByteReader::new(&data), &ParserConfig::default()).unwrap();
        let offsets = link.unicode_offsets.unwrap();
        assert_eq!(offsets.net_name_offset_unicode, net_offset);
        assert_eq!(link.net_name, Some(LnkString::from("\\\\nas\\media")));
        assert_eq!(link.device_name, None);
        assert_eq!(link.net_name_unicode, Some(LnkString::from("\\\\nas\\média")));
        assert_eq!(link.device_name_unicode, Some(LnkString::from("Y:")));
        assert_eq!(link.share_name(), Some(&LnkString::from("\\\\nas\\média")));
        assert_eq!(link.network_provider.map(|p| p.name()), Some("WNNC_NET_VMWARE"));
    }

    #[test]
    fn test_undersized() {
        let mut data = VBOX_NETWORK_LINK;
        data[0] = 0x10;
        assert!(matches!(
            CommonNetworkRelativeLink::parse(&mut ByteReader::new(&data), &ParserConfig::default()),
            Err(Error::InvalidSize { minimum: 0x14, actual: 0x10, .. })
        ));
    }

    #[test]
    fn test_name_offset_outside_structure() {
        let mut data = VBOX_NETWORK_LINK;
        data[12] = 43;
        assert!(matches!(
            CommonNetworkRelativeLink::parse(&mut ByteReader::new(&data), &ParserConfig::default()),
            Err(Error::InvalidOffset { field: "DeviceNameOffset", offset: 43, limit: 43, .. })
        ));
    }

    #[test]
    fn test_provider_codes() {
        assert_eq!(NetworkProvider::from(0x003F_0000), NetworkProvider::Vmware);
        assert_eq!(NetworkProvider::from(0x0028_0000), NetworkProvider::Other(0x0028_0000));
        assert_eq!(NetworkProvider::Google.code(), 0x0043_0000);
    }
}
