//! ExtraData: the chain of signature-tagged blocks ending a shell link
//!
//! Each block starts with BlockSize and BlockSignature. The chain ends at a block
//! whose size is below 8 (the terminal block) or at the end of the buffer.
//! Unrecognized signatures are kept as opaque payloads.

use crate::console::{ConsoleFeProps, ConsoleProps, CONSOLE_FE_PAYLOAD_SIZE, CONSOLE_PAYLOAD_SIZE};
use crate::error::{Error, Result};
use crate::id_list::{IdList, ItemId};
use crate::lnk_parser::ParserConfig;
use crate::property_store::PropertyStore;
use crate::reader::ByteReader;
use crate::text::{base64_bytes, decode_ansi_fixed, decode_utf16, decode_utf16_fixed, LnkString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ENVIRONMENT_PROPS: u32 = 0xA000_0001;
pub const CONSOLE_PROPS: u32 = 0xA000_0002;
pub const TRACKER_PROPS: u32 = 0xA000_0003;
pub const CONSOLE_FE_PROPS: u32 = 0xA000_0004;
pub const SPECIAL_FOLDER_PROPS: u32 = 0xA000_0005;
pub const DARWIN_PROPS: u32 = 0xA000_0006;
pub const ICON_ENVIRONMENT_PROPS: u32 = 0xA000_0007;
pub const SHIM_PROPS: u32 = 0xA000_0008;
pub const PROPERTY_STORE_PROPS: u32 = 0xA000_0009;
pub const KNOWN_FOLDER_PROPS: u32 = 0xA000_000B;
pub const VISTA_AND_ABOVE_ID_LIST_PROPS: u32 = 0xA000_000C;

/// Blocks smaller than this end the chain
const MIN_BLOCK_SIZE: u32 = 8;

/// Fixed ANSI and Unicode buffers of the environment and Darwin blocks
const ANSI_TARGET_LEN: usize = 260;
const UNICODE_TARGET_LEN: usize = 520;

/// One ExtraData block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraDataBlock {
    /// BlockSize, including size and signature
    pub size: u32,
    pub signature: u32,
    pub data: ExtraData,
}

/// Decoded block contents, by signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExtraData {
    Console(ConsoleProps),
    ConsoleFe(ConsoleFeProps),
    Darwin(DarwinProps),
    EnvironmentVariable(EnvironmentProps),
    IconEnvironment(EnvironmentProps),
    KnownFolder(KnownFolderProps),
    PropertyStore(PropertyStore),
    Shim(ShimProps),
    SpecialFolder(SpecialFolderProps),
    Tracker(TrackerProps),
    VistaAndAboveIdList(VistaAndAboveIdListProps),
    /// Unrecognized signature; payload after the signature, byte for byte
    Unknown(#[serde(with = "base64_bytes")] Vec<u8>),
}

impl ExtraData {
    /// Block name as used in the file format documentation
    pub fn name(&self) -> &'static str {
        match self {
            ExtraData::Console(_) => "ConsoleDataBlock",
            ExtraData::ConsoleFe(_) => "ConsoleFEDataBlock",
            ExtraData::Darwin(_) => "DarwinDataBlock",
            ExtraData::EnvironmentVariable(_) => "EnvironmentVariableDataBlock",
            ExtraData::IconEnvironment(_) => "IconEnvironmentDataBlock",
            ExtraData::KnownFolder(_) => "KnownFolderDataBlock",
            ExtraData::PropertyStore(_) => "PropertyStoreDataBlock",
            ExtraData::Shim(_) => "ShimDataBlock",
            ExtraData::SpecialFolder(_) => "SpecialFolderDataBlock",
            ExtraData::Tracker(_) => "TrackerDataBlock",
            ExtraData::VistaAndAboveIdList(_) => "VistaAndAboveIDListDataBlock",
            ExtraData::Unknown(_) => "Unknown",
        }
    }
}

/// EnvironmentVariableDataBlock and IconEnvironmentDataBlock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentProps {
    pub target_ansi: LnkString,
    pub target_unicode: LnkString,
}

impl EnvironmentProps {
    /// Path with environment variables, preferring the Unicode form
    pub fn target(&self) -> &LnkString {
        if self.target_unicode.is_empty() {
            &self.target_ansi
        } else {
            &self.target_unicode
        }
    }
}

/// DarwinDataBlock: Windows Installer application identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DarwinProps {
    pub darwin_data_ansi: LnkString,
    pub darwin_data_unicode: LnkString,
}

/// TrackerDataBlock: distributed link tracking identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerProps {
    pub length: u32,
    pub version: u32,
    /// NetBIOS name of the machine the target was last seen on
    pub machine_id: LnkString,
    pub droid_volume_id: Uuid,
    pub droid_file_id: Uuid,
    pub birth_droid_volume_id: Uuid,
    pub birth_droid_file_id: Uuid,
}

impl TrackerProps {
    /// MAC address from the node field of the version 1 file droid
    pub fn mac_address(&self) -> Option<String> {
        if self.droid_file_id.get_version_num() != 1 {
            return None;
        }
        let node = &self.droid_file_id.as_bytes()[10..];
        Some(
            node.iter()
                .map(|byte| format!("{:02x}", byte))
                .collect::<Vec<_>>()
                .join(":"),
        )
    }
}

/// SpecialFolderDataBlock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialFolderProps {
    /// CSIDL value
    pub special_folder_id: u32,
    /// Offset of the first child item in the target IDList
    pub offset: u32,
}

impl SpecialFolderProps {
    pub fn folder_name(&self) -> Option<&'static str> {
        csidl_name(self.special_folder_id)
    }
}

/// KnownFolderDataBlock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownFolderProps {
    pub known_folder_id: Uuid,
    /// Offset of the first child item in the target IDList
    pub offset: u32,
}

impl KnownFolderProps {
    pub fn folder_name(&self) -> Option<&'static str> {
        known_folder_name(&self.known_folder_id)
    }
}

/// ShimDataBlock: application compatibility layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShimProps {
    pub layer_name: LnkString,
}

/// VistaAndAboveIDListDataBlock: alternate IDList for newer shells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VistaAndAboveIdListProps {
    pub items: Vec<ItemId>,
}

/// Decode the ExtraData chain at the reader's position
pub fn parse_extra_data(reader: &mut ByteReader<'_>, config: &ParserConfig) -> Result<Vec<ExtraDataBlock>> {
    let mut blocks = Vec::new();
    let mut terminated = false;

    while reader.remaining() >= 4 {
        let size = reader.peek_u32()?;
        if size < MIN_BLOCK_SIZE {
            reader.read_u32()?;
            terminated = true;
            break;
        }

        let mut block = reader.take(size as usize, "ExtraDataBlock")?;
        block.read_u32()?;
        let signature = block.read_u32()?;
        let data = parse_block(signature, &mut block, config)?;
        log::debug!("ExtraData: {} (0x{:08X}), {} bytes", data.name(), signature, size);
        blocks.push(ExtraDataBlock { size, signature, data });
    }

    match chain_end(reader, terminated) {
        ChainEnd::Truncated(left) => log::warn!(
            "Truncated ExtraData block size at offset 0x{:X}: {} byte(s) left",
            reader.absolute_position(),
            left
        ),
        ChainEnd::Trailing(left) => log::debug!("{} bytes after the ExtraData chain", left),
        ChainEnd::Clean => {}
    }
    Ok(blocks)
}

/// How the ExtraData chain stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainEnd {
    /// Terminal block, or the buffer ended on a block boundary
    Clean,
    /// Bytes after the terminal block
    Trailing(usize),
    /// The chain ran out part way through a BlockSize field
    Truncated(usize),
}

fn chain_end(reader: &ByteReader<'_>, terminated: bool) -> ChainEnd {
    match reader.remaining() {
        0 => ChainEnd::Clean,
        left if terminated => ChainEnd::Trailing(left),
        left => ChainEnd::Truncated(left),
    }
}

fn parse_block(signature: u32, payload: &mut ByteReader<'_>, config: &ParserConfig) -> Result<ExtraData> {
    let minimum = match signature {
        ENVIRONMENT_PROPS | DARWIN_PROPS | ICON_ENVIRONMENT_PROPS => ANSI_TARGET_LEN + UNICODE_TARGET_LEN,
        CONSOLE_PROPS => CONSOLE_PAYLOAD_SIZE,
        TRACKER_PROPS => 0x58,
        CONSOLE_FE_PROPS => CONSOLE_FE_PAYLOAD_SIZE,
        SPECIAL_FOLDER_PROPS => 8,
        SHIM_PROPS => 0x80,
        PROPERTY_STORE_PROPS => 4,
        KNOWN_FOLDER_PROPS => 20,
        VISTA_AND_ABOVE_ID_LIST_PROPS => 2,
        _ => 0,
    };
    if payload.remaining() < minimum {
        return Err(Error::InvalidSize {
            section: "ExtraDataBlock",
            field: "BlockSize",
            minimum: (minimum + 8) as u64,
            actual: payload.len() as u64,
        });
    }

    let data = match signature {
        ENVIRONMENT_PROPS => {
            let (target_ansi, target_unicode) = read_target_buffers(payload, config)?;
            ExtraData::EnvironmentVariable(EnvironmentProps { target_ansi, target_unicode })
        }
        ICON_ENVIRONMENT_PROPS => {
            let (target_ansi, target_unicode) = read_target_buffers(payload, config)?;
            ExtraData::IconEnvironment(EnvironmentProps { target_ansi, target_unicode })
        }
        DARWIN_PROPS => {
            let (darwin_data_ansi, darwin_data_unicode) = read_target_buffers(payload, config)?;
            ExtraData::Darwin(DarwinProps {
                darwin_data_ansi,
                darwin_data_unicode,
            })
        }
        CONSOLE_PROPS => ExtraData::Console(ConsoleProps::parse(payload)?),
        CONSOLE_FE_PROPS => ExtraData::ConsoleFe(ConsoleFeProps::parse(payload)?),
        TRACKER_PROPS => ExtraData::Tracker(TrackerProps {
            length: payload.read_u32()?,
            version: payload.read_u32()?,
            machine_id: decode_ansi_fixed(payload.read_bytes(16)?, config.ansi_fallback),
            droid_volume_id: Uuid::from_bytes_le(payload.read_array()?),
            droid_file_id: Uuid::from_bytes_le(payload.read_array()?),
            birth_droid_volume_id: Uuid::from_bytes_le(payload.read_array()?),
            birth_droid_file_id: Uuid::from_bytes_le(payload.read_array()?),
        }),
        SPECIAL_FOLDER_PROPS => ExtraData::SpecialFolder(SpecialFolderProps {
            special_folder_id: payload.read_u32()?,
            offset: payload.read_u32()?,
        }),
        KNOWN_FOLDER_PROPS => ExtraData::KnownFolder(KnownFolderProps {
            known_folder_id: Uuid::from_bytes_le(payload.read_array()?),
            offset: payload.read_u32()?,
        }),
        SHIM_PROPS => {
            let units = payload.read_zero_terminated_utf16(payload.remaining() / 2);
            ExtraData::Shim(ShimProps {
                layer_name: decode_utf16(&units),
            })
        }
        PROPERTY_STORE_PROPS => ExtraData::PropertyStore(PropertyStore::parse(payload)),
        VISTA_AND_ABOVE_ID_LIST_PROPS => ExtraData::VistaAndAboveIdList(VistaAndAboveIdListProps {
            items: IdList::parse_items(payload)?,
        }),
        _ => ExtraData::Unknown(payload.read_rest().to_vec()),
    };
    Ok(data)
}

fn read_target_buffers(payload: &mut ByteReader<'_>, config: &ParserConfig) -> Result<(LnkString, LnkString)> {
    let ansi = decode_ansi_fixed(payload.read_bytes(ANSI_TARGET_LEN)?, config.ansi_fallback);
    let unicode = decode_utf16_fixed(payload.read_bytes(UNICODE_TARGET_LEN)?);
    Ok((ansi, unicode))
}

/// CSIDL constant name of a special folder id
pub fn csidl_name(id: u32) -> Option<&'static str> {
    let name = match id {
        0x00 => "CSIDL_DESKTOP",
        0x01 => "CSIDL_INTERNET",
        0x02 => "CSIDL_PROGRAMS",
        0x03 => "CSIDL_CONTROLS",
        0x04 => "CSIDL_PRINTERS",
        0x05 => "CSIDL_PERSONAL",
        0x06 => "CSIDL_FAVORITES",
        0x07 => "CSIDL_STARTUP",
        0x08 => "CSIDL_RECENT",
        0x09 => "CSIDL_SENDTO",
        0x0A => "CSIDL_BITBUCKET",
        0x0B => "CSIDL_STARTMENU",
        0x0D => "CSIDL_MYMUSIC",
        0x0E => "CSIDL_MYVIDEO",
        0x10 => "CSIDL_DESKTOPDIRECTORY",
        0x11 => "CSIDL_DRIVES",
        0x12 => "CSIDL_NETWORK",
        0x13 => "CSIDL_NETHOOD",
        0x14 => "CSIDL_FONTS",
        0x15 => "CSIDL_TEMPLATES",
        0x16 => "CSIDL_COMMON_STARTMENU",
        0x17 => "CSIDL_COMMON_PROGRAMS",
        0x18 => "CSIDL_COMMON_STARTUP",
        0x19 => "CSIDL_COMMON_DESKTOPDIRECTORY",
        0x1A => "CSIDL_APPDATA",
        0x1B => "CSIDL_PRINTHOOD",
        0x1C => "CSIDL_LOCAL_APPDATA",
        0x1D => "CSIDL_ALTSTARTUP",
        0x1E => "CSIDL_COMMON_ALTSTARTUP",
        0x1F => "CSIDL_COMMON_FAVORITES",
        0x20 => "CSIDL_INTERNET_CACHE",
        0x21 => "CSIDL_COOKIES",
        0x22 => "CSIDL_HISTORY",
        0x23 => "CSIDL_COMMON_APPDATA",
        0x24 => "CSIDL_WINDOWS",
        0x25 => "CSIDL_SYSTEM",
        0x26 => "CSIDL_PROGRAM_FILES",
        0x27 => "CSIDL_MYPICTURES",
        0x28 => "CSIDL_PROFILE",
        0x29 => "CSIDL_SYSTEMX86",
        0x2A => "CSIDL_PROGRAM_FILESX86",
        0x2B => "CSIDL_PROGRAM_FILES_COMMON",
        0x2C => "CSIDL_PROGRAM_FILES_COMMONX86",
        0x2D => "CSIDL_COMMON_TEMPLATES",
        0x2E => "CSIDL_COMMON_DOCUMENTS",
        0x2F => "CSIDL_COMMON_ADMINTOOLS",
        0x30 => "CSIDL_ADMINTOOLS",
        0x31 => "CSIDL_CONNECTIONS",
        0x35 => "CSIDL_COMMON_MUSIC",
        0x36 => "CSIDL_COMMON_PICTURES",
        0x37 => "CSIDL_COMMON_VIDEO",
        0x38 => "CSIDL_RESOURCES",
        0x39 => "CSIDL_RESOURCES_LOCALIZED",
        0x3A => "CSIDL_COMMON_OEM_LINKS",
        0x3B => "CSIDL_CDBURN_AREA",
        0x3D => "CSIDL_COMPUTERSNEARME",
        _ => return None,
    };
    Some(name)
}

/// FOLDERID constant name of a known folder GUID
pub fn known_folder_name(id: &Uuid) -> Option<&'static str> {
    let name = match id.as_u128() {
        0xB4BFCC3A_DB2C_424C_B029_7FE99A87C641 => "FOLDERID_Desktop",
        0xFDD39AD0_238F_46AF_ADB4_6C85480369C7 => "FOLDERID_Documents",
        0x374DE290_123F_4565_9164_39C4925E467B => "FOLDERID_Downloads",
        0x33E28130_4E1E_4676_835A_98395C3BC3BB => "FOLDERID_Pictures",
        0x4BD8D571_6D19_48D3_BE97_422220080E43 => "FOLDERID_Music",
        0x18989B1D_99B5_455B_841C_AB7C74E4DDFC => "FOLDERID_Videos",
        0x3EB685DB_65F9_4CF6_A03A_E3EF65729F3D => "FOLDERID_RoamingAppData",
        0xF1B32785_6FBA_4FCF_9D55_7B8E7F157091 => "FOLDERID_LocalAppData",
        0x905E63B6_C1BF_494E_B29C_65B732D3D21A => "FOLDERID_ProgramFiles",
        0x7C5A40EF_A0FB_4BFC_874A_C0F2E0B9FA8E => "FOLDERID_ProgramFilesX86",
        0xF38BF404_1D43_42F2_9305_67DE0B28FC23 => "FOLDERID_Windows",
        0x1AC14E77_02E7_4E5D_B744_2EB1AE5198B7 => "FOLDERID_System",
        0xC4AA340D_F20F_4863_AFEF_F87EF2E6BA25 => "FOLDERID_PublicDesktop",
        0xA4115719_D62E_491D_AA7C_E74B8BE3B067 => "FOLDERID_CommonStartMenu",
        0x0139D44E_6AFE_49F2_8690_3DAFCAE6FFB8 => "FOLDERID_CommonPrograms",
        0x625B53C3_AB48_4EC1_BA1F_A1EF4146FC19 => "FOLDERID_StartMenu",
        0xA77F5D77_2E2B_44C3_A6A2_ABA601054A51 => "FOLDERID_Programs",
        0xB97D20BB_F46A_4C97_BA10_5E3608430854 => "FOLDERID_Startup",
        0x52A4F021_7B75_48A9_9F6B_4B87A210BC8F => "FOLDERID_QuickLaunch",
        0xA52BBA46_E9E1_435F_B3D9_28DAA648C0F6 => "FOLDERID_SkyDrive",
        0x5E6C858F_0E22_4760_9AFE_EA3317B67173 => "FOLDERID_Profile",
        0x0AC0837C_BBF8_452A_850D_79D08E667CA7 => "FOLDERID_ComputerFolder",
        0xAE50C081_EBD2_438A_8655_8A092E34987A => "FOLDERID_Recent",
        0x8983036C_27C0_404B_8F08_102D10DCFD74 => "FOLDERID_SendTo",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::{console_payload, extra_block, property_storage, terminal_block, utf16, TRACKER_BLOCK};

    fn parse(data: &[u8]) -> Result<Vec<ExtraDataBlock>> {
        parse_extra_data(&mut ByteReader::new(data), &ParserConfig::default())
    }

    #[test]
    fn test_tracker_block() {
        let mut data = TRACKER_BLOCK.to_vec();
        data.extend(terminal_block());
        let blocks = parse(&data).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].size, 96);
        assert_eq!(blocks[0].signature, TRACKER_PROPS);

        match &blocks[0].data {
            ExtraData::Tracker(tracker) => {
                assert_eq!(tracker.length, 88);
                assert_eq!(tracker.version, 0);
                assert_eq!(tracker.machine_id, LnkString::from("desktop-eis938n"));
                assert_eq!(tracker.droid_volume_id.to_string(), "3e8d4568-e411-4918-8f78-97cd6cb340c5");
                assert_eq!(tracker.droid_file_id.to_string(), "09f158c0-5a6a-11ed-a10d-0800276eb45e");
                assert_eq!(tracker.birth_droid_volume_id, tracker.droid_volume_id);
                assert_eq!(tracker.mac_address().as_deref(), Some("08:00:27:6e:b4:5e"));
            }
            other => panic!("expected Tracker, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_block_then_known_block() {
        let payload = [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01];
        let mut data = extra_block(0xA000_00FF, &payload);
        let mut special = 0x26u32.to_le_bytes().to_vec();
        special.extend_from_slice(&0x14u32.to_le_bytes());
        data.extend(extra_block(SPECIAL_FOLDER_PROPS, &special));
        data.extend(terminal_block());

        let blocks = parse(&data).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].signature, 0xA000_00FF);
        assert_eq!(blocks[0].size, 14);
        assert_eq!(blocks[0].data, ExtraData::Unknown(payload.to_vec()));
        match &blocks[1].data {
            ExtraData::SpecialFolder(folder) => {
                assert_eq!(folder.special_folder_id, 0x26);
                assert_eq!(folder.offset, 0x14);
                assert_eq!(folder.folder_name(), Some("CSIDL_PROGRAM_FILES"));
            }
            other => panic!("expected SpecialFolder, got {:?}", other),
        }
    }

    #[test]
    fn test_environment_block() {
        let mut payload = vec![0u8; 780];
        let ansi = b"%windir%\\notepad.exe";
        payload[..ansi.len()].copy_from_slice(ansi);
        let wide = utf16("%windir%\\notepad.exe");
        payload[260..260 + wide.len()].copy_from_slice(&wide);
        let data = extra_block(ENVIRONMENT_PROPS, &payload);
        assert_eq!(data.len(), 0x314);

        let blocks = parse(&data).unwrap();
        match &blocks[0].data {
            ExtraData::EnvironmentVariable(env) => {
                assert_eq!(env.target_ansi, LnkString::from("%windir%\\notepad.exe"));
                assert_eq!(env.target(), &LnkString::from("%windir%\\notepad.exe"));
            }
            other => panic!("expected EnvironmentVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_known_folder_and_console_blocks() {
        let documents = Uuid::from_u128(0xFDD39AD0_238F_46AF_ADB4_6C85480369C7);
        let mut known = documents.to_bytes_le().to_vec();
        known.extend_from_slice(&0x4Eu32.to_le_bytes());
        let mut data = extra_block(KNOWN_FOLDER_PROPS, &known);
        data.extend(extra_block(CONSOLE_PROPS, &console_payload()));
        data.extend(extra_block(CONSOLE_FE_PROPS, &65001u32.to_le_bytes()));

        let blocks = parse(&data).unwrap();
        assert_eq!(blocks.len(), 3);
        match &blocks[0].data {
            ExtraData::KnownFolder(folder) => {
                assert_eq!(folder.known_folder_id, documents);
                assert_eq!(folder.folder_name(), Some("FOLDERID_Documents"));
            }
            other => panic!("expected KnownFolder, got {:?}", other),
        }
        assert_eq!(blocks[1].size, 0xCC);
        assert!(matches!(blocks[1].data, ExtraData::Console(_)));
        assert_eq!(blocks[2].data, ExtraData::ConsoleFe(ConsoleFeProps { code_page: 65001 }));
    }

    #[test]
    fn test_shim_and_vista_id_list() {
        let mut shim = utf16("WINXPSP3");
        shim.resize(0x80, 0);
        let mut data = extra_block(SHIM_PROPS, &shim);

        let mut id_list = vec![0x05, 0x00, 0x1F, 0x50, 0xE0];
        id_list.extend_from_slice(&[0x00, 0x00]);
        data.extend(extra_block(VISTA_AND_ABOVE_ID_LIST_PROPS, &id_list));

        let blocks = parse(&data).unwrap();
        assert_eq!(
            blocks[0].data,
            ExtraData::Shim(ShimProps {
                layer_name: LnkString::from("WINXPSP3")
            })
        );
        match &blocks[1].data {
            ExtraData::VistaAndAboveIdList(list) => {
                assert_eq!(list.items.len(), 1);
                assert_eq!(list.items[0].data, vec![0x1F, 0x50, 0xE0]);
            }
            other => panic!("expected VistaAndAboveIdList, got {:?}", other),
        }
    }

    #[test]
    fn test_property_store_block() {
        let format = Uuid::from_u128(0xB725F130_47EF_101A_A5F1_02608C9EEBAC);
        let mut value = 17u32.to_le_bytes().to_vec();
        value.extend_from_slice(&12u32.to_le_bytes());
        value.push(0);
        value.extend_from_slice(&19u16.to_le_bytes());
        value.extend_from_slice(&0u16.to_le_bytes());
        value.extend_from_slice(&2048u32.to_le_bytes());
        let mut payload = property_storage(&format, &value);
        payload.extend_from_slice(&0u32.to_le_bytes());

        let blocks = parse(&extra_block(PROPERTY_STORE_PROPS, &payload)).unwrap();
        match &blocks[0].data {
            ExtraData::PropertyStore(store) => {
                let size = store.get(&format, 12).unwrap();
                assert_eq!(size.data, crate::property_store::PropertyData::UI4(2048));
                assert_eq!(size.description.as_deref(), Some("System.Size"));
            }
            other => panic!("expected PropertyStore, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_and_short_chains() {
        assert!(parse(&[]).unwrap().is_empty());
        assert!(parse(&terminal_block()).unwrap().is_empty());
        // Fewer than four bytes left
        assert!(parse(&[0x01, 0x02]).unwrap().is_empty());
    }

    #[test]
    fn test_chain_end_detects_truncated_size() {
        let data = [0x10, 0x00];
        let mut reader = ByteReader::new(&data);
        assert!(parse_extra_data(&mut reader, &ParserConfig::default()).unwrap().is_empty());
        assert_eq!(reader.remaining(), 2);
        assert_eq!(chain_end(&reader, false), ChainEnd::Truncated(2));

        let mut data = TRACKER_BLOCK.to_vec();
        data.extend_from_slice(&[0x60, 0x00, 0x00]);
        let mut reader = ByteReader::new(&data);
        assert_eq!(parse_extra_data(&mut reader, &ParserConfig::default()).unwrap().len(), 1);
        assert_eq!(chain_end(&reader, false), ChainEnd::Truncated(3));

        let mut data = terminal_block();
        data.extend_from_slice(&[0xAA, 0xBB]);
        let mut reader = ByteReader::new(&data);
        parse_extra_data(&mut reader, &ParserConfig::default()).unwrap();
        assert_eq!(chain_end(&reader, true), ChainEnd::Trailing(2));

        let reader = ByteReader::new(&TRACKER_BLOCK[..0]);
        assert_eq!(chain_end(&reader, false), ChainEnd::Clean);
    }

    #[test]
    fn test_block_overruns_buffer() {
        let mut data = extra_block(0xA000_00FF, &[1, 2, 3, 4]);
        data[0] = 0x40;
        assert!(matches!(
            parse(&data),
            Err(Error::UnexpectedEnd { section: "ShellLink", needed: 0x40, .. })
        ));
    }

    #[test]
    fn test_known_block_too_small() {
        let data = extra_block(TRACKER_PROPS, &[0u8; 16]);
        assert!(matches!(
            parse(&data),
            Err(Error::InvalidSize { minimum: 0x60, actual: 24, .. })
        ));
    }
}
