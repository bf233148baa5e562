//! Serialized property store parsing
//!
//! The PropertyStoreDataBlock carries one or more serialized property storages.
//! Each storage is keyed by a format GUID and holds typed values named either by
//! an integer id or, for one well-known format, by a string.

use crate::datetime::filetime_to_datetime;
use crate::error::{Error, Result};
use crate::reader::ByteReader;
use crate::text::{base64_bytes, decode_utf16, LnkString};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Version field of every serialized property storage ("1SPS")
pub const STORAGE_VERSION: u32 = 0x5350_5331;

/// Format id whose values are named by strings
pub const STRING_NAMED_FORMAT: Uuid = Uuid::from_u128(0xD5CDD505_2E9C_101B_9397_08002B2CF9AE);

/// Property type constants (VT_* values)
mod property_types {
    pub const VT_EMPTY: u16 = 0;
    pub const VT_NULL: u16 = 1;
    pub const VT_I2: u16 = 2;
    pub const VT_I4: u16 = 3;
    pub const VT_BSTR: u16 = 8;
    pub const VT_BOOL: u16 = 11;
    pub const VT_UI4: u16 = 19;
    pub const VT_I8: u16 = 20;
    pub const VT_UI8: u16 = 21;
    pub const VT_LPWSTR: u16 = 31;
    pub const VT_FILETIME: u16 = 64;
    pub const VT_CLSID: u16 = 72;
}

use property_types::*;

/// Decoded PropertyStoreDataBlock payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyStore {
    pub storages: Vec<PropertyStorage>,
    /// Bytes from the first storage that failed to decode onwards
    #[serde(with = "optional_base64", default, skip_serializing_if = "Option::is_none")]
    pub undecoded: Option<Vec<u8>>,
}

/// One serialized property storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyStorage {
    pub size: u32,
    pub version: u32,
    pub format_id: Uuid,
    pub values: Vec<PropertyValue>,
}

/// How a value is identified inside its storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyName {
    Id(u32),
    Name(LnkString),
}

/// A named, typed property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub value_size: u32,
    pub name: PropertyName,
    /// Property type (VT_* value)
    pub property_type: u16,
    pub data: PropertyData,
    /// Canonical property name, when the key is a well-known one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Property data types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyData {
    Empty,
    I2(i16),
    I4(i32),
    UI4(u32),
    I8(i64),
    UI8(u64),
    Bool(bool),
    String(LnkString),
    FileTime(Option<DateTime<Utc>>),
    Guid(Uuid),
    /// Any other type, kept as the bytes following the type header
    Raw(#[serde(with = "base64_bytes")] Vec<u8>),
}

impl PropertyStore {
    /// Decode a PropertyStoreDataBlock payload.
    ///
    /// A storage that fails to decode stops the chain; its bytes and everything
    /// after them are kept in `undecoded`.
    pub fn parse(payload: &mut ByteReader<'_>) -> Self {
        let mut storages = Vec::new();
        let mut undecoded = None;

        while payload.remaining() >= 4 {
            let mut attempt = payload.clone();
            match PropertyStorage::parse(&mut attempt) {
                Ok(None) => {
                    *payload = attempt;
                    break;
                }
                Ok(Some(storage)) => {
                    storages.push(storage);
                    *payload = attempt;
                }
                Err(err) => {
                    log::warn!("Keeping undecoded property storage at offset 0x{:X}: {}", payload.absolute_position(), err);
                    undecoded = Some(payload.read_rest().to_vec());
                    break;
                }
            }
        }

        Self { storages, undecoded }
    }

    /// Look up a value by format id and property id
    pub fn get(&self, format_id: &Uuid, property_id: u32) -> Option<&PropertyValue> {
        self.storages
            .iter()
            .filter(|storage| storage.format_id == *format_id)
            .flat_map(|storage| storage.values.iter())
            .find(|value| value.name == PropertyName::Id(property_id))
    }
}

impl PropertyStorage {
    /// Decode one storage; `None` for the zero-size terminator
    pub fn parse(reader: &mut ByteReader<'_>) -> Result<Option<Self>> {
        let size = reader.peek_u32()?;
        if size == 0 {
            reader.read_u32()?;
            return Ok(None);
        }
        if size < 24 {
            return Err(Error::InvalidSize {
                section: "PropertyStorage",
                field: "StorageSize",
                minimum: 24,
                actual: size as u64,
            });
        }
        let mut storage = reader.take(size as usize, "PropertyStorage")?;
        storage.read_u32()?;

        let version = storage.read_u32()?;
        if version != STORAGE_VERSION {
            return Err(Error::FormatMismatch {
                field: "PropertyStorage Version",
                expected: format!("0x{:08X}", STORAGE_VERSION),
                actual: format!("0x{:08X}", version),
            });
        }
        let format_id = Uuid::from_bytes_le(storage.read_array()?);
        let string_named = format_id == STRING_NAMED_FORMAT;

        let mut values = Vec::new();
        while storage.remaining() >= 4 {
            let value_size = storage.read_u32()?;
            if value_size == 0 {
                break;
            }
            if value_size < 9 {
                return Err(Error::InvalidSize {
                    section: "PropertyStorage",
                    field: "ValueSize",
                    minimum: 9,
                    actual: value_size as u64,
                });
            }
            let mut entry = storage.take(value_size as usize - 4, "PropertyValue")?;
            values.push(PropertyValue::parse(&mut entry, value_size, string_named, &format_id)?);
        }

        Ok(Some(Self {
            size,
            version,
            format_id,
            values,
        }))
    }
}

impl PropertyValue {
    fn parse(entry: &mut ByteReader<'_>, value_size: u32, string_named: bool, format_id: &Uuid) -> Result<Self> {
        let name = if string_named {
            let name_size = entry.read_u32()?;
            entry.read_u8()?;
            let units = entry.read_utf16_units(name_size as usize / 2)?;
            PropertyName::Name(decode_utf16(trim_nul(&units)))
        } else {
            let id = entry.read_u32()?;
            entry.read_u8()?;
            PropertyName::Id(id)
        };

        let property_type = entry.read_u16()?;
        entry.read_u16()?;
        let data = PropertyData::parse(entry, property_type)?;

        let description = match name {
            PropertyName::Id(id) => property_description(format_id, id).map(str::to_string),
            PropertyName::Name(_) => None,
        };

        Ok(Self {
            value_size,
            name,
            property_type,
            data,
            description,
        })
    }
}

impl PropertyData {
    fn parse(value: &mut ByteReader<'_>, property_type: u16) -> Result<Self> {
        let data = match property_type {
            VT_EMPTY | VT_NULL => PropertyData::Empty,
            VT_I2 => PropertyData::I2(value.read_i16()?),
            VT_I4 => PropertyData::I4(value.read_i32()?),
            VT_UI4 => PropertyData::UI4(value.read_u32()?),
            VT_I8 => PropertyData::I8(value.read_i64()?),
            VT_UI8 => PropertyData::UI8(value.read_u64()?),
            VT_BOOL => PropertyData::Bool(value.read_u16()? != 0),
            VT_LPWSTR => {
                // Length in characters, terminator included
                let length = value.read_u32()? as usize;
                let units = value.read_utf16_units(length)?;
                PropertyData::String(decode_utf16(trim_nul(&units)))
            }
            VT_BSTR => {
                // Size in bytes, terminator included
                let size = value.read_u32()? as usize;
                let units = value.read_utf16_units(size / 2)?;
                PropertyData::String(decode_utf16(trim_nul(&units)))
            }
            VT_FILETIME => PropertyData::FileTime(filetime_to_datetime(value.read_u64()?)),
            VT_CLSID => PropertyData::Guid(Uuid::from_bytes_le(value.read_array()?)),
            _ => PropertyData::Raw(value.read_rest().to_vec()),
        };
        Ok(data)
    }
}

fn trim_nul(units: &[u16]) -> &[u16] {
    let end = units.iter().position(|&unit| unit == 0).unwrap_or(units.len());
    &units[..end]
}

/// Canonical name of a well-known property key
pub fn property_description(format_id: &Uuid, property_id: u32) -> Option<&'static str> {
    let name = match (format_id.as_u128(), property_id) {
        // Shell details
        (0x28636AA6_953D_11D2_B5D6_00C04FD918D0, 5) => "System.ComputerName",
        (0x28636AA6_953D_11D2_B5D6_00C04FD918D0, 8) => "System.ItemPathDisplayNarrow",
        (0x28636AA6_953D_11D2_B5D6_00C04FD918D0, 9) => "System.PerceivedType",
        (0x28636AA6_953D_11D2_B5D6_00C04FD918D0, 11) => "System.ItemType",
        (0x28636AA6_953D_11D2_B5D6_00C04FD918D0, 24) => "System.ParsingName",
        (0x28636AA6_953D_11D2_B5D6_00C04FD918D0, 25) => "System.SFGAOFlags",
        // Storage
        (0xB725F130_47EF_101A_A5F1_02608C9EEBAC, 2) => "System.ItemFolderNameDisplay",
        (0xB725F130_47EF_101A_A5F1_02608C9EEBAC, 4) => "System.ItemTypeText",
        (0xB725F130_47EF_101A_A5F1_02608C9EEBAC, 10) => "System.ItemNameDisplay",
        (0xB725F130_47EF_101A_A5F1_02608C9EEBAC, 12) => "System.Size",
        (0xB725F130_47EF_101A_A5F1_02608C9EEBAC, 13) => "System.FileAttributes",
        (0xB725F130_47EF_101A_A5F1_02608C9EEBAC, 14) => "System.DateModified",
        (0xB725F130_47EF_101A_A5F1_02608C9EEBAC, 15) => "System.DateCreated",
        (0xB725F130_47EF_101A_A5F1_02608C9EEBAC, 16) => "System.DateAccessed",
        // Document summary
        (0xF29F85E0_4FF9_1068_AB91_08002B27B3D9, 2) => "System.Title",
        (0xF29F85E0_4FF9_1068_AB91_08002B27B3D9, 3) => "System.Subject",
        (0xF29F85E0_4FF9_1068_AB91_08002B27B3D9, 4) => "System.Author",
        (0xF29F85E0_4FF9_1068_AB91_08002B27B3D9, 6) => "System.Comment",
        // Volume
        (0x446D16B1_8DAD_4870_A748_402EA43D788C, 104) => "System.VolumeId",
        (0x9B174B35_40FF_11D2_A27E_00C04FC30871, 4) => "System.Volume.FileSystem",
        // Link
        (0xB9B4B3FC_2B51_4A42_B5D8_324146AFCF25, 2) => "System.Link.TargetParsingPath",
        (0xDABD30ED_0043_4789_A7F8_D013A4736622, 100) => "System.ItemFolderPathDisplayNarrow",
        (0xE3E0584C_B788_4A5A_BB20_7F5A44C9ACDD, 6) => "System.ItemFolderPathDisplay",
        // App user model
        (0x9F4C2855_9F79_4B39_A8D0_E1D42DE1D5F3, 5) => "System.AppUserModel.ID",
        (0x9F4C2855_9F79_4B39_A8D0_E1D42DE1D5F3, 9) => "System.AppUserModel.ExcludeFromShowInNewInstall",
        (0x9F4C2855_9F79_4B39_A8D0_E1D42DE1D5F3, 11) => "System.AppUserModel.IsDestListSeparator",
        (0x9F4C2855_9F79_4B39_A8D0_E1D42DE1D5F3, 12) => "System.AppUserModel.IsDualMode",
        _ => return None,
    };
    Some(name)
}

mod optional_base64 {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => STANDARD
                .decode(encoded.as_bytes())
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
