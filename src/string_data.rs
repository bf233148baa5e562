//! StringData: the counted display strings following LinkInfo

use crate::error::Result;
use crate::flags::LinkFlags;
use crate::lnk_parser::ParserConfig;
use crate::reader::ByteReader;
use crate::text::{decode_ansi, decode_utf16, LnkString};
use serde::{Deserialize, Serialize};

/// StringData section; each field is present only when its flag is set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringData {
    /// NAME_STRING: description of the link
    pub name: Option<LnkString>,
    pub relative_path: Option<LnkString>,
    pub working_dir: Option<LnkString>,
    /// COMMAND_LINE_ARGUMENTS
    pub arguments: Option<LnkString>,
    pub icon_location: Option<LnkString>,
}

impl StringData {
    /// Decode the fields selected by `flags`, in file order
    pub fn parse(reader: &mut ByteReader<'_>, flags: &LinkFlags, config: &ParserConfig) -> Result<Self> {
        let mut data = StringData::default();
        if !flags.has_string_data() {
            return Ok(data);
        }

        let unicode = flags.is_unicode;
        let mut next = |present: bool| -> Result<Option<LnkString>> {
            if present {
                read_counted(reader, unicode, config).map(Some)
            } else {
                Ok(None)
            }
        };

        data.name = next(flags.has_name)?;
        data.relative_path = next(flags.has_relative_path)?;
        data.working_dir = next(flags.has_working_dir)?;
        data.arguments = next(flags.has_arguments)?;
        data.icon_location = next(flags.has_icon_location)?;
        Ok(data)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.relative_path.is_none()
            && self.working_dir.is_none()
            && self.arguments.is_none()
            && self.icon_location.is_none()
    }
}

/// Read one CountCharacters-prefixed string
fn read_counted(reader: &mut ByteReader<'_>, unicode: bool, config: &ParserConfig) -> Result<LnkString> {
    let count = reader.read_u16()? as usize;
    if unicode {
        let units = reader.read_utf16_units(count)?;
        Ok(decode_utf16(&units))
    } else {
        let bytes = reader.read_bytes(count)?;
        Ok(decode_ansi(bytes, config.ansi_fallback))
    }
}
