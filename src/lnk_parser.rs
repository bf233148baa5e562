//! Windows LNK (Shell Link) decoder
//!
//! Walks a shell link buffer section by section: the fixed header, then the
//! flag-gated LinkTargetIDList, LinkInfo and StringData, and finally the
//! ExtraData chain. Sections are decoded strictly in file order and the first
//! structural error aborts decoding.

use crate::error::Result;
use crate::extra_data::{parse_extra_data, ExtraData, ExtraDataBlock};
use crate::header::ShellLinkHeader;
use crate::id_list::IdList;
use crate::link_info::LinkInfo;
use crate::reader::ByteReader;
use crate::string_data::StringData;
use crate::text::LnkString;
use serde::{Deserialize, Serialize};

/// Decoder settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Upper bound, in characters, for zero-terminated strings
    pub max_string_len: usize,
    /// Retry legacy 8-bit text as Windows-1252 when it is not UTF-8
    pub ansi_fallback: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_string_len: 32768,
            ansi_fallback: true,
        }
    }
}

impl ParserConfig {
    /// Legacy text must be valid UTF-8; anything else is kept as raw bytes
    pub fn strict() -> Self {
        Self {
            ansi_fallback: false,
            ..Self::default()
        }
    }
}

/// A decoded shell link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellLink {
    pub header: ShellLinkHeader,
    /// LinkTargetIDList, present with HasLinkTargetIDList
    pub id_list: Option<IdList>,
    /// LinkInfo, present with HasLinkInfo
    pub link_info: Option<LinkInfo>,
    pub string_data: StringData,
    pub extra_data: Vec<ExtraDataBlock>,
}

impl ShellLink {
    /// Best available target path
    ///
    /// LinkInfo (local base path or network share, joined with the common path
    /// suffix) wins over the relative path from StringData.
    pub fn target_path(&self) -> Option<String> {
        self.link_info
            .as_ref()
            .and_then(LinkInfo::full_path)
            .or_else(|| self.string_data.relative_path.as_ref().map(LnkString::to_lossy))
    }

    pub fn arguments(&self) -> Option<&LnkString> {
        self.string_data.arguments.as_ref()
    }

    pub fn working_directory(&self) -> Option<&LnkString> {
        self.string_data.working_dir.as_ref()
    }

    pub fn icon_location(&self) -> Option<&LnkString> {
        self.string_data.icon_location.as_ref()
    }

    /// Description string (NAME_STRING)
    pub fn name(&self) -> Option<&LnkString> {
        self.string_data.name.as_ref()
    }

    /// First ExtraData block matching `predicate`
    pub fn find_extra<F>(&self, predicate: F) -> Option<&ExtraData>
    where
        F: Fn(&ExtraData) -> bool,
    {
        self.extra_data.iter().map(|block| &block.data).find(|data| predicate(data))
    }
}

/// Shell link decoder
#[derive(Debug, Clone, Default)]
pub struct LnkParser {
    config: ParserConfig,
}

impl LnkParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Decode a complete shell link buffer
    pub fn parse(&self, data: &[u8]) -> Result<ShellLink> {
        let mut reader = ByteReader::new(data);

        let header = ShellLinkHeader::parse(&mut reader)?;
        let flags = header.flags();
        log::debug!("Link flags: {}", flags.names().join(" | "));

        let id_list = if flags.has_link_target_id_list {
            Some(IdList::parse(&mut reader)?)
        } else {
            None
        };

        // ForceNoLinkInfo tells the shell to ignore LinkInfo; the bytes are
        // still present in the stream when HasLinkInfo is set.
        let link_info = if flags.has_link_info {
            Some(LinkInfo::parse(&mut reader, &self.config)?)
        } else {
            None
        };

        let string_data = StringData::parse(&mut reader, &flags, &self.config)?;
        let extra_data = parse_extra_data(&mut reader, &self.config)?;

        Ok(ShellLink {
            header,
            id_list,
            link_info,
            string_data,
            extra_data,
        })
    }
}

/// Decode a shell link with the default configuration
pub fn decode(data: &[u8]) -> Result<ShellLink> {
    LnkParser::new().parse(data)
}
