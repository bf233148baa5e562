//! Console window settings carried by ConsoleDataBlock and ConsoleFEDataBlock

use crate::error::Result;
use crate::reader::ByteReader;
use crate::text::{decode_utf16_fixed, LnkString};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// ConsoleDataBlock payload length after size and signature
pub const CONSOLE_PAYLOAD_SIZE: usize = 0xCC - 8;

/// ConsoleFEDataBlock payload length after size and signature
pub const CONSOLE_FE_PAYLOAD_SIZE: usize = 0x0C - 8;

bitflags! {
    /// Text and background colors of a console cell
    #[derive(Serialize, Deserialize)]
    pub struct FillAttributes: u16 {
        const FOREGROUND_BLUE      = 0x0001;
        const FOREGROUND_GREEN     = 0x0002;
        const FOREGROUND_RED       = 0x0004;
        const FOREGROUND_INTENSITY = 0x0008;
        const BACKGROUND_BLUE      = 0x0010;
        const BACKGROUND_GREEN     = 0x0020;
        const BACKGROUND_RED       = 0x0040;
        const BACKGROUND_INTENSITY = 0x0080;
    }
}

/// Font family from the high nibble of FontFamily
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    DontCare,
    Roman,
    Swiss,
    Modern,
    Script,
    Decorative,
    Other(u32),
}

/// ConsoleDataBlock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleProps {
    pub fill_attributes: FillAttributes,
    pub popup_fill_attributes: FillAttributes,
    pub screen_buffer_size_x: i16,
    pub screen_buffer_size_y: i16,
    pub window_size_x: i16,
    pub window_size_y: i16,
    pub window_origin_x: i16,
    pub window_origin_y: i16,
    pub unused1: u32,
    pub unused2: u32,
    pub font_size: u32,
    /// Raw FontFamily: family in the high nibble, pitch in the low nibble
    pub font_family: u32,
    pub font_weight: u32,
    pub face_name: LnkString,
    /// Cursor size in percent of the cell
    pub cursor_size: u32,
    pub full_screen: bool,
    pub quick_edit: bool,
    pub insert_mode: bool,
    pub auto_position: bool,
    pub history_buffer_size: u32,
    pub number_of_history_buffers: u32,
    pub history_no_dup: bool,
    pub color_table: [u32; 16],
}

impl ConsoleProps {
    /// Decode a ConsoleDataBlock payload
    pub fn parse(payload: &mut ByteReader<'_>) -> Result<Self> {
        let fill_attributes = FillAttributes::from_bits_truncate(payload.read_u16()?);
        let popup_fill_attributes = FillAttributes::from_bits_truncate(payload.read_u16()?);
        let screen_buffer_size_x = payload.read_i16()?;
        let screen_buffer_size_y = payload.read_i16()?;
        let window_size_x = payload.read_i16()?;
        let window_size_y = payload.read_i16()?;
        let window_origin_x = payload.read_i16()?;
        let window_origin_y = payload.read_i16()?;
        let unused1 = payload.read_u32()?;
        let unused2 = payload.read_u32()?;
        let font_size = payload.read_u32()?;
        let font_family = payload.read_u32()?;
        let font_weight = payload.read_u32()?;
        let face_name = decode_utf16_fixed(payload.read_bytes(64)?);
        let cursor_size = payload.read_u32()?;
        let full_screen = payload.read_u32()? != 0;
        let quick_edit = payload.read_u32()? != 0;
        let insert_mode = payload.read_u32()? != 0;
        let auto_position = payload.read_u32()? != 0;
        let history_buffer_size = payload.read_u32()?;
        let number_of_history_buffers = payload.read_u32()?;
        let history_no_dup = payload.read_u32()? != 0;

        let mut color_table = [0u32; 16];
        for entry in color_table.iter_mut() {
            *entry = payload.read_u32()?;
        }

        Ok(Self {
            fill_attributes,
            popup_fill_attributes,
            screen_buffer_size_x,
            screen_buffer_size_y,
            window_size_x,
            window_size_y,
            window_origin_x,
            window_origin_y,
            unused1,
            unused2,
            font_size,
            font_family,
            font_weight,
            face_name,
            cursor_size,
            full_screen,
            quick_edit,
            insert_mode,
            auto_position,
            history_buffer_size,
            number_of_history_buffers,
            history_no_dup,
            color_table,
        })
    }

    pub fn family(&self) -> FontFamily {
        match self.font_family & 0xF0 {
            0x00 => FontFamily::DontCare,
            0x10 => FontFamily::Roman,
            0x20 => FontFamily::Swiss,
            0x30 => FontFamily::Modern,
            0x40 => FontFamily::Script,
            0x50 => FontFamily::Decorative,
            other => FontFamily::Other(other),
        }
    }

    /// FW_BOLD and heavier
    pub fn is_bold(&self) -> bool {
        self.font_weight >= 700
    }

    /// Font height in pixels (high word of FontSize)
    pub fn font_height(&self) -> u16 {
        (self.font_size >> 16) as u16
    }
}

/// ConsoleFEDataBlock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleFeProps {
    pub code_page: u32,
}

impl ConsoleFeProps {
    pub fn parse(payload: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            code_page: payload.read_u32()?,
        })
    }
}
