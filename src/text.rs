//! String values decoded from shell link fields
//!
//! Shell links store text either in the system's legacy code page or as UTF-16LE.
//! A field whose bytes cannot be decoded is kept as raw bytes instead of failing
//! the whole file.

use encoding::all::WINDOWS_1252;
use encoding::{DecoderTrap, Encoding};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoding a text field was stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// Legacy 8-bit code page
    Ansi,
    /// UTF-16 little endian
    Utf16,
}

/// A decoded text field, or the raw bytes of one that failed to decode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LnkString {
    Text(String),
    Undecodable {
        #[serde(with = "base64_bytes")]
        raw: Vec<u8>,
        encoding: TextEncoding,
    },
}

impl LnkString {
    /// Decoded text, if decoding succeeded
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LnkString::Text(text) => Some(text),
            LnkString::Undecodable { .. } => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            LnkString::Text(text) => text.is_empty(),
            LnkString::Undecodable { raw, .. } => raw.is_empty(),
        }
    }

    /// Text with undecodable input replaced by U+FFFD
    pub fn to_lossy(&self) -> String {
        match self {
            LnkString::Text(text) => text.clone(),
            LnkString::Undecodable { raw, encoding: TextEncoding::Ansi } => String::from_utf8_lossy(raw).into_owned(),
            LnkString::Undecodable { raw, encoding: TextEncoding::Utf16 } => {
                let units: Vec<u16> = raw
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
        }
    }
}

impl fmt::Display for LnkString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LnkString::Text(text) => f.write_str(text),
            LnkString::Undecodable { .. } => write!(f, "{} (undecodable)", self.to_lossy()),
        }
    }
}

impl From<&str> for LnkString {
    fn from(text: &str) -> Self {
        LnkString::Text(text.to_string())
    }
}

/// Decode legacy 8-bit text.
///
/// UTF-8 is tried first since most tools write ASCII paths. With `ansi_fallback`
/// the bytes are then read as Windows-1252.
pub fn decode_ansi(bytes: &[u8], ansi_fallback: bool) -> LnkString {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return LnkString::Text(text.to_string());
    }
    if ansi_fallback {
        if let Ok(text) = WINDOWS_1252.decode(bytes, DecoderTrap::Strict) {
            return LnkString::Text(text);
        }
    }
    log::debug!("Keeping {} undecodable ANSI bytes", bytes.len());
    LnkString::Undecodable {
        raw: bytes.to_vec(),
        encoding: TextEncoding::Ansi,
    }
}

/// Decode UTF-16LE code units; unpaired surrogates keep the raw bytes
pub fn decode_utf16(units: &[u16]) -> LnkString {
    match String::from_utf16(units) {
        Ok(text) => LnkString::Text(text),
        Err(_) => {
            log::debug!("Keeping {} undecodable UTF-16 units", units.len());
            LnkString::Undecodable {
                raw: units.iter().flat_map(|unit| unit.to_le_bytes()).collect(),
                encoding: TextEncoding::Utf16,
            }
        }
    }
}

/// Decode a fixed-size ANSI buffer holding a NUL-padded string
pub fn decode_ansi_fixed(buffer: &[u8], ansi_fallback: bool) -> LnkString {
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    decode_ansi(&buffer[..end], ansi_fallback)
}

/// Decode a fixed-size UTF-16LE buffer holding a NUL-padded string
pub fn decode_utf16_fixed(buffer: &[u8]) -> LnkString {
    let units: Vec<u16> = buffer
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();
    decode_utf16(&units)
}

/// Serde helper writing byte buffers as standard base64 strings
pub mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.as_bytes()).map_err(serde::de::Error::custom)
    }
}
