//! Error types and handling for shell link decoding.

use std::fmt;

/// Custom error type for lnkparse operations
#[derive(Debug)]
pub enum Error {
    /// A structural constant does not match the shell link format
    FormatMismatch {
        field: &'static str,
        expected: String,
        actual: String,
    },
    /// A read needed more bytes than the enclosing region holds
    UnexpectedEnd {
        section: &'static str,
        /// Absolute offset in the input buffer where the read started
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// An offset field points outside its structure
    InvalidOffset {
        section: &'static str,
        field: &'static str,
        offset: u64,
        limit: usize,
    },
    /// A declared size is smaller than the section's fixed fields
    InvalidSize {
        section: &'static str,
        field: &'static str,
        minimum: u64,
        actual: u64,
    },
    /// I/O related errors
    Io(std::io::Error),
    /// Input path does not exist
    NotFound(String),
    /// JSON serialization errors
    Json(serde_json::Error),
    /// Invalid input format
    InvalidInput(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FormatMismatch { field, expected, actual } => write!(
                f,
                "Format mismatch in {}: expected {}, got {}",
                field, expected, actual
            ),
            Error::UnexpectedEnd { section, offset, needed, available } => write!(
                f,
                "Unexpected end of data in {} at offset 0x{:X}: need {} bytes, {} available",
                section, offset, needed, available
            ),
            Error::InvalidOffset { section, field, offset, limit } => write!(
                f,
                "Invalid offset in {}: {} = 0x{:X} is outside the structure (size 0x{:X})",
                section, field, offset, limit
            ),
            Error::InvalidSize { section, field, minimum, actual } => write!(
                f,
                "Invalid size in {}: {} = {} is below the minimum of {}",
                section, field, actual, minimum
            ),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::NotFound(path) => write!(f, "File not found: {}", path),
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl Error {
    /// True for errors raised by the decoder itself, as opposed to file or report handling
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Error::FormatMismatch { .. }
                | Error::UnexpectedEnd { .. }
                | Error::InvalidOffset { .. }
                | Error::InvalidSize { .. }
        )
    }
}

// Convenient conversion traits
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;
