//! # lnkparse - Windows Shell Link decoder
//!
//! Decodes the binary ".lnk" shortcut format into typed structures without
//! touching the Windows shell: the fixed header, the target ID list, LinkInfo
//! with its volume and network sub-structures, the StringData fields and the
//! ExtraData block chain.
//!
//! ```no_run
//! let data = std::fs::read("notepad.lnk")?;
//! let link = lnkparse::decode(&data)?;
//! println!("{:?}", link.target_path());
//! # Ok::<(), lnkparse::Error>(())
//! ```
//!
//! The decoder works on an in-memory buffer and never performs I/O. The `app`,
//! `cli` and `output` modules make up the `lnkparse` binary.

pub mod app;
pub mod cli;
pub mod console;
pub mod datetime;
pub mod error;
pub mod extra_data;
pub mod flags;
pub mod header;
pub mod id_list;
pub mod link_info;
pub mod lnk_parser;
pub mod network;
pub mod output;
pub mod property_store;
pub mod reader;
pub mod string_data;
pub mod text;

#[cfg(test)]
mod testdata;

pub use error::{Error, Result};
pub use extra_data::{ExtraData, ExtraDataBlock};
pub use flags::{FileAttributes, LinkFlags};
pub use header::ShellLinkHeader;
pub use lnk_parser::{decode, LnkParser, ParserConfig, ShellLink};
pub use output::{OutputFormat, OutputWriter};
pub use text::LnkString;
