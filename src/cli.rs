//! Command-line interface definitions and parsing.

use crate::error::{Error, Result};
use crate::lnk_parser::ParserConfig;
use crate::output::OutputFormat;
use clap::Parser;
use log::LevelFilter;

/// lnkparse - Windows Shell Link (.lnk) decoder
#[derive(Parser, Debug)]
#[command(name = "lnkparse")]
#[command(about = "lnkparse - Decode Windows Shell Link (.lnk) files", version)]
#[command(long_about = "Decodes Windows shortcut files without the Windows shell:
header timestamps and flags, target ID list, LinkInfo volume and network details,
string data, and the ExtraData blocks (tracker, known folders, property store, console).")]
pub struct Args {
    /// Shell link files to decode
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Output file (use "-" for stdout, default: stdout)
    #[arg(long)]
    pub output: Option<String>,

    /// Display timestamps in specified timezone (e.g., "UTC+8", "UTC-5", "UTC", "Europe/Berlin")
    #[arg(long, default_value = "UTC")]
    pub timezone: String,

    /// Longest zero-terminated string to read, in characters
    #[arg(long, default_value_t = 32768)]
    pub max_string_len: usize,

    /// Keep legacy text that is not UTF-8 as raw bytes instead of reading it as Windows-1252
    #[arg(long)]
    pub strict_text: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parsed and validated CLI configuration
#[derive(Debug)]
pub struct Config {
    pub files: Vec<String>,
    pub format: OutputFormat,
    pub output: Option<String>,
    pub timezone: chrono_tz::Tz,
    pub parser: ParserConfig,
    pub log_level: LevelFilter,
}

impl Config {
    /// Parse and validate CLI arguments into a configuration
    pub fn from_args(args: Args) -> Result<Self> {
        if args.files.is_empty() {
            return Err(Error::InvalidInput("At least one .lnk file is required".to_string()));
        }
        if args.max_string_len == 0 {
            return Err(Error::InvalidInput("--max-string-len must be greater than zero".to_string()));
        }

        let timezone = crate::datetime::parse_timezone(&args.timezone)?;

        let mut parser = if args.strict_text {
            ParserConfig::strict()
        } else {
            ParserConfig::default()
        };
        parser.max_string_len = args.max_string_len;

        let log_level = match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        Ok(Config {
            files: args.files,
            format: args.format,
            output: args.output,
            timezone,
            parser,
            log_level,
        })
    }
}
