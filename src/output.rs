//! Report formatting for decoded shell links.

use crate::datetime::{convert_to_timezone, format_timestamp_human};
use crate::error::{Error, Result};
use crate::extra_data::ExtraData;
use crate::link_info::VolumeLabel;
use crate::lnk_parser::ShellLink;
use crate::text::LnkString;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::io::{BufWriter, Write};

/// Supported output formats
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary of each link
    Human,
    /// JSON array with the complete decoded structure
    Json,
}

/// Outcome of decoding one input file
#[derive(Debug)]
pub struct LinkReport {
    pub path: String,
    pub result: Result<ShellLink>,
}

/// JSON form of a report
#[derive(Serialize)]
struct JsonReport<'a> {
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    link_flags: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    file_attributes: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<&'a ShellLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a LinkReport> for JsonReport<'a> {
    fn from(report: &'a LinkReport) -> Self {
        match &report.result {
            Ok(link) => JsonReport {
                path: &report.path,
                target_path: link.target_path(),
                link_flags: link.header.flags().names(),
                file_attributes: link.header.attributes().names(),
                link: Some(link),
                error: None,
            },
            Err(err) => JsonReport {
                path: &report.path,
                target_path: None,
                link_flags: Vec::new(),
                file_attributes: Vec::new(),
                link: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Handles output formatting and writing
pub struct OutputWriter;

impl OutputWriter {
    /// Write reports in the specified format, timestamps in `timezone`
    pub fn write_reports(reports: &[LinkReport], format: OutputFormat, writer: Box<dyn Write>, timezone: Tz) -> Result<()> {
        match format {
            OutputFormat::Human => Self::write_human(reports, writer, timezone),
            OutputFormat::Json => Self::write_json(reports, writer),
        }
    }

    fn write_json(reports: &[LinkReport], mut writer: Box<dyn Write>) -> Result<()> {
        // Timestamps stay raw FILETIMEs in UTC for programmatic use
        let json: Vec<JsonReport<'_>> = reports.iter().map(JsonReport::from).collect();
        serde_json::to_writer_pretty(&mut writer, &json)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_human(reports: &[LinkReport], mut writer: Box<dyn Write>, timezone: Tz) -> Result<()> {
        for report in reports {
            writeln!(writer, "{}", report.path)?;
            match &report.result {
                Ok(link) => Self::write_link(&mut writer, link, timezone)?,
                Err(err) => writeln!(writer, "  {:<17} {}", "Error:", err)?,
            }
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_link(writer: &mut Box<dyn Write>, link: &ShellLink, timezone: Tz) -> Result<()> {
        let header = &link.header;

        if let Some(target) = link.target_path() {
            writeln!(writer, "  {:<17} {}", "Target:", target)?;
        }
        Self::write_text(writer, "Arguments:", link.arguments())?;
        Self::write_text(writer, "Working dir:", link.working_directory())?;
        Self::write_text(writer, "Description:", link.name())?;
        if let Some(icon) = link.icon_location() {
            writeln!(writer, "  {:<17} {},{}", "Icon:", icon, header.icon_index)?;
        }

        Self::write_timestamp(writer, "Created:", header.creation_time(), timezone)?;
        Self::write_timestamp(writer, "Modified:", header.write_time(), timezone)?;
        Self::write_timestamp(writer, "Accessed:", header.access_time(), timezone)?;
        writeln!(writer, "  {:<17} {} bytes", "Size:", header.file_size)?;

        let attributes = header.attributes().names();
        if !attributes.is_empty() {
            writeln!(writer, "  {:<17} {}", "Attributes:", attributes.join(" | "))?;
        }
        writeln!(writer, "  {:<17} {}", "Flags:", header.flags().names().join(" | "))?;
        writeln!(writer, "  {:<17} {:?}", "Show:", header.show_command)?;
        if let Some(hotkey) = header.hotkey.describe() {
            writeln!(writer, "  {:<17} {}", "Hotkey:", hotkey)?;
        }

        if let Some(id_list) = &link.id_list {
            writeln!(writer, "  {:<17} {} item(s)", "ID list:", id_list.items.len())?;
        }

        if let Some(info) = &link.link_info {
            if let Some(volume) = &info.volume_id {
                let label = match &volume.label {
                    VolumeLabel::Ansi { text } | VolumeLabel::Unicode { text, .. } => {
                        text.as_ref().map(LnkString::to_lossy).unwrap_or_default()
                    }
                };
                writeln!(
                    writer,
                    "  {:<17} {:?}, serial {:08X}, label \"{}\"",
                    "Volume:", volume.drive_type, volume.drive_serial_number, label
                )?;
            }
            if let Some(network) = &info.common_network_relative_link {
                let share = network.share_name().map(LnkString::to_lossy).unwrap_or_default();
                write!(writer, "  {:<17} {}", "Network share:", share)?;
                if let Some(device) = network.device_name_unicode.as_ref().or(network.device_name.as_ref()) {
                    write!(writer, " ({})", device)?;
                }
                if let Some(provider) = &network.network_provider {
                    write!(writer, " [{}]", provider.name())?;
                }
                writeln!(writer)?;
            }
        }

        if !link.extra_data.is_empty() {
            writeln!(writer, "  {:<17} {} block(s)", "Extra data:", link.extra_data.len())?;
            for block in &link.extra_data {
                match Self::describe_block(&block.data) {
                    Some(detail) => writeln!(writer, "    {}: {}", block.data.name(), detail)?,
                    None => writeln!(writer, "    {} (0x{:08X}, {} bytes)", block.data.name(), block.signature, block.size)?,
                }
            }
        }
        Ok(())
    }

    /// One-line summary of the interesting fields of a block
    fn describe_block(data: &ExtraData) -> Option<String> {
        let detail = match data {
            ExtraData::EnvironmentVariable(env) | ExtraData::IconEnvironment(env) => env.target().to_string(),
            ExtraData::Darwin(darwin) => darwin.darwin_data_unicode.to_string(),
            ExtraData::Tracker(tracker) => match tracker.mac_address() {
                Some(mac) => format!("machine {}, MAC {}", tracker.machine_id, mac),
                None => format!("machine {}", tracker.machine_id),
            },
            ExtraData::SpecialFolder(folder) => folder
                .folder_name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("CSIDL 0x{:02X}", folder.special_folder_id)),
            ExtraData::KnownFolder(folder) => folder
                .folder_name()
                .map(str::to_string)
                .unwrap_or_else(|| folder.known_folder_id.hyphenated().to_string().to_uppercase()),
            ExtraData::ConsoleFe(console) => format!("code page {}", console.code_page),
            ExtraData::Console(console) => format!("{} {}px", console.face_name, console.font_height()),
            ExtraData::Shim(shim) => shim.layer_name.to_string(),
            ExtraData::PropertyStore(store) => {
                let values: usize = store.storages.iter().map(|storage| storage.values.len()).sum();
                format!("{} storage(s), {} value(s)", store.storages.len(), values)
            }
            ExtraData::VistaAndAboveIdList(list) => format!("{} item(s)", list.items.len()),
            ExtraData::Unknown(_) => return None,
        };
        Some(detail)
    }

    fn write_text(writer: &mut Box<dyn Write>, label: &str, value: Option<&LnkString>) -> Result<()> {
        if let Some(value) = value {
            writeln!(writer, "  {:<17} {}", label, value)?;
        }
        Ok(())
    }

    fn write_timestamp(writer: &mut Box<dyn Write>, label: &str, timestamp: Option<DateTime<Utc>>, timezone: Tz) -> Result<()> {
        if let Some(time) = timestamp {
            let converted = convert_to_timezone(time, timezone);
            writeln!(writer, "  {:<17} {}", label, format_timestamp_human(&converted))?;
        }
        Ok(())
    }
}

/// Create output writer based on file path or stdout
pub fn create_writer(output_file: Option<String>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match output_file {
        Some(path) if path != "-" => {
            let file = std::fs::File::create(&path).map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => Error::NotFound(path.clone()),
                _ => Error::Io(err),
            })?;
            Box::new(BufWriter::new(file))
        }
        _ => Box::new(std::io::stdout()),
    };

    Ok(writer)
}
