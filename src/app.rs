//! Main application logic and orchestration.

use crate::{
    cli::Config,
    error::{Error, Result},
    lnk_parser::LnkParser,
    output::{create_writer, LinkReport, OutputWriter},
};
use rayon::prelude::*;
use std::path::Path;

/// Main application runner
pub struct App {
    config: Config,
    parser: LnkParser,
}

impl App {
    /// Create a new application instance with the given configuration
    pub fn new(config: Config) -> Self {
        let parser = LnkParser::with_config(config.parser.clone());
        Self { config, parser }
    }

    /// Decode every input and write the report.
    ///
    /// Returns the number of inputs that failed to read or decode.
    pub fn run(&self) -> Result<usize> {
        let reports = self.decode_all();
        let failures = reports.iter().filter(|report| report.result.is_err()).count();

        let writer = create_writer(self.config.output.clone())?;
        OutputWriter::write_reports(&reports, self.config.format, writer, self.config.timezone)?;
        Ok(failures)
    }

    /// Decode inputs in parallel; reports keep input order
    pub fn decode_all(&self) -> Vec<LinkReport> {
        self.config
            .files
            .par_iter()
            .map(|path| {
                let result = read_input(Path::new(path)).and_then(|data| self.parser.parse(&data));
                match &result {
                    Ok(link) => log::debug!("{}: {} extra data block(s)", path, link.extra_data.len()),
                    Err(err) => log::warn!("{}: {}", path, err),
                }
                LinkReport {
                    path: path.clone(),
                    result,
                }
            })
            .collect()
    }
}

/// Read an input file into memory
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
        _ => Error::Io(err),
    })
}
