//! JSON output adapter.

use anyhow::Result;
use std::io::{self, Write};
use std::sync::Mutex;
use tryon_qc_core::{GateReport, ReportSink};

/// JSON Lines output adapter.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Creates a new JSON output writing to the given writer.
    #[allow(dead_code)] // API for programmatic use
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Writes a batch of reports as a JSON array.
    #[allow(clippy::significant_drop_tightening)]
    pub fn write_array(&self, reports: &[GateReport], pretty: bool) -> Result<()> {
        let json = if pretty {
            serde_json::to_string_pretty(reports)?
        } else {
            serde_json::to_string(reports)?
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|error| anyhow::anyhow!("Lock poisoned: {error}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }
}

impl ReportSink for JsonOutput {
    #[allow(clippy::significant_drop_tightening)]
    fn write(&self, report: &GateReport) -> Result<()> {
        let json = serde_json::to_string(report)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|error| anyhow::anyhow!("Lock poisoned: {error}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|error| anyhow::anyhow!("Lock poisoned: {error}"))?;
        writer.flush()?;
        Ok(())
    }
}
