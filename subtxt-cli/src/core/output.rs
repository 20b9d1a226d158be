use anyhow::Result;
use tracing::warn;

use crate::batch::RunReport;
use crate::core::config::Verbosity;
use crate::report::{render_json, render_report};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub struct OutputWriter {
    format: OutputFormat,
    verbosity: Verbosity,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, verbosity: Verbosity) -> Self {
        Self { format, verbosity }
    }

    /// Whether `write_report` prints anything for this format and verbosity
    pub fn emits_report(&self) -> bool {
        self.format == OutputFormat::Json || self.verbosity.wants_report()
    }

    /// Print the report to stdout.
    ///
    /// An empty run is an error when a report was asked for, and only a
    /// warning otherwise.
    pub fn write_report(&self, report: &RunReport) -> Result<()> {
        if !self.emits_report() {
            if report.is_empty() {
                warn!(
                    "No files matched the ingest selection {}",
                    report.ingest_dir.display()
                );
            }
            return Ok(());
        }

        match self.format {
            OutputFormat::Json => println!("{}", render_json(report)?),
            OutputFormat::Text => println!("{}", render_report(report)?),
        }
        Ok(())
    }
}
