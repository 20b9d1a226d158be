use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::batch::{BatchRunner, RunReport};
use crate::core::{OutputFormat, OutputWriter, RunConfig};
use crate::patterns::load_patterns;

/// Load the patterns, transform the ingest directory and print the report
pub fn run(config: &RunConfig, format: OutputFormat) -> Result<RunReport> {
    config.validate()?;

    for source in &config.pattern_sources {
        info!("Reading patterns from {}", source.display());
    }
    let patterns = load_patterns(&config.pattern_sources)?;
    if patterns.is_empty() {
        warn!("No rules loaded; files will be copied unchanged");
    } else {
        info!("Loaded {} rule(s)", patterns.len());
    }

    let runner = BatchRunner::new(config)?;
    let report = runner.run(&patterns).with_context(|| {
        format!(
            "Batch run over {} aborted",
            config.ingest_dir.display()
        )
    })?;

    OutputWriter::new(format, config.verbosity).write_report(&report)?;

    Ok(report)
}
