use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{FileOutcome, IngestSelection, RunReport};
use crate::core::config::RunConfig;
use crate::core::error::SubtxtError;
use crate::patterns::PatternSet;
use crate::substitute::Substituter;

/// Runs an ordered pattern set over every selected file
pub struct BatchRunner {
    /// Files to transform
    selection: IngestSelection,

    /// Where transformed copies go
    output_dir: PathBuf,

    /// Extension override for every output file
    output_extension: Option<String>,

    /// Compute annotated match detail
    detail: bool,
}

impl BatchRunner {
    /// Create a runner from a resolved configuration
    pub fn new(config: &RunConfig) -> Result<Self, SubtxtError> {
        Ok(Self {
            selection: IngestSelection::new(
                &config.ingest_dir,
                config.extension_filter.as_deref(),
            )?,
            output_dir: config.output_dir.clone(),
            output_extension: config.output_extension.clone(),
            detail: config.verbosity.wants_detail(),
        })
    }

    /// Process every selected file in listing order.
    ///
    /// The first failure aborts the run. Files written before the failure
    /// stay on disk.
    pub fn run(&self, patterns: &PatternSet) -> Result<RunReport, SubtxtError> {
        info!("Using patterns:\n{}\n", patterns.describe());
        let substituter = Substituter::new(patterns)?;

        let files = self.selection.files()?;
        let mut report = RunReport::new(self.selection.dir());
        report.files_considered = files.len();

        for file_path in files {
            let outcome = self.process_file(&substituter, &file_path)?;
            report.record(outcome);
        }

        info!(
            "Processed {} file(s), {} changed, {} replacement(s)",
            report.files_written,
            report.files_changed.len(),
            report.total_matches()
        );

        Ok(report)
    }

    /// Transform one file and write its copy
    fn process_file(
        &self,
        substituter: &Substituter,
        file_path: &Path,
    ) -> Result<FileOutcome, SubtxtError> {
        debug!("Processing file: {}", file_path.display());

        let content =
            fs::read_to_string(file_path).map_err(|e| SubtxtError::from_io(file_path, e))?;

        let substitution = substituter.apply(&content, self.detail);

        for record in &substitution.records {
            debug!(
                "Rule #{} /{}/: {} match(es)",
                record.rule_index + 1,
                record.find,
                record.match_count
            );
            if let Some(annotated) = &record.annotated_text {
                debug!("{}", annotated);
            }
        }

        let file_name = output_file_name(file_path, self.output_extension.as_deref())
            .ok_or_else(|| SubtxtError::FileIo {
                path: file_path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            })?;
        let output_path = self.output_dir.join(file_name);

        fs::create_dir_all(&self.output_dir)
            .map_err(|e| SubtxtError::from_io(&self.output_dir, e))?;
        fs::write(&output_path, &substitution.text)
            .map_err(|e| SubtxtError::from_io(&output_path, e))?;
        debug!("File saved ({})", output_path.display());

        Ok(FileOutcome {
            changed: substitution.changed(),
            source_path: file_path.to_path_buf(),
            output_path,
            match_records: substitution.records,
        })
    }
}

/// Output name for `source`: its base name, with the extension swapped when
/// `extension` is set
pub fn output_file_name(source: &Path, extension: Option<&str>) -> Option<OsString> {
    match extension {
        None => source.file_name().map(|name| name.to_os_string()),
        Some(ext) => source.file_stem().map(|stem| {
            let mut name = stem.to_os_string();
            name.push(".");
            name.push(ext);
            name
        }),
    }
}
