mod runner;
mod select;

pub use runner::{output_file_name, BatchRunner};
pub use select::IngestSelection;

use serde::Serialize;
use std::path::PathBuf;

use crate::substitute::MatchRecord;

/// Result of transforming a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    /// File that was read
    pub source_path: PathBuf,

    /// File that was written
    pub output_path: PathBuf,

    /// One record per rule, in rule order
    pub match_records: Vec<MatchRecord>,

    /// True if any rule matched
    pub changed: bool,
}

impl FileOutcome {
    pub fn total_matches(&self) -> usize {
        self.match_records.iter().map(|r| r.match_count).sum()
    }
}

/// Accumulated result of a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Directory the files were selected from
    pub ingest_dir: PathBuf,

    /// Files selected for processing
    pub files_considered: usize,

    /// Output files written
    pub files_written: usize,

    /// Source files where at least one rule matched, in processing order
    pub files_changed: Vec<PathBuf>,

    /// Per-file outcomes, in processing order
    pub outcomes: Vec<FileOutcome>,
}

impl RunReport {
    pub fn new(ingest_dir: impl Into<PathBuf>) -> Self {
        Self {
            ingest_dir: ingest_dir.into(),
            ..Self::default()
        }
    }

    /// Fold a finished file into the report
    pub fn record(&mut self, outcome: FileOutcome) {
        self.files_written += 1;
        if outcome.changed && !self.files_changed.contains(&outcome.source_path) {
            self.files_changed.push(outcome.source_path.clone());
        }
        self.outcomes.push(outcome);
    }

    pub fn total_matches(&self) -> usize {
        self.outcomes.iter().map(FileOutcome::total_matches).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files_considered == 0
    }
}
