use glob::Pattern;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::error::SubtxtError;

/// Which files of the ingest directory get processed
#[derive(Debug, Clone)]
pub struct IngestSelection {
    dir: PathBuf,
    filter: Option<Pattern>,
}

impl IngestSelection {
    /// Select files directly inside `dir`, optionally only those ending in `.extension`
    pub fn new(dir: impl Into<PathBuf>, extension: Option<&str>) -> Result<Self, SubtxtError> {
        let filter = extension
            .map(|ext| {
                Pattern::new(&format!("*.{}", ext)).map_err(|e| {
                    SubtxtError::Config(format!("Invalid extension filter '{}': {}", ext, e))
                })
            })
            .transpose()?;

        Ok(Self {
            dir: dir.into(),
            filter,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List matching files, sorted by file name
    pub fn files(&self) -> Result<Vec<PathBuf>, SubtxtError> {
        if !self.dir.is_dir() {
            return Err(SubtxtError::FileNotFound(self.dir.clone()));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.dir.as_path()).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop"));
                SubtxtError::from_io(path, source)
            })?;

            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Check a path against the hidden-file rule and the extension filter
    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };

        if is_hidden(&name) {
            return false;
        }

        match &self.filter {
            Some(pattern) => pattern.matches(&name),
            None => true,
        }
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
