use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubtxtError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid find pattern in rule #{index} ({find:?}): {source}")]
    PatternCompile {
        index: usize,
        find: String,
        #[source]
        source: regex::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No files matched the ingest selection {}", ingest.display())]
    EmptyReport { ingest: PathBuf },

    #[error("Invalid run profile {}: {source}", path.display())]
    ProfileParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SubtxtError {
    /// Map an I/O failure on `path`, keeping "not found" distinct from other failures
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            SubtxtError::FileNotFound(path)
        } else {
            SubtxtError::FileIo { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_from_io_not_found() {
        let err = SubtxtError::from_io("missing.rgx", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, SubtxtError::FileNotFound(ref p) if p == &PathBuf::from("missing.rgx")));
        assert_eq!(err.to_string(), "File not found: missing.rgx");
    }

    #[test]
    fn test_from_io_other() {
        let err = SubtxtError::from_io(
            "out/a.txt",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, SubtxtError::FileIo { .. }));
        assert!(err.to_string().contains("out/a.txt"));
    }
}
