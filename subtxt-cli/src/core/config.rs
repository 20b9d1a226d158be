use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::SubtxtError;

/// Default ingest directory (current directory)
pub const DEFAULT_INGEST_DIR: &str = ".";

/// Default location for transformed copies
pub const DEFAULT_OUTPUT_DIR: &str = "_subtxt/output";

/// How much detail a run computes and prints
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Warnings and errors only
    #[default]
    Quiet,
    /// Run summary and pattern table
    Info,
    /// Per-file progress and annotated matches
    Debug,
}

impl Verbosity {
    /// Whether annotated match detail should be computed
    pub fn wants_detail(self) -> bool {
        self >= Verbosity::Debug
    }

    /// Whether the rendered report should be printed
    pub fn wants_report(self) -> bool {
        self >= Verbosity::Info
    }

    /// Log filter directive for this level
    pub fn log_filter(self) -> &'static str {
        match self {
            Verbosity::Quiet => "subtxt=warn",
            Verbosity::Info => "subtxt=info",
            Verbosity::Debug => "subtxt=debug",
        }
    }
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    /// Pattern files, applied in the order listed
    pub pattern_sources: Vec<PathBuf>,

    /// Directory whose files are transformed (non-recursive)
    pub ingest_dir: PathBuf,

    /// Only files with this extension are visited
    pub extension_filter: Option<String>,

    /// Where transformed copies are written
    pub output_dir: PathBuf,

    /// Extension given to every output file
    pub output_extension: Option<String>,

    pub verbosity: Verbosity,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            pattern_sources: Vec::new(),
            ingest_dir: PathBuf::from(DEFAULT_INGEST_DIR),
            extension_filter: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_extension: None,
            verbosity: Verbosity::Quiet,
        }
    }
}

impl RunConfig {
    /// Check the configuration before any file is touched
    pub fn validate(&self) -> Result<(), SubtxtError> {
        if self.pattern_sources.is_empty() {
            return Err(SubtxtError::Config(
                "You must provide at least one patterns file (-p PATH). For help, use subtxt --help"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Strip a leading dot and treat empty or `*` as "no extension"
pub fn normalize_extension(ext: Option<&str>) -> Option<String> {
    let ext = ext?.trim().trim_start_matches('.');
    if ext.is_empty() || ext == "*" {
        None
    } else {
        Some(ext.to_string())
    }
}

/// Optional TOML file supplying defaults for a run
///
/// ```toml
/// patterns = ["rules/html.rgx"]
/// ingest_dir = "pages"
/// filext = "htm"
/// expath = "out"
/// expext = "html"
/// verbosity = "info"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunProfile {
    #[serde(default)]
    pub patterns: Vec<PathBuf>,

    #[serde(default)]
    pub ingest_dir: Option<PathBuf>,

    #[serde(default)]
    pub filext: Option<String>,

    #[serde(default)]
    pub expath: Option<PathBuf>,

    #[serde(default)]
    pub expext: Option<String>,

    #[serde(default)]
    pub verbosity: Option<Verbosity>,
}

impl RunProfile {
    /// Load a profile from disk
    pub fn load(path: &Path) -> Result<Self, SubtxtError> {
        let contents = fs::read_to_string(path).map_err(|e| SubtxtError::from_io(path, e))?;
        Self::parse(&contents, path)
    }

    /// Parse profile text; `origin` is only used for error messages
    pub fn parse(contents: &str, origin: &Path) -> Result<Self, SubtxtError> {
        toml::from_str(contents).map_err(|source| SubtxtError::ProfileParse {
            path: origin.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line; `None`/empty means "not given"
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub patterns: Vec<PathBuf>,
    pub ingest_dir: Option<PathBuf>,
    pub filext: Option<String>,
    pub expath: Option<PathBuf>,
    pub expext: Option<String>,
    pub verbosity: Option<Verbosity>,
}

impl RunConfig {
    /// Merge command-line values over a profile over built-in defaults
    pub fn resolve(cli: Overrides, profile: RunProfile) -> Self {
        let defaults = RunConfig::default();

        let pattern_sources = if cli.patterns.is_empty() {
            profile.patterns
        } else {
            cli.patterns
        };

        RunConfig {
            pattern_sources,
            ingest_dir: cli
                .ingest_dir
                .or(profile.ingest_dir)
                .unwrap_or(defaults.ingest_dir),
            extension_filter: normalize_extension(cli.filext.or(profile.filext).as_deref()),
            output_dir: cli.expath.or(profile.expath).unwrap_or(defaults.output_dir),
            output_extension: normalize_extension(cli.expext.or(profile.expext).as_deref()),
            verbosity: cli
                .verbosity
                .or(profile.verbosity)
                .unwrap_or(defaults.verbosity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_requires_patterns() {
        let config = RunConfig::default();
        assert!(matches!(config.validate(), Err(SubtxtError::Config(_))));

        let config = RunConfig {
            pattern_sources: vec![PathBuf::from("p.rgx")],
            ..RunConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(Some("txt")), Some("txt".to_string()));
        assert_eq!(normalize_extension(Some(".txt")), Some("txt".to_string()));
        assert_eq!(normalize_extension(Some("*")), None);
        assert_eq!(normalize_extension(Some("")), None);
        assert_eq!(normalize_extension(None), None);
    }

    #[test]
    fn test_verbosity_levels() {
        assert!(!Verbosity::Quiet.wants_report());
        assert!(Verbosity::Info.wants_report());
        assert!(!Verbosity::Info.wants_detail());
        assert!(Verbosity::Debug.wants_detail());
        assert_eq!(Verbosity::Debug.log_filter(), "subtxt=debug");
    }

    #[test]
    fn test_resolve_precedence() {
        let profile = RunProfile {
            patterns: vec![PathBuf::from("profile.rgx")],
            ingest_dir: Some(PathBuf::from("pages")),
            filext: Some("htm".to_string()),
            expath: Some(PathBuf::from("profile-out")),
            expext: None,
            verbosity: Some(Verbosity::Info),
        };
        let cli = Overrides {
            expath: Some(PathBuf::from("cli-out")),
            expext: Some(".html".to_string()),
            ..Overrides::default()
        };

        let config = RunConfig::resolve(cli, profile);
        assert_eq!(config.pattern_sources, vec![PathBuf::from("profile.rgx")]);
        assert_eq!(config.ingest_dir, PathBuf::from("pages"));
        assert_eq!(config.extension_filter.as_deref(), Some("htm"));
        assert_eq!(config.output_dir, PathBuf::from("cli-out"));
        assert_eq!(config.output_extension.as_deref(), Some("html"));
        assert_eq!(config.verbosity, Verbosity::Info);
    }

    #[test]
    fn test_resolve_defaults() {
        let config = RunConfig::resolve(Overrides::default(), RunProfile::default());
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn test_load_profile() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "patterns = [\"a.rgx\", \"b.rgx\"]").unwrap();
        writeln!(file, "filext = \"md\"").unwrap();
        writeln!(file, "verbosity = \"debug\"").unwrap();

        let profile = RunProfile::load(file.path()).unwrap();
        assert_eq!(profile.patterns.len(), 2);
        assert_eq!(profile.filext.as_deref(), Some("md"));
        assert_eq!(profile.verbosity, Some(Verbosity::Debug));
    }

    #[test]
    fn test_load_profile_errors() {
        let missing = RunProfile::load(Path::new("/nonexistent/subtxt.toml"));
        assert!(matches!(missing, Err(SubtxtError::FileNotFound(_))));

        let bad = RunProfile::parse("colour = 3", Path::new("subtxt.toml"));
        assert!(matches!(bad, Err(SubtxtError::ProfileParse { .. })));
    }
}
