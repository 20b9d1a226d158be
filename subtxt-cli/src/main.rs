use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use subtxt::commands;
use subtxt::core::config::Overrides;
use subtxt::core::{OutputFormat, RunConfig, RunProfile, Verbosity};

const LONG_ABOUT: &str = "\
Subtxt matches and replaces patterns in every file of a directory (optionally
one extension at a time), applying multiple regex patterns in order, each with
its own replacement.

Pattern files are formatted in 3-row sets: the find pattern, the replace
pattern, and a blank separator row. Processing stops at a line reading EOF.

    find pattern
    replace pattern

    (pattern|string|content)-(to)-(find)
    $1 $2 replace

    EOF

Replacements may use \\n and \\r for line breaks and $1, ${name} or \\1 for
capture groups.";

#[derive(Parser)]
#[command(name = "subtxt")]
#[command(author, version, about = "Batch find-and-replace across a directory of text files")]
#[command(long_about = LONG_ABOUT)]
struct Cli {
    /// Directory to ingest files from (supersedes --ingestdir)
    ingest: Option<PathBuf>,

    /// Ingest files from this directory (defaults to current directory)
    #[arg(short = 'i', long = "ingestdir", value_name = "DIR")]
    ingestdir: Option<PathBuf>,

    /// Pattern file; repeat to apply several files in order
    #[arg(short = 'p', long = "patterns", value_name = "PATH")]
    patterns: Vec<PathBuf>,

    /// Only ingest files with this extension (the dot is implied)
    #[arg(short = 'f', long = "filext", value_name = "EXT")]
    filext: Option<String>,

    /// Directory for the converted files (defaults to _subtxt/output)
    #[arg(short = 'x', long = "expath", value_name = "DIR")]
    expath: Option<PathBuf>,

    /// Extension given to every exported file (defaults to the original)
    #[arg(long = "expext", value_name = "EXT")]
    expext: Option<String>,

    /// Print INFO level logs and the run report
    #[arg(long)]
    verbose: bool,

    /// Print DEBUG level logs, including annotated matches
    #[arg(long)]
    debug: bool,

    /// Report format (text, json)
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// TOML run profile supplying defaults for the options above
    #[arg(short = 'c', long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    fn verbosity(&self) -> Option<Verbosity> {
        if self.debug {
            Some(Verbosity::Debug)
        } else if self.verbose {
            Some(Verbosity::Info)
        } else {
            None
        }
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            patterns: self.patterns.clone(),
            ingest_dir: self.ingest.clone().or_else(|| self.ingestdir.clone()),
            filext: self.filext.clone(),
            expath: self.expath.clone(),
            expext: self.expext.clone(),
            verbosity: self.verbosity(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let profile = match &cli.config {
        Some(path) => RunProfile::load(path)?,
        None => RunProfile::default(),
    };
    let config = RunConfig::resolve(cli.overrides(), profile);

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(config.verbosity.log_filter())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    commands::run::run(&config, cli.format)?;

    Ok(())
}
