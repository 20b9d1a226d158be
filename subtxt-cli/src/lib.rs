//! Batch find-and-replace over a directory of text files.
//!
//! Rules come from one or more pattern files, are applied in order to every
//! selected file, and the transformed copies land in an output directory.

pub mod batch;
pub mod commands;
pub mod core;
pub mod patterns;
pub mod report;
pub mod substitute;

pub use batch::{BatchRunner, FileOutcome, RunReport};
pub use crate::core::{RunConfig, SubtxtError, Verbosity};
pub use patterns::{load_patterns, parse_patterns, PatternSet, Rule};
pub use substitute::{MatchRecord, Substituter};
