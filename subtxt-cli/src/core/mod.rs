pub mod config;
pub mod error;
pub mod output;

pub use config::{RunConfig, RunProfile, Verbosity};
pub use error::SubtxtError;
pub use output::{OutputFormat, OutputWriter};
