//! extsort - sort a directory's files into extension-named subdirectories
//!
//! This library copies every file of a target directory into
//! `<output>/<extension>/<name>`, optionally mirroring subdirectories,
//! deleting the originals and carrying on past errors. Runs can be tuned
//! with a TOML configuration file providing flag defaults and exclusion
//! rules.

pub mod cli;
pub mod config;
pub mod extension;
pub mod output;
pub mod relocator;

pub use config::{CompiledFilters, ConfigError, FileConfig, RelocateConfig};
pub use extension::{NO_EXTENSION, bucket_for};
pub use relocator::{Relocation, RelocationReport, RelocateError, Relocator};

pub use cli::{CliArgs, CliError, run_cli};
