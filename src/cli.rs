//! Command-line interface module for extsort.
//!
//! This module handles all CLI-related functionality including:
//! - Flag parsing
//! - Validation of the target and output directories
//! - Merging configuration-file defaults with flags
//! - Running the relocation and deciding the outcome

use crate::config::{ConfigError, FileConfig, RelocateConfig};
use crate::output::OutputFormatter;
use crate::relocator::{RelocateError, Relocator};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

/// Sort the files of a directory into subdirectories named after their extensions.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "extsort", version)]
pub struct CliArgs {
    // -t and -o are optional to clap; RelocateConfig::validate reports them
    // missing so the exit status stays 1.
    /// [Required] Target directory to clean up. Directory must exist.
    #[arg(short = 't', value_name = "DIR")]
    pub target: Option<PathBuf>,

    /// [Required] Output directory to place files. Directory is created if it does not exist.
    #[arg(short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Recurse into subdirectories, mirroring them in the output directory.
    #[arg(short = 'r')]
    pub recursive: bool,

    /// Delete files after a successful copy.
    #[arg(short = 'd')]
    pub delete_on_success: bool,

    /// Suppress errors: keep going, print nothing and exit 0.
    #[arg(short = 's')]
    pub suppress_errors: bool,

    /// Configuration file with defaults and exclusion rules.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print every relocated file.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Resolves the run configuration from these flags and a configuration file.
    ///
    /// # Errors
    ///
    /// Returns the first validation or filter compilation failure.
    pub fn resolve(&self, file_config: &FileConfig) -> Result<RelocateConfig, ConfigError> {
        let filters = file_config.compile_filters()?;
        let mut config = RelocateConfig::validate(self.target.as_deref(), self.output.as_deref())?;

        let defaults = file_config.defaults;
        config.recursive = self.recursive || defaults.recursive;
        config.delete_on_success = self.delete_on_success || defaults.delete_on_success;
        config.suppress_errors = self.suppress_errors || defaults.suppress_errors;
        config.filters = filters;

        Ok(config)
    }
}

/// Why a run ended with a non-zero exit status.
#[derive(Debug)]
pub enum CliError {
    /// Flags or configuration were invalid; nothing was relocated.
    Config(ConfigError),
    /// Relocation stopped at an error.
    Relocation(Vec<RelocateError>),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Prints this error the way the tool reports it.
    ///
    /// Configuration errors are followed by the usage text.
    pub fn report(&self) {
        match self {
            CliError::Config(e) => {
                OutputFormatter::error_list(&[e]);
                OutputFormatter::usage(&usage());
            }
            CliError::Relocation(errors) => OutputFormatter::error_list(errors),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Relocation(errors) => {
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

/// Full help text for the tool.
pub fn usage() -> String {
    CliArgs::command().render_help().to_string()
}

/// Runs the tool for already-parsed flags.
///
/// Loads the configuration file, validates the flags, relocates the files
/// and prints relocations when `verbose` is set. Errors are returned rather
/// than printed; suppressed relocation errors yield `Ok(())`.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use extsort::cli::{run_cli, CliArgs};
///
/// let args = CliArgs::parse_from(["extsort", "-t", "Downloads", "-o", "Sorted", "-r"]);
/// if let Err(e) = run_cli(&args) {
///     e.report();
///     std::process::exit(e.exit_code());
/// }
/// ```
pub fn run_cli(args: &CliArgs) -> Result<(), CliError> {
    let file_config = FileConfig::load(args.config.as_deref())?;
    let config = args.resolve(&file_config)?;

    if args.verbose {
        OutputFormatter::info(&format!(
            "Sorting {} into {}",
            config.target_dir.display(),
            config.output_dir.display()
        ));
    }

    let report = Relocator::new(&config).run_with_report();

    if args.verbose {
        for relocation in &report.relocated {
            OutputFormatter::relocation(relocation);
        }
    }

    if report.errors.is_empty() || config.suppress_errors {
        Ok(())
    } else {
        Err(CliError::Relocation(report.errors))
    }
}
