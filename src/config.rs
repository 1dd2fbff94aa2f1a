//! Run configuration, configuration files and exclusion rules.
//!
//! A run is described by an immutable [`RelocateConfig`]. It is resolved from
//! command-line flags, optionally combined with defaults and exclusion rules
//! read from a TOML configuration file:
//!
//! ```toml
//! [defaults]
//! recursive = false
//! delete_on_success = false
//! suppress_errors = false
//!
//! [exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["node_modules/**"]
//! extensions = ["tmp", "part"]
//! regex = ["^~\\$"]
//! ```

use crate::extension::bucket_for;
use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".extsortrc.toml";

/// Errors raised before any file is relocated.
#[derive(Debug)]
pub enum ConfigError {
    /// A required flag was not given. Holds the flag, e.g. `-t`.
    MissingFlag(&'static str),
    /// The target directory does not exist.
    TargetNotFound(PathBuf),
    /// The target path exists but is not a directory.
    TargetNotDirectory(PathBuf),
    /// The output directory could not be created.
    OutputCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingFlag(flag) => write!(f, "{} flag is required.", flag),
            ConfigError::TargetNotFound(path) => write!(
                f,
                "-t flag is invalid. Directory does not exist: {}",
                path.display()
            ),
            ConfigError::TargetNotDirectory(path) => write!(
                f,
                "-t flag is invalid. Not a directory: {}",
                path.display()
            ),
            ConfigError::OutputCreationFailed { path, source } => write!(
                f,
                "Failed to create output directory {}: {}",
                path.display(),
                source
            ),
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::OutputCreationFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Resolved, validated settings for a single relocation run.
#[derive(Debug, Clone)]
pub struct RelocateConfig {
    /// Directory whose files are relocated.
    pub target_dir: PathBuf,
    /// Root of the bucketed output tree.
    pub output_dir: PathBuf,
    /// Descend into subdirectories of `target_dir`.
    pub recursive: bool,
    /// Remove each source file once its copy has been written.
    pub delete_on_success: bool,
    /// Keep going after an error instead of stopping at the first one.
    pub suppress_errors: bool,
    /// Files matching these rules are skipped.
    pub filters: CompiledFilters,
}

impl RelocateConfig {
    /// Creates a configuration with every option off and no exclusions.
    pub fn new(target_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            output_dir: output_dir.into(),
            recursive: false,
            delete_on_success: false,
            suppress_errors: false,
            filters: CompiledFilters::default(),
        }
    }

    /// Validates the target and output paths and prepares the output directory.
    ///
    /// Checks run in this order and stop at the first failure:
    /// 1. target given
    /// 2. target exists
    /// 3. target is a directory
    /// 4. output given
    /// 5. output directory created (including missing parents)
    ///
    /// Nothing is written to disk unless checks 1-4 pass.
    ///
    /// # Errors
    ///
    /// Returns the first failed check as a [`ConfigError`].
    pub fn validate(
        target_dir: Option<&Path>,
        output_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let target_dir = target_dir.ok_or(ConfigError::MissingFlag("-t"))?;

        let metadata = fs::metadata(target_dir)
            .map_err(|_| ConfigError::TargetNotFound(target_dir.to_path_buf()))?;
        if !metadata.is_dir() {
            return Err(ConfigError::TargetNotDirectory(target_dir.to_path_buf()));
        }

        let output_dir = output_dir.ok_or(ConfigError::MissingFlag("-o"))?;

        fs::create_dir_all(output_dir).map_err(|e| ConfigError::OutputCreationFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

        Ok(Self::new(target_dir, output_dir))
    }
}

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// Defaults for the boolean command-line flags.
    #[serde(default)]
    pub defaults: Defaults,

    /// Rules for files that are left where they are.
    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Defaults for the boolean flags. A flag given on the command line always
/// turns its option on.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub recursive: bool,
    #[serde(default)]
    pub delete_on_success: bool,
    #[serde(default)]
    pub suppress_errors: bool,
}

/// Rules for excluding files from relocation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeRules {
    /// Exact file names (e.g. ".DS_Store", "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the path relative to the target directory.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions, with or without the leading dot, matched case-insensitively.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl FileConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.extsortrc.toml` in the current directory
    /// 3. Look for `~/.config/extsort/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read, or if any discovered file fails to parse.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("extsort")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compile the exclusion rules for matching.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.exclude)
    }
}

/// Pre-compiled exclusion rules.
///
/// The default value excludes nothing.
#[derive(Debug, Clone, Default)]
pub struct CompiledFilters {
    filenames: HashSet<String>,
    extensions: HashSet<String>,
    patterns: Vec<Pattern>,
    regexes: Vec<Regex>,
}

impl CompiledFilters {
    fn new(rules: &ExcludeRules) -> Result<Self, ConfigError> {
        let patterns = rules
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let regexes = rules
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            filenames: rules.filenames.iter().cloned().collect(),
            extensions: rules
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            patterns,
            regexes,
        })
    }

    /// Returns true if no rule is configured.
    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
            && self.extensions.is_empty()
            && self.patterns.is_empty()
            && self.regexes.is_empty()
    }

    /// Check whether a file should be left in place.
    ///
    /// `relative_path` is the file's path relative to the target directory.
    /// Rules are checked in order: exact name, extension, glob, regex.
    pub fn excludes(&self, relative_path: &Path) -> bool {
        let file_name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.filenames.contains(file_name.as_ref()) {
            return true;
        }

        if !self.extensions.is_empty() {
            let bucket = bucket_for(&file_name);
            let ext = bucket.trim_start_matches('.').to_lowercase();
            if self.extensions.contains(&ext) {
                return true;
            }
        }

        if self
            .patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative_path))
        {
            return true;
        }

        self.regexes.iter().any(|regex| regex.is_match(&file_name))
    }
}
