/// Extension-bucketed file relocation.
///
/// This module walks a target directory with an explicit work stack and
/// copies every file it finds into `<output>/<bucket>/<name>`, or into
/// `<output>/<mirrored subpath>/<bucket>/<name>` when recursing. It handles
/// directory creation, copying, optional deletion of originals and the
/// stop-or-continue policy for errors. It never prints.
use crate::config::RelocateConfig;
use crate::extension::bucket_for;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Permission bits for written files: owner rwx, group and others r-x.
pub const FILE_MODE: u32 = 0o755;

/// A filesystem entry waiting to be expanded or relocated.
///
/// `dest_path` is fixed when the item is pushed and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct WorkItem {
    is_directory: bool,
    source_path: PathBuf,
    dest_path: PathBuf,
    depth: usize,
}

impl WorkItem {
    fn is_root(&self) -> bool {
        self.depth == 0
    }
}

/// A file that was copied into the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    /// Where the file was read from.
    pub source: PathBuf,
    /// Where the copy was written.
    pub destination: PathBuf,
    /// Whether the source was deleted afterwards.
    pub source_removed: bool,
}

/// Everything a run did, in the order it was attempted.
#[derive(Debug, Default)]
pub struct RelocationReport {
    pub relocated: Vec<Relocation>,
    pub errors: Vec<RelocateError>,
}

impl RelocationReport {
    /// Returns true if the run recorded no errors.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Errors that can occur while relocating files.
#[derive(Debug)]
pub enum RelocateError {
    /// The target directory could not be inspected.
    InvalidTarget { path: PathBuf, source: io::Error },
    /// The target path is not a directory.
    TargetNotDirectory { path: PathBuf },
    /// A directory's entries could not be listed.
    ListFailed { path: PathBuf, source: io::Error },
    /// A destination directory could not be created.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// A source file could not be read.
    ReadFailed { path: PathBuf, source: io::Error },
    /// A destination file could not be written.
    WriteFailed { path: PathBuf, source: io::Error },
    /// A source file was copied but could not be removed.
    DeleteFailed { path: PathBuf, source: io::Error },
}

impl RelocateError {
    /// The path the failed operation was acting on.
    pub fn path(&self) -> &Path {
        match self {
            Self::InvalidTarget { path, .. }
            | Self::TargetNotDirectory { path }
            | Self::ListFailed { path, .. }
            | Self::DirectoryCreationFailed { path, .. }
            | Self::ReadFailed { path, .. }
            | Self::WriteFailed { path, .. }
            | Self::DeleteFailed { path, .. } => path,
        }
    }
}

impl std::fmt::Display for RelocateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTarget { path, source } => {
                write!(f, "Invalid target directory {}: {}", path.display(), source)
            }
            Self::TargetNotDirectory { path } => {
                write!(f, "Target is not a directory: {}", path.display())
            }
            Self::ListFailed { path, source } => {
                write!(f, "Failed to list directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::ReadFailed { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            Self::WriteFailed { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            Self::DeleteFailed { path, source } => {
                write!(f, "Failed to delete {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for RelocateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TargetNotDirectory { .. } => None,
            Self::InvalidTarget { source, .. }
            | Self::ListFailed { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::ReadFailed { source, .. }
            | Self::WriteFailed { source, .. }
            | Self::DeleteFailed { source, .. } => Some(source),
        }
    }
}

/// Result type for relocation operations.
pub type RelocateResult<T> = Result<T, RelocateError>;

/// Copies the files of a target directory into extension buckets.
///
/// The walk is depth-first over an explicit stack; sibling order follows
/// the order the platform lists directory entries in and is not guaranteed.
///
/// # Examples
///
/// ```no_run
/// use extsort::config::RelocateConfig;
/// use extsort::relocator::Relocator;
///
/// let mut config = RelocateConfig::new("/home/user/Downloads", "/home/user/Sorted");
/// config.recursive = true;
///
/// let errors = Relocator::new(&config).run();
/// for error in &errors {
///     eprintln!("{}", error);
/// }
/// ```
pub struct Relocator<'a> {
    config: &'a RelocateConfig,
}

impl<'a> Relocator<'a> {
    pub fn new(config: &'a RelocateConfig) -> Self {
        Self { config }
    }

    /// Runs the relocation and returns every error it recorded.
    ///
    /// An empty list means every file was relocated. Unless
    /// `suppress_errors` is set the list holds at most one error, since the
    /// walk stops at the first failure.
    pub fn run(&self) -> Vec<RelocateError> {
        self.run_with_report().errors
    }

    /// Runs the relocation and returns both the relocated files and the errors.
    pub fn run_with_report(&self) -> RelocationReport {
        let mut report = RelocationReport::default();

        let root = match self.root_item() {
            Ok(root) => root,
            Err(e) => {
                report.errors.push(e);
                return report;
            }
        };

        // Resolved once so a nested output directory is never walked.
        let output_root = fs::canonicalize(&self.config.output_dir).ok();

        let mut stack = vec![root];
        while let Some(item) = stack.pop() {
            let outcome = if item.is_directory {
                self.expand(&item, output_root.as_deref(), &mut stack)
            } else {
                self.relocate(&item, &mut report.relocated)
            };

            if let Err(e) = outcome {
                report.errors.push(e);
                if !self.config.suppress_errors {
                    break;
                }
            }
        }

        report
    }

    fn root_item(&self) -> RelocateResult<WorkItem> {
        let target = &self.config.target_dir;
        let metadata = fs::metadata(target).map_err(|e| RelocateError::InvalidTarget {
            path: target.clone(),
            source: e,
        })?;

        if !metadata.is_dir() {
            return Err(RelocateError::TargetNotDirectory {
                path: target.clone(),
            });
        }

        Ok(WorkItem {
            is_directory: true,
            source_path: target.clone(),
            dest_path: self.config.output_dir.clone(),
            depth: 0,
        })
    }

    /// Lists a directory and pushes one work item per child.
    ///
    /// Only the root is expanded unless the walk is recursive. Children are
    /// pushed only after the whole listing succeeded.
    fn expand(
        &self,
        item: &WorkItem,
        output_root: Option<&Path>,
        stack: &mut Vec<WorkItem>,
    ) -> RelocateResult<()> {
        if !item.is_root() {
            if !self.config.recursive {
                return Ok(());
            }
            if let Some(output_root) = output_root
                && fs::canonicalize(&item.source_path).is_ok_and(|path| path == output_root)
            {
                return Ok(());
            }
        }

        let list_failed = |e: io::Error| RelocateError::ListFailed {
            path: item.source_path.clone(),
            source: e,
        };

        let entries = fs::read_dir(&item.source_path)
            .and_then(|entries| entries.collect::<io::Result<Vec<_>>>())
            .map_err(list_failed)?;

        let mut children = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = entry.file_name();
            let source_path = item.source_path.join(&name);
            let is_directory = entry.file_type().map_err(list_failed)?.is_dir();

            let dest_path = if is_directory {
                item.dest_path.join(&name)
            } else {
                if self.is_excluded(&source_path) {
                    continue;
                }
                let bucket = bucket_for(&name.to_string_lossy());
                item.dest_path.join(bucket).join(&name)
            };

            children.push(WorkItem {
                is_directory,
                source_path,
                dest_path,
                depth: item.depth + 1,
            });
        }

        stack.extend(children);
        Ok(())
    }

    fn is_excluded(&self, source_path: &Path) -> bool {
        let filters = &self.config.filters;
        if filters.is_empty() {
            return false;
        }
        let relative = source_path
            .strip_prefix(&self.config.target_dir)
            .unwrap_or(source_path);
        filters.excludes(relative)
    }

    /// Copies one file into its bucket and optionally deletes the original.
    ///
    /// The copy is recorded in `relocated` as soon as it is written, so a
    /// failed delete still leaves a record with `source_removed` unset.
    fn relocate(&self, item: &WorkItem, relocated: &mut Vec<Relocation>) -> RelocateResult<()> {
        if let Some(parent) = item.dest_path.parent() {
            fs::create_dir_all(parent).map_err(|e| RelocateError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let contents = fs::read(&item.source_path).map_err(|e| RelocateError::ReadFailed {
            path: item.source_path.clone(),
            source: e,
        })?;

        write_file(&item.dest_path, &contents).map_err(|e| RelocateError::WriteFailed {
            path: item.dest_path.clone(),
            source: e,
        })?;

        let removal = if self.config.delete_on_success {
            fs::remove_file(&item.source_path).map(|()| true)
        } else {
            Ok(false)
        };

        relocated.push(Relocation {
            source: item.source_path.clone(),
            destination: item.dest_path.clone(),
            source_removed: matches!(removal, Ok(true)),
        });

        removal
            .map(|_| ())
            .map_err(|e| RelocateError::DeleteFailed {
                path: item.source_path.clone(),
                source: e,
            })
    }
}

/// Writes `contents` to `path`, creating it with [`FILE_MODE`] or truncating it.
fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)
}
