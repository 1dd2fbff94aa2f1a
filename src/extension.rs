//! Bucket naming for relocated files.
//!
//! A file's bucket is the subdirectory of the output tree it is copied into.
//! Buckets are derived purely from the file name, never from file content.
//!
//! # Examples
//!
//! ```
//! use extsort::extension::{bucket_for, NO_EXTENSION};
//!
//! assert_eq!(bucket_for("report.pdf"), ".pdf");
//! assert_eq!(bucket_for("archive.tar.gz"), ".gz");
//! assert_eq!(bucket_for("Makefile"), NO_EXTENSION);
//! ```

/// Bucket used for files whose name yields no extension.
pub const NO_EXTENSION: &str = "NO_EXTENSION";

/// Returns the bucket name for a file name.
///
/// The extension is the substring from the last `.` to the end of the name,
/// dot included, case preserved and surrounding whitespace trimmed. Names
/// without a dot, or ending in a dot, fall into [`NO_EXTENSION`].
///
/// A dotfile such as `.env` therefore shares its bucket with `x.env`.
pub fn bucket_for(file_name: &str) -> String {
    let extension = match file_name.rfind('.') {
        Some(idx) => file_name[idx..].trim(),
        None => "",
    };

    if extension.is_empty() || extension == "." {
        NO_EXTENSION.to_string()
    } else {
        extension.to_string()
    }
}
