//! Output formatting module.
//!
//! Every line the tool prints goes through [`OutputFormatter`]. Error lines
//! and usage text are printed without styling; only informational output
//! is colored.

use crate::relocator::Relocation;
use colored::*;
use std::fmt::Display;

/// Centralized CLI output.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints errors one per line to standard output, followed by a blank line.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use extsort::output::OutputFormatter;
    ///
    /// OutputFormatter::error_list(&["-t flag is required."]);
    /// ```
    pub fn error_list<E: Display>(errors: &[E]) {
        for error in errors {
            println!("{}", error);
        }
        println!();
    }

    /// Prints usage text to standard error.
    pub fn usage(text: &str) {
        eprintln!("{}", text);
    }

    /// Prints one relocated file as `source -> destination`.
    pub fn relocation(relocation: &Relocation) {
        let marker = if relocation.source_removed {
            "moved".green()
        } else {
            "copied".green()
        };
        println!(
            "{} {} {} {}",
            marker,
            relocation.source.display(),
            "->".dimmed(),
            relocation.destination.display().to_string().cyan()
        );
    }
}
