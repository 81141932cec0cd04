//! # project-bundle
//!
//! Bundles a project's source files into a single Markdown document for
//! pasting into an AI chat prompt.
//!
//! ## Features
//!
//! - `.gitignore` support merged with built-in exclusions
//! - Ignored directories are pruned before they are walked
//! - Case-insensitive extension allow-list
//! - Language-tagged fenced code blocks
//! - Deterministic output ordered by relative path
//! - Atomic replacement of the output file
//!
//! ## Quick Start
//!
//! ```no_run
//! use project_bundle::{Config, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .root_dir("./my-project")
//!     .output_path("project_bundle.md")
//!     .include([".py", ".js"])
//!     .build()?;
//!
//! Pipeline::new(config)?.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library follows a single linear pipeline:
//! 1. **Rules**: loads built-in exclusions, `.gitignore` and user patterns
//! 2. **Walker**: enumerates files, pruning ignored directories
//! 3. **Filter**: keeps files on the extension allow-list
//! 4. **Bundle**: reads each file and wraps it in a fenced block
//! 5. **Writer**: renders and persists the document

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod bundle;
mod config;
mod error;
mod file;
mod filter;
mod language;
mod pipeline;
mod rules;
mod template;
mod walker;
mod writer;

pub use bundle::{title_for_root, BundleDocument, Fragment};
pub use config::{Config, ConfigBuilder, IGNORE_FILE_NAME};
pub use error::{Error, Result};
pub use file::FileCandidate;
pub use filter::{ExtensionFilter, DEFAULT_INCLUDE_EXTENSIONS};
pub use language::language_tag;
pub use pipeline::{BundleStats, Pipeline, SkippedFile};
pub use rules::{IgnoreRuleSet, RuleSource, DEFAULT_EXCLUDE_PATTERNS};
pub use walker::Walker;

/// Runs the complete bundling pipeline with the given configuration.
///
/// This is the main entry point for the library.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - Root directory doesn't exist or is inaccessible
/// - An exclude pattern is not a valid glob
/// - The output file cannot be written
///
/// Files that cannot be read as text are skipped and reported in
/// [`BundleStats::skipped`]; they do not fail the run.
///
/// # Examples
///
/// ```no_run
/// use project_bundle::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .root_dir(".")
///     .build()?;
///
/// run(config)?;
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<BundleStats> {
    Pipeline::new(config)?.run()
}
