use crate::error::{Error, Result};
use crate::filter::{normalize_include_entry, DEFAULT_INCLUDE_EXTENSIONS};
use std::path::PathBuf;

const DEFAULT_OUTPUT_FILE: &str = "project_bundle.md";

/// Name of the ignore file read from the root directory.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Configuration for a bundling run.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Root directory to scan for files
    pub root_dir: PathBuf,

    /// Output Markdown file, overwritten if it exists
    pub output_path: PathBuf,

    /// Allow-list entries: extensions as `.ext` in lowercase, file names as given
    pub include_extensions: Vec<String>,

    /// Extra ignore patterns applied after the built-ins and the ignore file
    pub exclude_patterns: Vec<String>,

    /// Whether to read `.gitignore` from the root directory
    pub use_ignore_file: bool,

    /// Dry run mode (no file writes)
    pub dry_run: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use project_bundle::Config;
    ///
    /// let config = Config::builder()
    ///     .root_dir(".")
    ///     .include(["py", ".js"])
    ///     .build()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.include_extensions, vec![".py", ".js"]);
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Root directory doesn't exist or is not a directory
    /// - Output path is empty or names an existing directory
    /// - The allow-list is empty or contains an empty entry
    pub fn validate(&self) -> Result<()> {
        if !self.root_dir.exists() {
            return Err(Error::config(format!(
                "Root directory does not exist: {}",
                self.root_dir.display()
            )));
        }

        if !self.root_dir.is_dir() {
            return Err(Error::config(format!(
                "Root path is not a directory: {}",
                self.root_dir.display()
            )));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(Error::config("Output path must not be empty"));
        }

        if self.output_path.is_dir() {
            return Err(Error::config(format!(
                "Output path is a directory: {}",
                self.output_path.display()
            )));
        }

        if self.include_extensions.is_empty() {
            return Err(Error::config("At least one extension must be included"));
        }

        if self.include_extensions.iter().any(String::is_empty) {
            return Err(Error::config(
                "Included extensions must not be empty (got '.' or '')",
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            include_extensions: default_extensions(),
            exclude_patterns: Vec::new(),
            use_ignore_file: true,
            dry_run: false,
        }
    }
}

fn default_extensions() -> Vec<String> {
    DEFAULT_INCLUDE_EXTENSIONS
        .iter()
        .map(|ext| normalize_include_entry(ext))
        .collect()
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    root_dir: Option<PathBuf>,
    output_path: Option<PathBuf>,
    include_extensions: Option<Vec<String>>,
    exclude_patterns: Vec<String>,
    use_ignore_file: Option<bool>,
    dry_run: bool,
}

impl ConfigBuilder {
    /// Sets the root directory to scan.
    #[must_use]
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(path.into());
        self
    }

    /// Sets the output file path.
    #[must_use]
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Replaces the default allow-list.
    ///
    /// Entries may be given with or without a leading dot and in any case;
    /// `.PY`, `py` and `.py` all select Python files. Entries that mix case or
    /// contain an inner dot, such as `Dockerfile` or `CMakeLists.txt`, select
    /// files with that exact name instead.
    #[must_use]
    pub fn include<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.include_extensions = Some(
            extensions
                .into_iter()
                .map(|ext| normalize_include_entry(ext.as_ref()))
                .collect(),
        );
        self
    }

    /// Adds extra ignore patterns, evaluated after the ignore file.
    #[must_use]
    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Enables or disables reading `.gitignore` from the root.
    #[must_use]
    pub fn use_ignore_file(mut self, enabled: bool) -> Self {
        self.use_ignore_file = Some(enabled);
        self
    }

    /// Enables dry run mode (no file writes).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let mut include_extensions: Vec<String> = Vec::new();
        for ext in self.include_extensions.unwrap_or_else(default_extensions) {
            if !include_extensions.contains(&ext) {
                include_extensions.push(ext);
            }
        }

        let config = Config {
            root_dir: self.root_dir.unwrap_or_else(|| PathBuf::from(".")),
            output_path: self
                .output_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE)),
            include_extensions,
            exclude_patterns: self.exclude_patterns,
            use_ignore_file: self.use_ignore_file.unwrap_or(true),
            dry_run: self.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}
