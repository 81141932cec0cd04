use crate::{
    bundle::{BundleDocument, Fragment},
    config::Config,
    error::{Error, Result},
    file::FileCandidate,
    filter::ExtensionFilter,
    rules::IgnoreRuleSet,
    walker::Walker,
    writer::{resolve_output_path, Writer},
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// A file that was selected but could not be bundled.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    /// Path relative to the root
    pub path: String,

    /// Why the file was skipped
    pub reason: String,
}

/// Statistics collected during a bundling run.
#[derive(Debug, Clone, Serialize)]
pub struct BundleStats {
    /// Files that survived the ignore rules
    pub files_seen: usize,

    /// Files that also passed the extension filter
    pub files_selected: usize,

    /// Files written into the bundle
    pub files_bundled: usize,

    /// Selected files that could not be read as text
    pub skipped: Vec<SkippedFile>,

    /// Size of the rendered document in bytes (0 in dry run mode)
    pub bytes_written: usize,

    /// Output file path
    pub output_path: PathBuf,

    /// Whether the write stage was skipped
    pub dry_run: bool,

    /// Total execution time
    pub duration: Duration,

    /// Time spent walking and filtering
    pub scan_duration: Duration,

    /// Time spent reading files
    pub bundle_duration: Duration,

    /// Time spent rendering and writing
    pub write_duration: Duration,
}

impl BundleStats {
    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\nBundle summary");
        println!("  Files scanned:   {:>8}", self.files_seen);
        println!("  Files selected:  {:>8}", self.files_selected);
        println!("  Files bundled:   {:>8}", self.files_bundled);
        println!("  Files skipped:   {:>8}", self.skipped.len());
        for skipped in &self.skipped {
            println!("    - {}: {}", skipped.path, skipped.reason);
        }
        if self.dry_run {
            println!("  Output:          (dry run, nothing written)");
        } else {
            println!(
                "  Output:          {} ({} bytes)",
                self.output_path.display(),
                self.bytes_written
            );
        }
        println!("  Total time:      {:>8.2}s\n", self.duration.as_secs_f64());
    }
}

/// Orchestrates walk → filter → read → render → write.
pub struct Pipeline {
    config: Config,
    root: PathBuf,
    walker: Walker,
    filter: ExtensionFilter,
    writer: Writer,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - An exclude pattern is not a valid glob
    /// - The root directory cannot be resolved
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let root = config
            .root_dir
            .canonicalize()
            .map_err(|e| Error::io(&config.root_dir, e))?;

        let rules = IgnoreRuleSet::load(&config)?;
        debug!(
            "Ignoring patterns: {}",
            rules.patterns().collect::<Vec<_>>().join(", ")
        );

        let walker =
            Walker::new(&root, rules).skip_file(resolve_output_path(&config.output_path));
        let filter = ExtensionFilter::from_config(&config);
        let writer = Writer::new(&config.output_path)?;

        Ok(Self {
            config,
            root,
            walker,
            filter,
            writer,
        })
    }

    /// Walks the root and returns the files that pass every filter, sorted by
    /// relative path, together with the number of files the walk produced.
    #[must_use]
    pub fn select(&self) -> (Vec<FileCandidate>, usize) {
        let mut files_seen = 0;
        let mut selected: Vec<FileCandidate> = self
            .filter
            .filter(self.walker.walk().inspect(|_| files_seen += 1))
            .collect();

        selected.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        (selected, files_seen)
    }

    /// Reads the selected files into a document. Files that cannot be read as
    /// text are reported and left out.
    #[must_use]
    pub fn bundle(&self, selected: &[FileCandidate]) -> (BundleDocument, Vec<SkippedFile>) {
        let mut document = BundleDocument::for_root(&self.root);
        let mut skipped = Vec::new();

        for candidate in selected {
            match Fragment::read(candidate) {
                Ok(fragment) => {
                    debug!("Bundled: {}", candidate.relative_path);
                    document.push(fragment);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", candidate.relative_path, e);
                    skipped.push(SkippedFile {
                        path: candidate.relative_path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        (document, skipped)
    }

    /// Renders the bundle without touching the output file.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render(&self) -> Result<String> {
        let (selected, _) = self.select();
        let (document, _) = self.bundle(&selected);
        self.writer.render(&document)
    }

    /// Executes the complete pipeline and returns statistics.
    ///
    /// # Process
    ///
    /// 1. **Scan**: walks the root, applying ignore rules and the allow-list
    /// 2. **Bundle**: reads each file as text, skipping unreadable ones
    /// 3. **Write**: renders the document and replaces the output file
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing the output fails. Unreadable
    /// input files are not errors.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use project_bundle::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .root_dir(".")
    ///     .include([".py", ".js"])
    ///     .build()?;
    ///
    /// let stats = Pipeline::new(config)?.run()?;
    /// stats.print_summary();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(root_dir = %self.root.display()))]
    pub fn run(self) -> Result<BundleStats> {
        let start_time = Instant::now();

        info!("Starting project bundling");
        info!("Output file: {}", self.config.output_path.display());
        debug!(
            "Including extensions: {}",
            self.config.include_extensions.join(", ")
        );

        let scan_start = Instant::now();
        let (selected, files_seen) = self.select();
        let scan_duration = scan_start.elapsed();

        info!(
            "✓ Selected {} of {} files in {:.2}s",
            selected.len(),
            files_seen,
            scan_duration.as_secs_f64()
        );

        let bundle_start = Instant::now();
        let (document, skipped) = self.bundle(&selected);
        let bundle_duration = bundle_start.elapsed();

        if document.is_empty() {
            warn!("No files matched; the bundle will only contain the preamble");
        }

        let write_start = Instant::now();
        let bytes_written = if self.config.dry_run {
            warn!("Dry run mode enabled - skipping file writes");
            self.print_dry_run_listing(&document);
            0
        } else {
            self.writer.write(&document)?
        };
        let write_duration = write_start.elapsed();

        let duration = start_time.elapsed();

        info!(
            "✓ Bundled {} files ({} skipped) in {:.2}s",
            document.len(),
            skipped.len(),
            duration.as_secs_f64()
        );

        Ok(BundleStats {
            files_seen,
            files_selected: selected.len(),
            files_bundled: document.len(),
            skipped,
            bytes_written,
            output_path: self.config.output_path,
            dry_run: self.config.dry_run,
            duration,
            scan_duration,
            bundle_duration,
            write_duration,
        })
    }

    /// Prints the files a real run would bundle.
    fn print_dry_run_listing(&self, document: &BundleDocument) {
        println!(
            "Would write {} files to {}:",
            document.len(),
            self.config.output_path.display()
        );
        for fragment in document.fragments() {
            println!("  {}", fragment.path);
        }
    }
}
