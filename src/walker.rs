use crate::file::{to_slash_path, FileCandidate};
use crate::rules::IgnoreRuleSet;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Depth-first directory walker that prunes ignored directories before
/// descending into them.
///
/// Entries are visited in file name order within each directory, symlinks
/// are never followed, and hidden files get no special treatment: only the
/// [`IgnoreRuleSet`] decides what is skipped.
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
    rules: Arc<IgnoreRuleSet>,
    skip_file: Option<PathBuf>,
}

impl Walker {
    /// Creates a walker over `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, rules: IgnoreRuleSet) -> Self {
        Self {
            root: root.into(),
            rules: Arc::new(rules),
            skip_file: None,
        }
    }

    /// Never yields the file at `path`. Used to keep the output document out
    /// of its own bundle; `path` must be spelled the same way the walk
    /// produces paths (both absolute, or both relative to the same base).
    #[must_use]
    pub fn skip_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.skip_file = Some(path.into());
        self
    }

    /// Walks the tree lazily, yielding every regular file that survives the
    /// ignore rules. Walk errors are logged and skipped.
    pub fn walk(&self) -> impl Iterator<Item = FileCandidate> {
        let filter_root = self.root.clone();
        let rules = Arc::clone(&self.rules);

        let walk = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }

                let relative = relative_path(&filter_root, entry.path());
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());

                if rules.is_ignored(&relative, is_dir) {
                    trace!("Ignoring {}{}", relative, if is_dir { "/" } else { "" });
                    return false;
                }
                true
            })
            .build();

        let root = self.root.clone();
        let skip_file = self.skip_file.clone();

        walk.filter_map(move |result| match result {
            Ok(entry) if entry.file_type().is_some_and(|ft| ft.is_file()) => {
                if skip_file.as_deref() == Some(entry.path()) {
                    debug!("Skipping output file {}", entry.path().display());
                    return None;
                }

                let relative = relative_path(&root, entry.path());
                Some(FileCandidate::new(entry.into_path(), relative))
            }
            Ok(entry) => {
                if entry.path_is_symlink() {
                    debug!("Not following symlink {}", entry.path().display());
                }
                None
            }
            Err(e) => {
                warn!("Walk error: {}", e);
                None
            }
        })
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    to_slash_path(&relative)
}
