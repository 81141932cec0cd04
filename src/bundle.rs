use crate::error::Result;
use crate::file::FileCandidate;
use crate::language::language_tag;
use std::path::Path;

const MIN_FENCE_LEN: usize = 3;

/// The Markdown block generated for one bundled file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Path relative to the root, `/`-separated
    pub path: String,

    /// Fenced block language tag, empty when unknown
    pub language: &'static str,

    /// File text without trailing line breaks
    pub content: String,
}

impl Fragment {
    /// Creates a fragment, inferring the language from the path.
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let mut content = content.into();

        let trimmed_len = content.trim_end_matches(['\r', '\n']).len();
        content.truncate(trimmed_len);

        let language = language_tag(path.rsplit('/').next().unwrap_or(&path));

        Self {
            path,
            language,
            content,
        }
    }

    /// Reads a candidate from disk and wraps it in a fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not UTF-8 text.
    pub fn read(candidate: &FileCandidate) -> Result<Self> {
        let content = candidate.read_text()?;
        Ok(Self::new(candidate.relative_path.clone(), content))
    }

    /// Backtick fence long enough that no run of backticks inside the content
    /// can close the block early.
    #[must_use]
    pub fn fence(&self) -> String {
        let longest_run = self
            .content
            .split(|c: char| c != '`')
            .map(str::len)
            .max()
            .unwrap_or(0);

        "`".repeat(MIN_FENCE_LEN.max(longest_run + 1))
    }
}

/// Ordered fragments plus the document title, rendered once at the end.
#[derive(Debug, Clone, Default)]
pub struct BundleDocument {
    title: String,
    fragments: Vec<Fragment>,
}

impl BundleDocument {
    /// Creates an empty document with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fragments: Vec::new(),
        }
    }

    /// Creates an empty document titled after the root directory's name.
    #[must_use]
    pub fn for_root(root: &Path) -> Self {
        Self::new(title_for_root(root))
    }

    /// Appends a fragment.
    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// Document title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Fragments in output order.
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Number of fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns true if no file has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Derives a title from the root directory name, falling back to the path as given.
#[must_use]
pub fn title_for_root(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .map_or_else(
            || root.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
}
