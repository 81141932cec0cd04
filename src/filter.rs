//! Extension allow-list filtering.
//!
//! Each allow-list entry is either an extension or a whole file name.
//! Entries with a leading dot, and bare lowercase or uppercase words such as
//! `py` or `PY`, are extensions: `.PY`, `py` and `.py` all select `main.py`,
//! and none of them selects an extensionless file named `py`. Entries that
//! contain an inner dot (`CMakeLists.txt`) or mix case (`Dockerfile`) are file
//! names. Matching is case-insensitive either way. A dotfile such as `.env`
//! has no extension and is selected by the `.env` entry.

use crate::config::Config;
use crate::file::FileCandidate;
use std::collections::HashSet;

/// Extensions and file names bundled when no allow-list is given.
pub const DEFAULT_INCLUDE_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".ts", ".jsx", ".tsx", ".html", ".css", ".scss", ".json", ".md", ".java", ".c",
    ".h", ".cpp", ".hpp", ".cs", ".go", ".rs", ".php", ".rb", ".swift", ".kt", ".kts", ".sh",
    ".yml", ".yaml", ".toml", ".ini", ".cfg", ".sql", ".dockerfile", "Dockerfile",
];

/// Normalizes an allow-list entry.
///
/// Extensions become lowercase with a single leading dot (`PY` → `.py`).
/// File names are trimmed and keep their spelling. Returns an empty string
/// for entries with nothing but dots.
#[must_use]
pub(crate) fn normalize_include_entry(entry: &str) -> String {
    let entry = entry.trim();
    let bare = entry.trim_start_matches('.');

    if bare.is_empty() {
        String::new()
    } else if entry.starts_with('.') || !is_file_name_entry(bare) {
        format!(".{}", bare.to_lowercase())
    } else {
        bare.to_string()
    }
}

fn is_file_name_entry(entry: &str) -> bool {
    entry.contains('.')
        || (entry.chars().any(char::is_uppercase) && entry.chars().any(char::is_lowercase))
}

/// Keeps only files whose extension or name is on the allow-list.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    extensions: HashSet<String>,
    file_names: HashSet<String>,
}

impl ExtensionFilter {
    /// Creates a filter from raw allow-list entries.
    #[must_use]
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extensions = HashSet::new();
        let mut file_names = HashSet::new();

        for entry in entries {
            let entry = normalize_include_entry(entry.as_ref());
            if entry.is_empty() {
                continue;
            }

            match entry.strip_prefix('.') {
                Some(ext) => extensions.insert(ext.to_string()),
                None => file_names.insert(entry.to_lowercase()),
            };
        }

        Self {
            extensions,
            file_names,
        }
    }

    /// Creates a filter from the configured allow-list.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.include_extensions)
    }

    /// Returns true if the candidate's extension or file name is allowed.
    #[must_use]
    pub fn allows(&self, candidate: &FileCandidate) -> bool {
        if candidate
            .extension
            .as_ref()
            .is_some_and(|ext| self.extensions.contains(ext))
        {
            return true;
        }

        let name = candidate.file_name().to_lowercase();
        if self.file_names.contains(&name) {
            return true;
        }

        candidate.extension.is_none()
            && name
                .strip_prefix('.')
                .is_some_and(|rest| self.extensions.contains(rest))
    }

    /// Filters candidates lazily, preserving their order.
    pub fn filter<'a, I>(&'a self, candidates: I) -> impl Iterator<Item = FileCandidate> + 'a
    where
        I: IntoIterator<Item = FileCandidate>,
        I::IntoIter: 'a,
    {
        candidates
            .into_iter()
            .filter(move |candidate| self.allows(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn candidate(relative: &str) -> FileCandidate {
        FileCandidate::new(PathBuf::from("/root").join(relative), relative.to_string())
    }

    #[test]
    fn test_default_list_allows_common_sources() {
        let filter = ExtensionFilter::new(DEFAULT_INCLUDE_EXTENSIONS);

        assert!(filter.allows(&candidate("src/main.py")));
        assert!(filter.allows(&candidate("lib.rs")));
        assert!(filter.allows(&candidate("Cargo.toml")));
        assert!(filter.allows(&candidate("docker/Dockerfile")));
        assert!(filter.allows(&candidate("api.dockerfile")));
        assert!(!filter.allows(&candidate("image.png")));
        assert!(!filter.allows(&candidate("LICENSE")));
    }

    #[test]
    fn test_case_insensitive() {
        let filter = ExtensionFilter::new([".PY"]);

        assert!(filter.allows(&candidate("main.py")));
        assert!(filter.allows(&candidate("MAIN.PY")));
        assert!(filter.allows(&candidate("Main.Py")));
        assert!(ExtensionFilter::new(["PY"]).allows(&candidate("main.py")));
    }

    #[test]
    fn test_leading_dot_optional() {
        let with_dot = ExtensionFilter::new([".js"]);
        let without_dot = ExtensionFilter::new(["js"]);

        assert!(with_dot.allows(&candidate("app.js")));
        assert!(without_dot.allows(&candidate("app.js")));
    }

    #[test]
    fn test_dotfile_by_name() {
        let filter = ExtensionFilter::new([".env"]);

        assert!(filter.allows(&candidate(".env")));
        assert!(filter.allows(&candidate("config/.env")));
        assert!(!filter.allows(&candidate("env.txt")));
        assert!(!filter.allows(&candidate("env")));
    }

    #[test]
    fn test_extension_entry_does_not_match_bare_file_name() {
        let filter = ExtensionFilter::new(DEFAULT_INCLUDE_EXTENSIONS);

        assert!(!filter.allows(&candidate("bin/go")));
        assert!(!filter.allows(&candidate("notes/md")));
        assert!(!filter.allows(&candidate("sh")));
        assert!(!ExtensionFilter::new(["go"]).allows(&candidate("bin/go")));
        assert!(!ExtensionFilter::new([".go"]).allows(&candidate("bin/go")));
    }

    #[test]
    fn test_file_name_entries() {
        let filter = ExtensionFilter::new(["Makefile", "CMakeLists.txt"]);

        assert!(filter.allows(&candidate("Makefile")));
        assert!(filter.allows(&candidate("sub/makefile")));
        assert!(filter.allows(&candidate("cmake/CMakeLists.txt")));
        assert!(!filter.allows(&candidate("notes.txt")));
        assert!(!filter.allows(&candidate("build.makefile")));
    }

    #[test]
    fn test_only_last_extension_counts() {
        let filter = ExtensionFilter::new(["gz"]);

        assert!(filter.allows(&candidate("archive.tar.gz")));
        assert!(!ExtensionFilter::new(["tar"]).allows(&candidate("archive.tar.gz")));
    }

    #[test]
    fn test_filter_preserves_order() {
        let filter = ExtensionFilter::new([".py", ".js"]);
        let candidates = vec![
            candidate("b.py"),
            candidate("notes.md"),
            candidate("a.js"),
            candidate("c.py"),
        ];

        let kept: Vec<String> = filter
            .filter(candidates)
            .map(|c| c.relative_path)
            .collect();

        assert_eq!(kept, vec!["b.py", "a.js", "c.py"]);
    }

    #[test]
    fn test_normalize_include_entry() {
        assert_eq!(normalize_include_entry(" .RS "), ".rs");
        assert_eq!(normalize_include_entry("rs"), ".rs");
        assert_eq!(normalize_include_entry("..md"), ".md");
        assert_eq!(normalize_include_entry("Dockerfile"), "Dockerfile");
        assert_eq!(normalize_include_entry("dockerfile"), ".dockerfile");
        assert_eq!(normalize_include_entry("CMakeLists.txt"), "CMakeLists.txt");
        assert_eq!(normalize_include_entry("."), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for entry in [".PY", "go", "Dockerfile", "CMakeLists.txt", ".env"] {
            let once = normalize_include_entry(entry);
            assert_eq!(normalize_include_entry(&once), once);
        }
    }
}
