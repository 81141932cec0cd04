//! Ignore rules: built-in exclusions, the root `.gitignore` and user patterns.
//!
//! Rules are evaluated in order and the last matching rule wins, so a `!`
//! pattern can re-include something an earlier rule excluded. A pattern
//! without a `/` is matched against a single path segment; a pattern with an
//! inner or leading `/` is anchored to the root and matched against the whole
//! relative path. A trailing `/` limits a rule to directories.

use crate::config::{Config, IGNORE_FILE_NAME};
use crate::error::{Error, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Names and globs that are always excluded: dependency and build output
/// directories, editor state, and binary or media files.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    ".git", ".hg", ".svn", ".idea", ".vscode", "venv", ".venv", "__pycache__", "node_modules",
    "dist", "build", "target", "*.pyc", "*.log", "*.swp", "*.swo", ".DS_Store", "*.png", "*.jpg",
    "*.jpeg", "*.gif", "*.bmp", "*.ico", "*.webp", "*.mp3", "*.mp4", "*.mov", "*.wav", "*.pdf",
    "*.zip", "*.tar", "*.gz", "*.7z", "*.exe", "*.dll", "*.so", "*.dylib", "*.class", "*.o",
    "*.wasm",
];

/// Where a rule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSource {
    /// Built-in exclusion list
    BuiltIn,
    /// The root directory's ignore file
    IgnoreFile,
    /// Patterns passed on the command line or through the builder
    User,
}

#[derive(Debug, Clone)]
struct IgnoreRule {
    pattern: String,
    matcher: GlobMatcher,
    negated: bool,
    dir_only: bool,
    anchored: bool,
    source: RuleSource,
}

impl IgnoreRule {
    /// Parses one ignore line. Returns `Ok(None)` for blank lines and comments.
    fn parse(line: &str, source: RuleSource) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (negated, rest) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        let (dir_only, rest) = match rest.strip_suffix('/') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };

        let (anchored, glob) = match rest.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (rest.contains('/'), rest),
        };

        if glob.is_empty() {
            return Ok(None);
        }

        let matcher = GlobBuilder::new(glob)
            .literal_separator(true)
            .build()
            .map_err(|e| Error::invalid_pattern(line, e.to_string()))?
            .compile_matcher();

        Ok(Some(Self {
            pattern: line.to_string(),
            matcher,
            negated,
            dir_only,
            anchored,
            source,
        }))
    }

    fn matches(&self, relative: &str, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }

        if self.anchored {
            self.matcher.is_match(relative)
        } else {
            let name = relative.rsplit('/').next().unwrap_or(relative);
            self.matcher.is_match(name)
        }
    }
}

/// Ordered, immutable set of ignore rules.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRuleSet {
    rules: Vec<IgnoreRule>,
}

impl IgnoreRuleSet {
    /// Loads the built-in rules, the root ignore file (if enabled and present)
    /// and the configured exclude patterns, in that order.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured exclude pattern is not a valid glob.
    /// Invalid lines in the ignore file are skipped with a warning.
    pub fn load(config: &Config) -> Result<Self> {
        let mut set = Self::builtin();

        if config.use_ignore_file {
            set.extend_from_ignore_file(&config.root_dir.join(IGNORE_FILE_NAME));
        }

        for pattern in &config.exclude_patterns {
            set.push(pattern, RuleSource::User)?;
        }

        debug!(
            "Loaded {} ignore rules ({} from {})",
            set.len(),
            set.count_from(RuleSource::IgnoreFile),
            IGNORE_FILE_NAME
        );

        Ok(set)
    }

    /// Creates a rule set containing only the built-in exclusions.
    #[must_use]
    pub fn builtin() -> Self {
        let rules = DEFAULT_EXCLUDE_PATTERNS
            .iter()
            .filter_map(|p| IgnoreRule::parse(p, RuleSource::BuiltIn).ok().flatten())
            .collect();
        Self { rules }
    }

    /// Creates a rule set from explicit patterns, without built-ins.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern is not a valid glob.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for pattern in patterns {
            set.push(pattern.as_ref(), RuleSource::User)?;
        }
        Ok(set)
    }

    fn push(&mut self, line: &str, source: RuleSource) -> Result<()> {
        if let Some(rule) = IgnoreRule::parse(line, source)? {
            self.rules.push(rule);
        }
        Ok(())
    }

    fn extend_from_ignore_file(&mut self, path: &Path) {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No ignore file at {}", path.display());
                return;
            }
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                return;
            }
        };

        for line in content.lines() {
            if let Err(e) = self.push(line, RuleSource::IgnoreFile) {
                warn!("Skipping line in {}: {}", path.display(), e);
            }
        }
    }

    /// Returns true if the entry itself is ignored. Ancestors are not checked;
    /// the walker prunes ignored directories before reaching their children.
    #[must_use]
    pub fn is_ignored(&self, relative: &str, is_dir: bool) -> bool {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(relative, is_dir))
            .is_some_and(|rule| !rule.negated)
    }

    /// Returns true if the path or any of its parent directories is ignored.
    #[must_use]
    pub fn is_excluded(&self, relative: &str, is_dir: bool) -> bool {
        let mut prefix_end = 0;
        while let Some(offset) = relative[prefix_end..].find('/') {
            let dir = &relative[..prefix_end + offset];
            if self.is_ignored(dir, true) {
                return true;
            }
            prefix_end += offset + 1;
        }

        self.is_ignored(relative, is_dir)
    }

    /// Returns the original pattern text of every rule, in evaluation order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.pattern.as_str())
    }

    /// Number of rules loaded from the given source.
    #[must_use]
    pub fn count_from(&self, source: RuleSource) -> usize {
        self.rules.iter().filter(|rule| rule.source == source).count()
    }

    /// Total number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
