use crate::{
    bundle::BundleDocument,
    error::{Error, Result},
    template::TemplateEngine,
};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Renders the bundle document and writes it to the output path.
pub(crate) struct Writer {
    output_path: PathBuf,
    template_engine: TemplateEngine,
}

impl Writer {
    /// Creates a new writer for `output_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if template engine initialization fails.
    pub(crate) fn new(output_path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            output_path: output_path.into(),
            template_engine: TemplateEngine::new()?,
        })
    }

    /// Renders the document without writing it.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub(crate) fn render(&self, document: &BundleDocument) -> Result<String> {
        self.template_engine.render(document)
    }

    /// Renders and writes the document, replacing any existing file.
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Template rendering fails
    /// - The parent directory cannot be created
    /// - File write operations fail
    pub(crate) fn write(&self, document: &BundleDocument) -> Result<usize> {
        let content = self.render(document)?;

        let created = create_parent_dirs(&self.output_path)?;

        if let Err(e) = write_file_atomic(&self.output_path, &content) {
            remove_created_dirs(&created);
            return Err(e);
        }

        info!(
            "Wrote {} files ({} bytes) to {}",
            document.len(),
            content.len(),
            self.output_path.display()
        );
        Ok(content.len())
    }
}

/// Writes a file atomically.
///
/// # Process
///
/// 1. Writes content to a temporary sibling file
/// 2. Syncs the temporary file to disk
/// 3. Renames it over the target path
///
/// An interrupted or failed write leaves any previous file untouched.
fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    let temp_path = temp_path_for(path)?;

    let result = write_synced(&temp_path, content)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| Error::io(path, e)));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    } else {
        debug!("Replaced {} via {}", path.display(), temp_path.display());
    }

    result
}

/// Creates the missing ancestors of `path` and returns them, deepest first.
fn create_parent_dirs(path: &Path) -> Result<Vec<PathBuf>> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(Vec::new());
    };

    let missing: Vec<PathBuf> = parent
        .ancestors()
        .take_while(|dir| !dir.as_os_str().is_empty() && !dir.exists())
        .map(Path::to_path_buf)
        .collect();

    if let Err(e) = fs::create_dir_all(parent) {
        remove_created_dirs(&missing);
        return Err(Error::io(parent, e));
    }

    Ok(missing)
}

fn remove_created_dirs(dirs: &[PathBuf]) {
    for dir in dirs {
        if fs::remove_dir(dir).is_ok() {
            debug!("Removed {}", dir.display());
        }
    }
}

fn write_synced(path: &Path, content: &str) -> Result<()> {
    let mut file = fs::File::create(path).map_err(|e| Error::io(path, e))?;

    file.write_all(content.as_bytes())
        .map_err(|e| Error::io(path, e))?;

    // Ensure data is flushed to disk before the rename
    file.sync_all().map_err(|e| Error::io(path, e))
}

fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::config(format!("Invalid output path: {}", path.display())))?
        .to_string_lossy();

    Ok(path.with_file_name(format!(".{file_name}.tmp")))
}

/// Resolves the output path to the absolute, symlink-free form the walker
/// produces, so the output file can be recognised during the scan.
///
/// Falls back to the path as given when its parent directory does not exist
/// yet; such a file cannot be inside the scanned tree.
pub(crate) fn resolve_output_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::Fragment;
    use assert_fs::prelude::*;

    fn sample_document() -> BundleDocument {
        let mut doc = BundleDocument::new("demo");
        doc.push(Fragment::new("src/main.py", "print('hi')"));
        doc
    }

    #[test]
    fn test_writer_creates_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let output = temp.child("bundle.md");

        let writer = Writer::new(output.path()).unwrap();
        let written = writer.write(&sample_document()).unwrap();

        let content = fs::read_to_string(output.path()).unwrap();
        assert_eq!(content.len(), written);
        assert!(content.starts_with("# Project Bundle: demo\n"));
        assert!(content.contains("**File:** `src/main.py`"));
    }

    #[test]
    fn test_writer_overwrites_existing_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let output = temp.child("bundle.md");
        output.write_str("stale content").unwrap();

        let writer = Writer::new(output.path()).unwrap();
        writer.write(&sample_document()).unwrap();

        let content = fs::read_to_string(output.path()).unwrap();
        assert!(!content.contains("stale content"));
    }

    #[test]
    fn test_writer_leaves_no_temp_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let output = temp.child("bundle.md");

        Writer::new(output.path())
            .unwrap()
            .write(&sample_document())
            .unwrap();

        let entries: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries, vec!["bundle.md"]);
    }

    #[test]
    fn test_writer_creates_parent_directories() {
        let temp = assert_fs::TempDir::new().unwrap();
        let output = temp.child("out/nested/bundle.md");

        Writer::new(output.path())
            .unwrap()
            .write(&sample_document())
            .unwrap();

        let content = fs::read_to_string(output.path()).unwrap();
        assert!(content.starts_with("# Project Bundle: demo"));
    }

    #[test]
    fn test_writer_fails_when_parent_is_a_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("blocker").write_str("not a dir").unwrap();
        let output = temp.child("blocker/bundle.md");

        let err = Writer::new(output.path())
            .unwrap()
            .write(&sample_document())
            .unwrap_err();

        assert!(err.is_io());
    }

    #[test]
    fn test_failed_write_removes_created_directories() {
        let temp = assert_fs::TempDir::new().unwrap();
        // The temporary sibling name exceeds the file name length limit
        let long_name = format!("{}.md", "a".repeat(250));
        let output = temp.path().join("new/nested").join(long_name);

        let err = Writer::new(&output)
            .unwrap()
            .write(&sample_document())
            .unwrap_err();

        assert!(err.is_io());
        assert!(!temp.child("new").path().exists());
    }

    #[test]
    fn test_failed_write_keeps_existing_directories() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("out").create_dir_all().unwrap();
        let long_name = format!("{}.md", "a".repeat(250));
        let output = temp.path().join("out/nested").join(long_name);

        assert!(Writer::new(&output).unwrap().write(&sample_document()).is_err());
        assert!(temp.child("out").path().is_dir());
        assert!(!temp.child("out/nested").path().exists());
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("out/bundle.md")).unwrap();
        assert_eq!(temp, PathBuf::from("out/.bundle.md.tmp"));
    }

    #[test]
    fn test_resolve_output_path() {
        let temp = assert_fs::TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();

        let missing = resolve_output_path(&temp.path().join("new.md"));
        assert_eq!(missing, root.join("new.md"));

        temp.child("existing.md").touch().unwrap();
        let existing = resolve_output_path(&temp.path().join("existing.md"));
        assert_eq!(existing, root.join("existing.md"));
    }
}
