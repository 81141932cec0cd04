use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

const BINARY_SNIFF_LEN: usize = 8192;

/// A file selected by the walker, not yet read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Absolute path to the file
    pub absolute_path: PathBuf,

    /// Path relative to the root directory, always `/`-separated
    pub relative_path: String,

    /// Lowercase extension without the dot, if any
    pub extension: Option<String>,
}

impl FileCandidate {
    /// Creates a candidate, deriving the extension from the relative path.
    #[must_use]
    pub fn new(absolute_path: PathBuf, relative_path: String) -> Self {
        let extension = Path::new(&relative_path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        Self {
            absolute_path,
            relative_path,
            extension,
        }
    }

    /// Returns the final path component.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// Reads the file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binary`] if the content looks binary,
    /// [`Error::InvalidUtf8`] if it is not valid UTF-8, and [`Error::Io`] if the
    /// file cannot be read.
    pub fn read_text(&self) -> Result<String> {
        let bytes = fs::read(&self.absolute_path).map_err(|e| Error::io(&self.absolute_path, e))?;

        if is_binary_content(&bytes) {
            return Err(Error::binary(&self.absolute_path));
        }

        String::from_utf8(bytes).map_err(|_| Error::invalid_utf8(&self.absolute_path))
    }
}

/// Converts a relative path to a `/`-separated string on every platform.
#[must_use]
pub(crate) fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Checks the leading bytes of a file for a NUL byte.
#[must_use]
pub(crate) fn is_binary_content(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    memchr::memchr(0, sample).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn candidate_for(file: &assert_fs::fixture::ChildPath, relative: &str) -> FileCandidate {
        FileCandidate::new(file.path().to_path_buf(), relative.to_string())
    }

    #[test]
    fn test_candidate_extension() {
        let c = FileCandidate::new(PathBuf::from("/p/src/Main.PY"), "src/Main.PY".to_string());
        assert_eq!(c.extension.as_deref(), Some("py"));
        assert_eq!(c.file_name(), "Main.PY");

        let c = FileCandidate::new(PathBuf::from("/p/Dockerfile"), "Dockerfile".to_string());
        assert_eq!(c.extension, None);
        assert_eq!(c.file_name(), "Dockerfile");
    }

    #[test]
    fn test_read_text_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("main.py");
        file.write_str("print('hi')\n").unwrap();

        let text = candidate_for(&file, "main.py").read_text().unwrap();
        assert_eq!(text, "print('hi')\n");
    }

    #[test]
    fn test_read_binary_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("blob.py");
        file.write_binary(&[0x89, b'P', b'N', b'G', 0, 0, 0, 13]).unwrap();

        let err = candidate_for(&file, "blob.py").read_text().unwrap_err();
        assert!(matches!(err, Error::Binary { .. }));
        assert!(err.is_skippable());
    }

    #[test]
    fn test_read_invalid_utf8() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("latin1.txt");
        file.write_binary(&[b'c', b'a', b'f', 0xE9, b'\n']).unwrap();

        let err = candidate_for(&file, "latin1.txt").read_text().unwrap_err();
        assert!(matches!(err, Error::InvalidUtf8 { .. }));
    }

    #[test]
    fn test_read_missing_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("gone.py");

        let err = candidate_for(&file, "gone.py").read_text().unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_empty_file_is_text() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("empty.py");
        file.touch().unwrap();

        assert_eq!(candidate_for(&file, "empty.py").read_text().unwrap(), "");
    }

    #[test]
    fn test_to_slash_path() {
        let path: PathBuf = ["src", "nested", "mod.rs"].iter().collect();
        assert_eq!(to_slash_path(&path), "src/nested/mod.rs");
    }
}
